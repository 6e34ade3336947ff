// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::build_config::{
    image_stream_tag, BuildConfig, BuildStrategy, ImageChangeTrigger, ImageChangeTriggerStatus,
    StrategyInput, TriggerPolicy,
};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for trigger and build configuration shapes.
pub mod strategies {
    use super::TagTrigger;
    use crate::build_config::{BuildConfig, TriggerPolicy};
    use proptest::prelude::*;

    pub fn arb_tag_trigger() -> impl Strategy<Value = TagTrigger> {
        (
            prop_oneof![Just(String::new()), "[a-z]{1,8}:(latest|v[0-9])"],
            prop_oneof![Just(String::new()), "[0-9a-f]{7}"],
            any::<bool>(),
        )
            .prop_map(|(tag, id, paused)| TagTrigger::new(tag, id).paused(paused))
    }

    pub fn arb_trigger_policy() -> impl Strategy<Value = TriggerPolicy> {
        prop_oneof![
            Just(TriggerPolicy::ConfigChange),
            arb_tag_trigger().prop_map(|t| t.to_policy()),
            Just(TriggerPolicy::GitHub { github: None }),
            Just(TriggerPolicy::Generic { generic: None }),
        ]
    }

    /// Configurations with arbitrary triggers and an arbitrary (possibly stale) status.
    pub fn arb_build_config() -> impl Strategy<Value = BuildConfig> {
        (
            prop::collection::vec(arb_trigger_policy(), 0..8),
            prop::collection::vec(arb_tag_trigger(), 0..8),
            0i64..3,
        )
            .prop_map(|(triggers, stale, last_version)| {
                let mut bc = super::base_build_config();
                bc.spec.triggers = triggers;
                bc.status.last_version = last_version;
                super::with_image_change_trigger_statuses(&stale, bc)
            })
    }
}

// ── Trigger fixtures ────────────────────────────────────────────────────

/// Compact description of an image-change trigger used to build fixtures.
///
/// An empty `image_stream_tag` means the trigger has no `from`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagTrigger {
    pub image_stream_tag: String,
    pub last_triggered_id: String,
    pub paused: bool,
}

impl TagTrigger {
    pub fn new(image_stream_tag: impl Into<String>, last_triggered_id: impl Into<String>) -> Self {
        Self {
            image_stream_tag: image_stream_tag.into(),
            last_triggered_id: last_triggered_id.into(),
            paused: false,
        }
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    fn from_ref(&self) -> Option<k8s_openapi::api::core::v1::ObjectReference> {
        (!self.image_stream_tag.is_empty()).then(|| image_stream_tag(&self.image_stream_tag))
    }

    pub fn to_policy(&self) -> TriggerPolicy {
        TriggerPolicy::image_change(ImageChangeTrigger {
            from: self.from_ref(),
            paused: self.paused,
            last_triggered_image_id: self.last_triggered_id.clone(),
        })
    }

    pub fn to_status(&self) -> ImageChangeTriggerStatus {
        ImageChangeTriggerStatus {
            from: self.from_ref(),
            paused: self.paused,
            last_triggered_image_id: self.last_triggered_id.clone(),
        }
    }
}

// ── BuildConfig factory functions ───────────────────────────────────────

/// Source-strategy configuration building from `builderimage:latest`, no triggers.
pub fn base_build_config() -> BuildConfig {
    let mut bc = BuildConfig::new("test-ns", "testBuildConfig");
    bc.spec.strategy = BuildStrategy {
        kind: Some("Source".to_string()),
        source_strategy: Some(StrategyInput { from: Some(image_stream_tag("builderimage:latest")) }),
        ..BuildStrategy::default()
    };
    bc
}

pub fn build_config_with_config_change_trigger() -> BuildConfig {
    let mut bc = base_build_config();
    bc.spec.triggers.push(TriggerPolicy::ConfigChange);
    bc
}

pub fn build_config_with_non_zero_last_version() -> BuildConfig {
    let mut bc = build_config_with_config_change_trigger();
    bc.status.last_version = 1;
    bc
}

/// Append an image-change spec trigger for each entry.
pub fn with_image_change_triggers(triggers: &[TagTrigger], mut bc: BuildConfig) -> BuildConfig {
    bc.spec.triggers.extend(triggers.iter().map(TagTrigger::to_policy));
    bc
}

/// Append an image-change status entry for each entry.
pub fn with_image_change_trigger_statuses(
    triggers: &[TagTrigger],
    mut bc: BuildConfig,
) -> BuildConfig {
    bc.status.image_change_triggers.extend(triggers.iter().map(TagTrigger::to_status));
    bc
}

/// Configuration whose spec and status both describe `triggers`.
pub fn build_config_with_triggers(triggers: &[TagTrigger]) -> BuildConfig {
    with_image_change_trigger_statuses(
        triggers,
        with_image_change_triggers(triggers, base_build_config()),
    )
}
