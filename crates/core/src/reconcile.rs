// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger status reconciliation.
//!
//! `status.imageChangeTriggers` is rebuilt from scratch on every pass and
//! swapped in whole. Entry `i` mirrors the `i`-th image-change trigger of
//! `spec.triggers`; there is no per-trigger identity, so position is the only
//! correlation key. Tracked state (`paused`, `lastTriggeredImageID`) is read
//! from the spec trigger, whose sole writer over time is the image trigger
//! controller. Nothing here invents or clears an image id.

use crate::build_config::{BuildConfig, BuildConfigSpec, ImageChangeTriggerStatus};

/// Status entries for every image-change trigger in `spec`, in spec order.
pub fn image_change_trigger_statuses(spec: &BuildConfigSpec) -> Vec<ImageChangeTriggerStatus> {
    spec.triggers
        .iter()
        .filter_map(|t| t.as_image_change())
        .map(|ict| ImageChangeTriggerStatus {
            from: ict.tag_ref().cloned(),
            paused: ict.paused,
            last_triggered_image_id: ict.last_triggered_image_id.clone(),
        })
        .collect()
}

/// Copy of `config` with its image-change trigger status rebuilt from the spec.
pub fn reconcile_trigger_status(config: &BuildConfig) -> BuildConfig {
    let mut updated = config.clone();
    updated.status.image_change_triggers = image_change_trigger_statuses(&config.spec);
    updated
}

/// Whether the persisted status already matches what reconciliation would produce.
pub fn trigger_status_in_sync(config: &BuildConfig) -> bool {
    image_change_trigger_statuses(&config.spec) == config.status.image_change_triggers
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
