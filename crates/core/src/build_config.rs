// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! BuildConfig resource model (`build.openshift.io/v1`).
//!
//! Only the fields the trigger controller reads or writes are modelled.
//! Webhook trigger payloads are carried as raw JSON so they survive a
//! read-modify-write cycle unchanged.

use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::key::ConfigKey;

/// API group/version shared by build resources.
pub const API_VERSION: &str = "build.openshift.io/v1";

/// Kind of a build configuration.
pub const BUILD_CONFIG_KIND: &str = "BuildConfig";

/// Object reference kind for image-stream-tag trigger sources.
pub const IMAGE_STREAM_TAG_KIND: &str = "ImageStreamTag";

/// A declared build: strategy plus the triggers that start it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: BuildConfigSpec,
    #[serde(default)]
    pub status: BuildConfigStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigSpec {
    /// Triggers in declaration order. Position is significant.
    #[serde(default)]
    pub triggers: Vec<TriggerPolicy>,
    #[serde(default)]
    pub strategy: BuildStrategy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigStatus {
    /// Number of builds created from this configuration. Advanced by the
    /// build engine, never by this controller.
    #[serde(default)]
    pub last_version: i64,
    /// Mirror of the image-change triggers in `spec.triggers`, same order.
    #[serde(default)]
    pub image_change_triggers: Vec<ImageChangeTriggerStatus>,
}

/// How builds are produced. Only the input image of each strategy matters here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategy {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_strategy: Option<StrategyInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_strategy: Option<StrategyInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_strategy: Option<StrategyInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,
}

impl BuildStrategy {
    /// The builder image of whichever strategy is set.
    ///
    /// This is what an image-change trigger without a `from` follows.
    pub fn input_image(&self) -> Option<&ObjectReference> {
        [&self.source_strategy, &self.docker_strategy, &self.custom_strategy]
            .into_iter()
            .flatten()
            .find_map(|s| s.from.as_ref())
    }
}

/// One entry of `spec.triggers`, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TriggerPolicy {
    /// Fires once, for the first build of a configuration.
    ConfigChange,
    ImageChange {
        #[serde(rename = "imageChange", default)]
        image_change: ImageChangeTrigger,
    },
    GitHub {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        github: Option<serde_json::Value>,
    },
    GitLab {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gitlab: Option<serde_json::Value>,
    },
    Bitbucket {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bitbucket: Option<serde_json::Value>,
    },
    Generic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generic: Option<serde_json::Value>,
    },
}

crate::simple_display! {
    TriggerPolicy {
        ConfigChange => "ConfigChange",
        ImageChange { .. } => "ImageChange",
        GitHub { .. } => "GitHub",
        GitLab { .. } => "GitLab",
        Bitbucket { .. } => "Bitbucket",
        Generic { .. } => "Generic",
    }
}

impl TriggerPolicy {
    pub fn image_change(trigger: ImageChangeTrigger) -> Self {
        Self::ImageChange { image_change: trigger }
    }

    pub fn is_config_change(&self) -> bool {
        matches!(self, Self::ConfigChange)
    }

    pub fn as_image_change(&self) -> Option<&ImageChangeTrigger> {
        match self {
            Self::ImageChange { image_change } => Some(image_change),
            _ => None,
        }
    }
}

/// Spec side of an image-change trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageChangeTrigger {
    /// Image stream tag to follow; `None` follows the strategy's input image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,
    #[serde(default)]
    pub paused: bool,
    #[serde(rename = "lastTriggeredImageID", default)]
    pub last_triggered_image_id: String,
}

impl ImageChangeTrigger {
    /// Trigger following the named image stream tag (e.g. `"ruby:latest"`).
    pub fn for_tag(tag: impl Into<String>) -> Self {
        Self { from: Some(image_stream_tag(tag)), ..Self::default() }
    }

    /// The referenced tag, treating a reference with an empty name as absent.
    pub fn tag_ref(&self) -> Option<&ObjectReference> {
        self.from.as_ref().filter(|r| r.name.as_deref().is_some_and(|n| !n.is_empty()))
    }
}

/// Status side of an image-change trigger, positionally paired with the spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageChangeTriggerStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,
    #[serde(default)]
    pub paused: bool,
    #[serde(rename = "lastTriggeredImageID", default)]
    pub last_triggered_image_id: String,
}

/// Reference to an image stream tag by name.
pub fn image_stream_tag(name: impl Into<String>) -> ObjectReference {
    ObjectReference {
        kind: Some(IMAGE_STREAM_TAG_KIND.to_string()),
        name: Some(name.into()),
        ..ObjectReference::default()
    }
}

impl BuildConfig {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: Some(namespace.into()),
                ..ObjectMeta::default()
            },
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    pub fn key(&self) -> ConfigKey {
        ConfigKey::new(self.namespace(), self.name())
    }

    /// Whether any trigger of the given kind is declared.
    pub fn has_trigger(&self, pred: impl Fn(&TriggerPolicy) -> bool) -> bool {
        self.spec.triggers.iter().any(pred)
    }

    pub fn has_config_change_trigger(&self) -> bool {
        self.has_trigger(TriggerPolicy::is_config_change)
    }

    /// Image-change triggers in declaration order.
    pub fn image_change_triggers(&self) -> impl Iterator<Item = &ImageChangeTrigger> {
        self.spec.triggers.iter().filter_map(TriggerPolicy::as_image_change)
    }

    /// A config-change trigger that has not produced its build yet.
    pub fn config_change_pending(&self) -> bool {
        self.has_config_change_trigger() && self.status.last_version == 0
    }

    /// Serialize with `apiVersion`/`kind` set, ready for the API server.
    pub fn to_resource_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("apiVersion".into(), API_VERSION.into());
            obj.insert("kind".into(), BUILD_CONFIG_KIND.into());
        }
        Ok(value)
    }
}

#[cfg(test)]
#[path = "build_config_tests.rs"]
mod tests;
