// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build instantiation request and the build it yields.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

use crate::build_config::{BuildConfig, API_VERSION};

/// Label set on every build created from a configuration.
pub const BUILD_CONFIG_LABEL: &str = "openshift.io/build-config.name";

pub const BUILD_REQUEST_KIND: &str = "BuildRequest";

/// Message recorded on builds started by a config-change trigger.
pub const CONFIG_CHANGE_CAUSE: &str = "Build configuration change";

/// Body posted to the `instantiate` subresource of a build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub triggered_by: Vec<BuildTriggerCause>,
    /// Version the request was decided against; the server rejects the
    /// request if the configuration has moved on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_version: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTriggerCause {
    #[serde(default)]
    pub message: String,
}

impl BuildRequest {
    /// Request for the first build of `config`, caused by its config-change trigger.
    pub fn config_change(config: &BuildConfig) -> Self {
        Self {
            metadata: ObjectMeta {
                name: config.metadata.name.clone(),
                namespace: config.metadata.namespace.clone(),
                ..ObjectMeta::default()
            },
            triggered_by: vec![BuildTriggerCause { message: CONFIG_CHANGE_CAUSE.to_string() }],
            last_version: Some(config.status.last_version),
        }
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    pub fn to_resource_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("apiVersion".into(), API_VERSION.into());
            obj.insert("kind".into(), BUILD_REQUEST_KIND.into());
        }
        Ok(value)
    }
}

/// A build run. Opaque to the controller beyond identity and phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BuildStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    #[serde(default)]
    pub phase: String,
}

impl Build {
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Name of the configuration this build was created from, if labelled.
    pub fn config_name(&self) -> Option<&str> {
        self.metadata.labels.as_ref()?.get(BUILD_CONFIG_LABEL).map(String::as_str)
    }

    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.phase.as_str())
    }
}

/// Label selector matching the builds of configuration `name`.
pub fn builds_selector(name: &str) -> String {
    format!("{}={}", BUILD_CONFIG_LABEL, name)
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
