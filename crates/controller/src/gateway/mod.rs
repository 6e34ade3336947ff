// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateways to the API server.
//!
//! The controller only sees these traits. [`KubeGateway`] talks to a real
//! cluster; `FakeGateway` (tests and `test-support`) keeps objects in memory
//! and records every call.

mod k8s;

pub use k8s::{build_config_resource, build_resource, convert, KubeGateway};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeGateway, GatewayCall};

use async_trait::async_trait;
use bc_core::{Build, BuildConfig, BuildRequest};
use thiserror::Error;

/// Errors from gateway operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Write rejected because the object changed since it was read.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// The server will never accept this request.
    #[error("fatal: {0}")]
    Fatal(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("decode failed: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Retrying the same call cannot succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Invalid(_) | Self::Forbidden(_) | Self::Fatal(_) | Self::Decode(_)
        )
    }
}

/// Persists reconciled trigger status.
#[async_trait]
pub trait BuildConfigUpdater: Send + Sync + 'static {
    /// Write `config.status.imageChangeTriggers`, guarded by
    /// `config.metadata.resourceVersion`. Returns the stored object.
    async fn update_trigger_status(&self, config: &BuildConfig)
        -> Result<BuildConfig, GatewayError>;
}

/// Asks the build engine to start a build.
#[async_trait]
pub trait BuildInstantiator: Send + Sync + 'static {
    async fn instantiate(&self, request: &BuildRequest) -> Result<Build, GatewayError>;
}

/// Reads the authoritative copy of a build configuration.
#[async_trait]
pub trait BuildConfigLister: Send + Sync + 'static {
    async fn get(&self, namespace: &str, name: &str) -> Result<BuildConfig, GatewayError>;
}

/// Lists builds by label selector.
#[async_trait]
pub trait BuildLister: Send + Sync + 'static {
    async fn list(&self, namespace: &str, label_selector: &str) -> Result<Vec<Build>, GatewayError>;
}

/// Everything the controller needs from the API server.
pub trait Gateway: BuildConfigUpdater + BuildInstantiator + BuildConfigLister + BuildLister {}

impl<T> Gateway for T where T: BuildConfigUpdater + BuildInstantiator + BuildConfigLister + BuildLister {}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
