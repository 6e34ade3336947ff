// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build instantiation decisions for a single build configuration.
//!
//! A pass first brings the persisted image-change trigger status in line
//! with the spec, then starts the first build when a config-change trigger
//! is declared and `status.lastVersion` is still zero. The version is only
//! ever read: the build engine advances it, which is what makes the
//! config-change trigger fire once.

use bc_core::{
    builds_selector, reconcile_trigger_status, trigger_status_in_sync, Build, BuildConfig,
    BuildRequest, ConfigKey,
};
use tracing::{debug, info};

use crate::error::ControllerError;
use crate::gateway::{Gateway, GatewayError};

/// Result of a successful pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Handled {
    /// The configuration as stored after any status write.
    pub build_config: BuildConfig,
    /// The build started by this pass, if any.
    pub build: Option<Build>,
}

/// Reconciles build configurations through an injected [`Gateway`].
///
/// Holds no state of its own; concurrent passes over different keys are
/// independent.
pub struct BuildConfigController<G> {
    gateway: G,
}

impl<G: Gateway> BuildConfigController<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Re-read `key` and handle it. A configuration that no longer exists is
    /// not an error.
    pub async fn sync(&self, key: &ConfigKey) -> Result<Option<Handled>, ControllerError> {
        let (namespace, name) =
            key.split().ok_or_else(|| ControllerError::InvalidKey(key.to_string()))?;
        let config = match self.gateway.get(namespace, name).await {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                debug!(%key, "build config no longer exists");
                return Ok(None);
            }
            Err(e) => return Err(ControllerError::Lookup(e)),
        };
        self.handle_build_config(&config).await.map(Some)
    }

    /// Run one reconcile pass over `config`.
    ///
    /// Errors are returned as-is for the work queue to retry; nothing is
    /// retried here.
    pub async fn handle_build_config(
        &self,
        config: &BuildConfig,
    ) -> Result<Handled, ControllerError> {
        let key = config.key();
        debug!(%key, triggers = config.spec.triggers.len(), "handling build config");

        let config = self.sync_trigger_status(config).await?;

        if !config.has_config_change_trigger() {
            return Ok(Handled { build_config: config, build: None });
        }
        if config.status.last_version != 0 {
            debug!(%key, last_version = config.status.last_version, "config change trigger already fired");
            return Ok(Handled { build_config: config, build: None });
        }

        info!(%key, "running build for config change trigger");
        let request = BuildRequest::config_change(&config);
        let build = self
            .gateway
            .instantiate(&request)
            .await
            .map_err(|source| ControllerError::Instantiate { key: key.clone(), source })?;
        info!(%key, build = build.name(), "instantiated build");

        Ok(Handled { build_config: config, build: Some(build) })
    }

    /// Persist the rebuilt trigger status if it differs from what is stored.
    async fn sync_trigger_status(&self, config: &BuildConfig) -> Result<BuildConfig, ControllerError> {
        if trigger_status_in_sync(config) {
            return Ok(config.clone());
        }
        let reconciled = reconcile_trigger_status(config);
        debug!(
            key = %config.key(),
            before = config.status.image_change_triggers.len(),
            after = reconciled.status.image_change_triggers.len(),
            "updating image change trigger status"
        );
        self.gateway.update_trigger_status(&reconciled).await.map_err(ControllerError::Persist)
    }

    /// Builds created from `config`.
    pub async fn builds(&self, config: &BuildConfig) -> Result<Vec<Build>, GatewayError> {
        self.gateway.list(config.namespace(), &builds_selector(config.name())).await
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
