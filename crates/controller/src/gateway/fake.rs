// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory gateway for tests.

use super::{
    BuildConfigLister, BuildConfigUpdater, BuildInstantiator, BuildLister, GatewayError,
};
use async_trait::async_trait;
use bc_core::{
    Build, BuildConfig, BuildRequest, ConfigKey, ImageChangeTriggerStatus, BUILD_CONFIG_LABEL,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Recorded gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    UpdateTriggerStatus { key: ConfigKey, triggers: Vec<ImageChangeTriggerStatus> },
    Instantiate { request: BuildRequest },
    Get { key: ConfigKey },
    ListBuilds { namespace: String, selector: String },
}

#[derive(Default)]
struct FakeState {
    configs: HashMap<ConfigKey, BuildConfig>,
    builds: Vec<Build>,
    calls: Vec<GatewayCall>,
    update_error: Option<GatewayError>,
    instantiate_error: Option<GatewayError>,
    get_error: Option<GatewayError>,
}

/// Fake gateway for testing
///
/// Status writes honour `resourceVersion` like the API server: a stale
/// version yields `Conflict`, a successful write bumps it. Instantiation
/// creates a labelled build and advances `status.lastVersion`, standing in
/// for the build engine.
#[derive(Clone, Default)]
pub struct FakeGateway {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. A missing `resourceVersion` is set to `"1"`.
    pub fn insert(&self, mut config: BuildConfig) {
        config.metadata.resource_version.get_or_insert_with(|| "1".to_string());
        self.inner.lock().configs.insert(config.key(), config);
    }

    pub fn remove(&self, key: &ConfigKey) {
        self.inner.lock().configs.remove(key);
    }

    /// Stored copy of a configuration.
    pub fn stored(&self, key: &ConfigKey) -> Option<BuildConfig> {
        self.inner.lock().configs.get(key).cloned()
    }

    pub fn set_update_error(&self, err: Option<GatewayError>) {
        self.inner.lock().update_error = err;
    }

    pub fn set_instantiate_error(&self, err: Option<GatewayError>) {
        self.inner.lock().instantiate_error = err;
    }

    pub fn set_get_error(&self, err: Option<GatewayError>) {
        self.inner.lock().get_error = err;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.inner.lock().calls.clone()
    }

    /// Instantiate requests issued so far.
    pub fn instantiations(&self) -> Vec<BuildRequest> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                GatewayCall::Instantiate { request } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Status writes issued so far.
    pub fn status_updates(&self) -> Vec<Vec<ImageChangeTriggerStatus>> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                GatewayCall::UpdateTriggerStatus { triggers, .. } => Some(triggers.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn builds(&self) -> Vec<Build> {
        self.inner.lock().builds.clone()
    }
}

fn bump(resource_version: &mut Option<String>) {
    let next = resource_version.as_deref().and_then(|v| v.parse::<u64>().ok()).unwrap_or(0) + 1;
    *resource_version = Some(next.to_string());
}

#[async_trait]
impl BuildConfigUpdater for FakeGateway {
    async fn update_trigger_status(
        &self,
        config: &BuildConfig,
    ) -> Result<BuildConfig, GatewayError> {
        let mut inner = self.inner.lock();
        let key = config.key();
        inner.calls.push(GatewayCall::UpdateTriggerStatus {
            key: key.clone(),
            triggers: config.status.image_change_triggers.clone(),
        });
        if let Some(err) = inner.update_error.clone() {
            return Err(err);
        }
        let stored =
            inner.configs.get_mut(&key).ok_or_else(|| GatewayError::NotFound(key.to_string()))?;
        if config.metadata.resource_version.is_some()
            && config.metadata.resource_version != stored.metadata.resource_version
        {
            return Err(GatewayError::Conflict(format!(
                "{}: the object has been modified; please apply your changes to the latest version",
                key
            )));
        }
        stored.status.image_change_triggers = config.status.image_change_triggers.clone();
        bump(&mut stored.metadata.resource_version);
        Ok(stored.clone())
    }
}

#[async_trait]
impl BuildInstantiator for FakeGateway {
    async fn instantiate(&self, request: &BuildRequest) -> Result<Build, GatewayError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.calls.push(GatewayCall::Instantiate { request: request.clone() });
        if let Some(err) = inner.instantiate_error.clone() {
            return Err(err);
        }
        let key = ConfigKey::new(request.namespace(), request.name());
        let version = match inner.configs.get_mut(&key) {
            Some(stored) => {
                stored.status.last_version += 1;
                bump(&mut stored.metadata.resource_version);
                stored.status.last_version
            }
            None => inner.builds.len() as i64 + 1,
        };
        let build = Build {
            metadata: ObjectMeta {
                name: Some(format!("{}-{}", request.name(), version)),
                namespace: Some(request.namespace().to_string()),
                labels: Some(BTreeMap::from([(
                    BUILD_CONFIG_LABEL.to_string(),
                    request.name().to_string(),
                )])),
                ..ObjectMeta::default()
            },
            status: None,
        };
        inner.builds.push(build.clone());
        Ok(build)
    }
}

#[async_trait]
impl BuildConfigLister for FakeGateway {
    async fn get(&self, namespace: &str, name: &str) -> Result<BuildConfig, GatewayError> {
        let mut inner = self.inner.lock();
        let key = ConfigKey::new(namespace, name);
        inner.calls.push(GatewayCall::Get { key: key.clone() });
        if let Some(err) = inner.get_error.clone() {
            return Err(err);
        }
        inner.configs.get(&key).cloned().ok_or_else(|| GatewayError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl BuildLister for FakeGateway {
    async fn list(&self, namespace: &str, label_selector: &str) -> Result<Vec<Build>, GatewayError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GatewayCall::ListBuilds {
            namespace: namespace.to_string(),
            selector: label_selector.to_string(),
        });
        let (label, value) = label_selector
            .split_once('=')
            .ok_or_else(|| GatewayError::Invalid(format!("unsupported selector: {}", label_selector)))?;
        Ok(inner
            .builds
            .iter()
            .filter(|b| b.metadata.namespace.as_deref() == Some(namespace))
            .filter(|b| {
                b.metadata.labels.as_ref().and_then(|l| l.get(label)).map(String::as_str)
                    == Some(value)
            })
            .cloned()
            .collect())
    }
}
