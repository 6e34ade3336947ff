// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes gateway for `build.openshift.io/v1` through `kube-rs`.
//!
//! Build resources are not part of `k8s-openapi`, so requests go through
//! `DynamicObject` APIs and are converted to the typed model with serde.

use super::{
    BuildConfigLister, BuildConfigUpdater, BuildInstantiator, BuildLister, GatewayError,
};
use async_trait::async_trait;
use bc_core::{Build, BuildConfig, BuildRequest, BUILD_CONFIG_KIND};
use kube::api::{
    Api, ApiResource, DynamicObject, GroupVersionKind, ListParams, Patch, PatchParams, PostParams,
};
use kube::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

const GROUP: &str = "build.openshift.io";
const VERSION: &str = "v1";

pub fn build_config_resource() -> ApiResource {
    ApiResource::from_gvk_with_plural(
        &GroupVersionKind::gvk(GROUP, VERSION, BUILD_CONFIG_KIND),
        "buildconfigs",
    )
}

pub fn build_resource() -> ApiResource {
    ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(GROUP, VERSION, "Build"), "builds")
}

/// Gateway backed by a live API server.
#[derive(Clone)]
pub struct KubeGateway {
    client: Client,
}

impl KubeGateway {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the in-cluster config or the local kubeconfig.
    pub async fn try_default() -> Result<Self, GatewayError> {
        let client = Client::try_default()
            .await
            .map_err(|e| GatewayError::Api(format!("failed to create kube client: {}", e)))?;
        Ok(Self::new(client))
    }

    /// BuildConfig API for one namespace, or all namespaces when `None`.
    pub fn build_configs(&self, namespace: Option<&str>) -> Api<DynamicObject> {
        let resource = build_config_resource();
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        }
    }

    fn builds(&self, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &build_resource())
    }
}

/// Map a client error onto the gateway taxonomy by HTTP status.
pub(super) fn from_kube(err: kube::Error) -> GatewayError {
    match err {
        kube::Error::Api(resp) => match resp.code {
            409 => GatewayError::Conflict(resp.message),
            404 => GatewayError::NotFound(resp.message),
            400 | 422 => GatewayError::Invalid(resp.message),
            403 => GatewayError::Forbidden(resp.message),
            _ => GatewayError::Api(resp.message),
        },
        other => GatewayError::Api(other.to_string()),
    }
}

/// Convert between serde representations (e.g. `DynamicObject` to `BuildConfig`).
pub fn convert<T: DeserializeOwned>(obj: &impl Serialize) -> Result<T, GatewayError> {
    serde_json::to_value(obj)
        .and_then(serde_json::from_value)
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Merge patch replacing the image-change trigger status list.
///
/// Carrying `resourceVersion` makes the server reject the write with 409 if
/// the object moved since it was read.
pub(super) fn trigger_status_patch(config: &BuildConfig) -> serde_json::Value {
    let mut patch = serde_json::json!({
        "status": { "imageChangeTriggers": config.status.image_change_triggers },
    });
    if let Some(rv) = &config.metadata.resource_version {
        patch["metadata"] = serde_json::json!({ "resourceVersion": rv });
    }
    patch
}

#[async_trait]
impl BuildConfigUpdater for KubeGateway {
    async fn update_trigger_status(
        &self,
        config: &BuildConfig,
    ) -> Result<BuildConfig, GatewayError> {
        let api = self.build_configs(Some(config.namespace()));
        let patch = trigger_status_patch(config);
        let obj = api
            .patch_status(config.name(), &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(from_kube)?;
        convert(&obj)
    }
}

#[async_trait]
impl BuildInstantiator for KubeGateway {
    async fn instantiate(&self, request: &BuildRequest) -> Result<Build, GatewayError> {
        let api = self.build_configs(Some(request.namespace()));
        let body = request.to_resource_json().map_err(|e| GatewayError::Invalid(e.to_string()))?;
        let data = serde_json::to_vec(&body).map_err(|e| GatewayError::Invalid(e.to_string()))?;
        api.create_subresource::<Build>("instantiate", request.name(), &PostParams::default(), data)
            .await
            .map_err(from_kube)
    }
}

#[async_trait]
impl BuildConfigLister for KubeGateway {
    async fn get(&self, namespace: &str, name: &str) -> Result<BuildConfig, GatewayError> {
        let obj = self.build_configs(Some(namespace)).get(name).await.map_err(from_kube)?;
        convert(&obj)
    }
}

#[async_trait]
impl BuildLister for KubeGateway {
    async fn list(&self, namespace: &str, label_selector: &str) -> Result<Vec<Build>, GatewayError> {
        let list = self
            .builds(namespace)
            .list(&ListParams::default().labels(label_selector))
            .await
            .map_err(from_kube)?;
        list.items.iter().map(convert).collect()
    }
}

#[cfg(test)]
#[path = "k8s_tests.rs"]
mod tests;
