// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bc_core::test_support::{build_config_with_config_change_trigger, build_config_with_triggers, TagTrigger};
use bc_core::{builds_selector, ConfigKey};

#[yare::parameterized(
    conflict  = { GatewayError::Conflict("x".into()),  false, true },
    not_found = { GatewayError::NotFound("x".into()),  true,  false },
    invalid   = { GatewayError::Invalid("x".into()),   true,  false },
    forbidden = { GatewayError::Forbidden("x".into()), true,  false },
    fatal     = { GatewayError::Fatal("x".into()),     true,  false },
    decode    = { GatewayError::Decode("x".into()),    true,  false },
    api       = { GatewayError::Api("x".into()),       false, false },
)]
fn error_classification(err: GatewayError, fatal: bool, conflict: bool) {
    assert_eq!(err.is_fatal(), fatal);
    assert_eq!(err.is_conflict(), conflict);
}

#[tokio::test]
async fn fake_rejects_stale_status_write() {
    let gateway = FakeGateway::new();
    let bc = build_config_with_triggers(&[TagTrigger::new("test:latest", "abcdef0")]);
    gateway.insert(bc.clone());

    let fresh = gateway.get(bc.namespace(), bc.name()).await.unwrap();
    let stored = gateway.update_trigger_status(&fresh).await.unwrap();
    assert_eq!(stored.metadata.resource_version.as_deref(), Some("2"));

    // Writing again with the version read before the first write conflicts.
    let err = gateway.update_trigger_status(&fresh).await.unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {:?}", err);
}

#[tokio::test]
async fn fake_status_write_requires_existing_object() {
    let gateway = FakeGateway::new();
    let err = gateway.update_trigger_status(&build_config_with_triggers(&[])).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn fake_instantiation_advances_last_version_and_labels_build() {
    let gateway = FakeGateway::new();
    let bc = build_config_with_config_change_trigger();
    gateway.insert(bc.clone());

    let build = gateway.instantiate(&bc_core::BuildRequest::config_change(&bc)).await.unwrap();
    assert_eq!(build.name(), "testBuildConfig-1");
    assert_eq!(build.config_name(), Some("testBuildConfig"));
    assert_eq!(gateway.stored(&bc.key()).unwrap().status.last_version, 1);

    let listed = gateway.list(bc.namespace(), &builds_selector(bc.name())).await.unwrap();
    assert_eq!(listed, vec![build]);
    assert!(gateway.list("other-ns", &builds_selector(bc.name())).await.unwrap().is_empty());
}

#[tokio::test]
async fn fake_records_calls_in_order() {
    let gateway = FakeGateway::new();
    gateway.set_get_error(Some(GatewayError::Api("down".into())));
    let _ = gateway.get("ns", "bc").await;
    let _ = gateway.list("ns", "a=b").await;

    assert_eq!(
        gateway.calls(),
        vec![
            GatewayCall::Get { key: ConfigKey::new("ns", "bc") },
            GatewayCall::ListBuilds { namespace: "ns".into(), selector: "a=b".into() },
        ]
    );
}
