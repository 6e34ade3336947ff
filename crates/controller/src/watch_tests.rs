// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bc_core::test_support::*;
use bc_core::{reconcile_trigger_status, BuildConfig};

fn named(name: &str) -> BuildConfig {
    let mut bc = build_config_with_config_change_trigger();
    bc.metadata.name = Some(name.to_string());
    bc
}

async fn drain(queue: &WorkQueue) -> Vec<ConfigKey> {
    let mut keys = Vec::new();
    while !queue.is_empty() {
        if let Some(key) = queue.get().await {
            queue.done(&key);
            keys.push(key);
        }
    }
    keys
}

#[tokio::test]
async fn added_config_is_queued() {
    let queue = WorkQueue::default();
    let mut cache = WatchCache::new();
    let bc = build_config_with_config_change_trigger();

    cache.handle_event(&queue, Event::Apply(bc.clone()));

    assert_eq!(drain(&queue).await, vec![bc.key()]);
    assert_eq!(cache.get(&bc.key()), Some(&bc));
}

#[tokio::test]
async fn own_status_write_is_not_requeued() {
    let queue = WorkQueue::default();
    let mut cache = WatchCache::new();
    let bc = with_image_change_triggers(&[TagTrigger::new("test:latest", "")], base_build_config());

    cache.handle_event(&queue, Event::Apply(bc.clone()));
    drain(&queue).await;

    let echoed = reconcile_trigger_status(&bc);
    cache.handle_event(&queue, Event::Apply(echoed));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn cleared_trigger_is_queued() {
    let queue = WorkQueue::default();
    let mut cache = WatchCache::new();
    let mut bc = build_config_with_triggers(&[TagTrigger::new("test:latest", "abcdef0")]);
    bc.status.last_version = 1;

    cache.handle_event(&queue, Event::Apply(bc.clone()));
    drain(&queue).await;

    let mut cleared = build_config_with_triggers(&[TagTrigger::new("test:latest", "")]);
    cleared.metadata = bc.metadata.clone();
    cleared.status.last_version = 1;
    cache.handle_event(&queue, Event::Apply(cleared));
    assert_eq!(drain(&queue).await, vec![bc.key()]);
}

#[tokio::test]
async fn delete_forgets_key() {
    let queue = WorkQueue::default();
    let mut cache = WatchCache::new();
    let bc = build_config_with_config_change_trigger();

    cache.handle_event(&queue, Event::Apply(bc.clone()));
    drain(&queue).await;
    queue.add_rate_limited(bc.key());
    assert_eq!(queue.num_requeues(&bc.key()), 1);

    cache.handle_event(&queue, Event::Delete(bc.clone()));
    assert!(cache.is_empty());
    assert_eq!(queue.num_requeues(&bc.key()), 0);
}

#[tokio::test]
async fn delete_of_unknown_config_is_ignored() {
    let mut cache = WatchCache::new();
    assert_eq!(cache.delete(&named("ghost")), None);
}

#[tokio::test]
async fn relist_drops_configs_that_vanished() {
    let queue = WorkQueue::default();
    let mut cache = WatchCache::new();
    cache.handle_event(&queue, Event::Apply(named("kept")));
    cache.handle_event(&queue, Event::Apply(named("gone")));
    drain(&queue).await;

    cache.handle_event(&queue, Event::Init);
    cache.handle_event(&queue, Event::InitApply(named("kept")));
    cache.handle_event(&queue, Event::InitDone);

    assert_eq!(cache.len(), 1);
    assert!(cache.get(&named("kept").key()).is_some());
    assert!(cache.get(&named("gone").key()).is_none());
}

#[test]
fn finish_without_relist_removes_nothing() {
    let mut cache = WatchCache::new();
    cache.apply(named("a"));
    assert!(cache.finish_relist().is_empty());
    assert_eq!(cache.len(), 1);
}

#[test]
fn decodes_dynamic_objects() {
    let bc = build_config_with_triggers(&[TagTrigger::new("test:latest", "abc")]);
    let obj: DynamicObject = convert(&bc.to_resource_json().unwrap()).unwrap();

    let decoded = decode_event(Event::Apply(obj)).unwrap();
    match decoded {
        Event::Apply(got) => assert_eq!(got, bc),
        _ => panic!("expected apply"),
    }
    assert!(matches!(decode_event(Event::InitDone), Ok(Event::InitDone)));
}

#[test]
fn undecodable_object_is_an_error() {
    let obj: DynamicObject = serde_json::from_value(serde_json::json!({
        "apiVersion": "build.openshift.io/v1",
        "kind": "BuildConfig",
        "metadata": { "name": "bad", "namespace": "ns" },
        "spec": { "triggers": "not-a-list" }
    }))
    .unwrap();
    assert!(matches!(decode_event(Event::Delete(obj)), Err(GatewayError::Decode(_))));
}
