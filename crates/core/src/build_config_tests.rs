// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::*;
use serde_json::json;

#[test]
fn deserializes_openshift_trigger_list() {
    let bc: BuildConfig = serde_json::from_value(json!({
        "apiVersion": "build.openshift.io/v1",
        "kind": "BuildConfig",
        "metadata": { "name": "ruby-app", "namespace": "demo", "resourceVersion": "42" },
        "spec": {
            "triggers": [
                { "type": "GitHub", "github": { "secret": "s3cr3t" } },
                { "type": "ConfigChange" },
                { "type": "ImageChange", "imageChange": {} },
                {
                    "type": "ImageChange",
                    "imageChange": {
                        "from": { "kind": "ImageStreamTag", "name": "ruby:3.2" },
                        "paused": true,
                        "lastTriggeredImageID": "sha256:abc"
                    }
                }
            ],
            "strategy": {
                "type": "Source",
                "sourceStrategy": { "from": { "kind": "ImageStreamTag", "name": "ruby:latest" } }
            }
        },
        "status": { "lastVersion": 3 }
    }))
    .unwrap();

    assert_eq!(bc.name(), "ruby-app");
    assert_eq!(bc.namespace(), "demo");
    assert_eq!(bc.key(), "demo/ruby-app");
    assert_eq!(bc.status.last_version, 3);
    assert!(bc.has_config_change_trigger());

    let kinds: Vec<String> = bc.spec.triggers.iter().map(|t| t.to_string()).collect();
    assert_eq!(kinds, ["GitHub", "ConfigChange", "ImageChange", "ImageChange"]);

    let icts: Vec<_> = bc.image_change_triggers().collect();
    assert_eq!(icts.len(), 2);
    assert_eq!(icts[0], &ImageChangeTrigger::default());
    assert!(icts[1].paused);
    assert_eq!(icts[1].last_triggered_image_id, "sha256:abc");
    assert_eq!(icts[1].tag_ref().and_then(|r| r.name.as_deref()), Some("ruby:3.2"));

    assert_eq!(
        bc.spec.strategy.input_image().and_then(|r| r.name.as_deref()),
        Some("ruby:latest")
    );
}

#[test]
fn webhook_payload_survives_round_trip() {
    let raw = json!({ "type": "Generic", "generic": { "secret": "abc", "allowEnv": true } });
    let trigger: TriggerPolicy = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(serde_json::to_value(&trigger).unwrap(), raw);
}

#[test]
fn image_change_serializes_with_openshift_field_names() {
    let trigger = TriggerPolicy::image_change(ImageChangeTrigger {
        last_triggered_image_id: "abcdef0".to_string(),
        ..ImageChangeTrigger::for_tag("test:latest")
    });
    assert_eq!(
        serde_json::to_value(&trigger).unwrap(),
        json!({
            "type": "ImageChange",
            "imageChange": {
                "from": { "kind": "ImageStreamTag", "name": "test:latest" },
                "paused": false,
                "lastTriggeredImageID": "abcdef0"
            }
        })
    );
}

#[yare::parameterized(
    absent     = { None },
    empty_name = { Some("") },
)]
fn tag_ref_treats_empty_reference_as_absent(name: Option<&str>) {
    let trigger = ImageChangeTrigger {
        from: name.map(|_| k8s_openapi::api::core::v1::ObjectReference {
            kind: Some(IMAGE_STREAM_TAG_KIND.to_string()),
            name: name.map(str::to_string),
            ..Default::default()
        }),
        ..ImageChangeTrigger::default()
    };
    assert!(trigger.tag_ref().is_none());
}

#[yare::parameterized(
    no_triggers       = { base_build_config(),                        false },
    fresh_config      = { build_config_with_config_change_trigger(),  true },
    already_built     = { build_config_with_non_zero_last_version(),  false },
)]
fn config_change_pending(bc: BuildConfig, expected: bool) {
    assert_eq!(bc.config_change_pending(), expected);
}

#[test]
fn input_image_prefers_first_strategy_with_from() {
    let strategy = BuildStrategy {
        kind: Some("Docker".to_string()),
        source_strategy: None,
        docker_strategy: Some(StrategyInput { from: None }),
        custom_strategy: Some(StrategyInput { from: Some(image_stream_tag("custom:1")) }),
    };
    assert_eq!(strategy.input_image().and_then(|r| r.name.as_deref()), Some("custom:1"));
    assert!(BuildStrategy::default().input_image().is_none());
}

#[test]
fn resource_json_carries_type_meta() {
    let value = base_build_config().to_resource_json().unwrap();
    assert_eq!(value["apiVersion"], API_VERSION);
    assert_eq!(value["kind"], BUILD_CONFIG_KIND);
    assert_eq!(value["metadata"]["name"], "testBuildConfig");
}
