// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::arb_build_config;
use crate::test_support::*;
use proptest::prelude::*;

fn id(last_triggered_id: &str) -> TagTrigger {
    TagTrigger::new("", last_triggered_id)
}

fn tagged(last_triggered_id: &str) -> TagTrigger {
    TagTrigger::new("test-build:latest", last_triggered_id)
}

#[yare::parameterized(
    no_trigger_changes = {
        vec![id("abcdef0")],
        vec![id("abcdef0")],
        false
    },
    empty_to_populated = {
        vec![id("")],
        vec![id("abcdef0")],
        false
    },
    populated_to_empty = {
        vec![id("abcdef0")],
        vec![id("")],
        true
    },
    multi_empty_to_populated = {
        vec![id("abcdef0"), tagged("")],
        vec![id("abcdef0"), tagged("abcdef0")],
        false
    },
    multi_populated_to_empty = {
        vec![id("abcdef0"), tagged("abcdef0")],
        vec![id("abcdef0"), tagged("")],
        true
    },
    trigger_removed = {
        vec![id("abcdef0"), tagged("abcdef0")],
        vec![id("abcdef0")],
        false
    },
    trigger_added_empty = {
        vec![id("abcdef0")],
        vec![id("abcdef0"), tagged("")],
        false
    },
    both_empty = {
        vec![],
        vec![],
        false
    },
)]
fn detects_cleared_image_ids(old: Vec<TagTrigger>, current: Vec<TagTrigger>, expected: bool) {
    let old = build_config_with_triggers(&old);
    let current = build_config_with_triggers(&current);
    assert_eq!(image_change_trigger_cleared(Some(&old), Some(&current)), expected);
}

#[yare::parameterized(
    old_missing     = { true,  false },
    current_missing = { false, true },
    both_missing    = { true,  true },
)]
fn missing_snapshot_is_never_cleared(old_missing: bool, current_missing: bool) {
    let old = build_config_with_triggers(&[id("abcdef0")]);
    let current = build_config_with_triggers(&[id("")]);
    let old = (!old_missing).then_some(&old);
    let current = (!current_missing).then_some(&current);
    assert!(!image_change_trigger_cleared(old, current));
}

#[test]
fn only_status_is_compared() {
    // Spec says cleared, status does not: not a reset.
    let old = build_config_with_triggers(&[id("abcdef0")]);
    let mut current = old.clone();
    current.spec.triggers = vec![id("").to_policy()];
    assert!(!image_change_trigger_cleared(Some(&old), Some(&current)));
}

proptest! {
    #[test]
    fn never_cleared_against_itself(bc in arb_build_config()) {
        prop_assert!(!image_change_trigger_cleared(Some(&bc), Some(&bc)));
    }

    #[test]
    fn clearing_any_recorded_id_is_detected(bc in arb_build_config(), pick in any::<prop::sample::Index>()) {
        let recorded: Vec<usize> = bc.status.image_change_triggers
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.last_triggered_image_id.is_empty())
            .map(|(i, _)| i)
            .collect();
        prop_assume!(!recorded.is_empty());
        let mut current = bc.clone();
        current.status.image_change_triggers[*pick.get(&recorded)].last_triggered_image_id.clear();
        prop_assert!(image_change_trigger_cleared(Some(&bc), Some(&current)));
    }
}
