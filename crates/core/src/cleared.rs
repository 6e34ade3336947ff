// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detection of image-change triggers whose tracked image id was reset.

use crate::build_config::BuildConfig;

/// True when some image-change trigger status went from a recorded image id
/// to an empty one between `old` and `current`.
///
/// Entries are paired by position. Entries past the end of the shorter list
/// are added or removed triggers, not resets, and are ignored. A missing
/// snapshot on either side never reports a reset.
pub fn image_change_trigger_cleared(
    old: Option<&BuildConfig>,
    current: Option<&BuildConfig>,
) -> bool {
    let (Some(old), Some(current)) = (old, current) else {
        return false;
    };
    old.status
        .image_change_triggers
        .iter()
        .zip(&current.status.image_change_triggers)
        .any(|(before, after)| {
            !before.last_triggered_image_id.is_empty() && after.last_triggered_image_id.is_empty()
        })
}

#[cfg(test)]
#[path = "cleared_tests.rs"]
mod tests;
