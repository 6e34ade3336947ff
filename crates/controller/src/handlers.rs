// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch event handlers: which observed changes warrant a reconcile pass.

use bc_core::{image_change_trigger_cleared, trigger_status_in_sync, BuildConfig};
use tracing::debug;

/// New configurations are always reconciled.
pub fn on_added(config: &BuildConfig) -> bool {
    debug!(key = %config.key(), "build config added");
    true
}

/// Decide whether an update needs a pass.
///
/// Our own status writes come back as updates; once status matches the spec
/// and no config-change build is pending they are ignored, so a pass never
/// re-triggers itself.
pub fn on_updated(old: &BuildConfig, current: &BuildConfig) -> bool {
    let key = current.key();
    if image_change_trigger_cleared(Some(old), Some(current)) {
        debug!(%key, "image change trigger cleared");
        return true;
    }
    if !trigger_status_in_sync(current) {
        debug!(%key, "image change trigger status out of date");
        return true;
    }
    current.config_change_pending()
}

/// Deletions never need a pass; the caller drops the key's retry history.
pub fn on_deleted(config: &BuildConfig) -> bool {
    debug!(key = %config.key(), "build config deleted");
    false
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
