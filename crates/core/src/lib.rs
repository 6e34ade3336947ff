// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bc-core: BuildConfig model and pure trigger bookkeeping

pub mod macros;

pub mod build_config;
pub mod cleared;
pub mod key;
pub mod reconcile;
pub mod request;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use build_config::{
    image_stream_tag, BuildConfig, BuildConfigSpec, BuildConfigStatus, BuildStrategy,
    ImageChangeTrigger, ImageChangeTriggerStatus, StrategyInput, TriggerPolicy, API_VERSION,
    BUILD_CONFIG_KIND, IMAGE_STREAM_TAG_KIND,
};
pub use cleared::image_change_trigger_cleared;
pub use key::ConfigKey;
pub use reconcile::{
    image_change_trigger_statuses, reconcile_trigger_status, trigger_status_in_sync,
};
pub use request::{builds_selector, Build, BuildRequest, BuildTriggerCause, BUILD_CONFIG_LABEL};
