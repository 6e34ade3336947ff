// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! bc-controller: BuildConfig trigger controller
//!
//! Watches build configurations, keeps their image-change trigger status in
//! step with the spec and starts the first build for config-change triggers.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod controller;
pub mod env;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod queue;
pub mod runner;
pub mod watch;

pub use controller::{BuildConfigController, Handled};
pub use env::ControllerConfig;
pub use error::ControllerError;
pub use gateway::{
    BuildConfigLister, BuildConfigUpdater, BuildInstantiator, BuildLister, Gateway, GatewayError,
    KubeGateway,
};
pub use queue::{Backoff, WorkQueue};
pub use runner::{handle_result, run_worker, run_workers, Disposition};
pub use watch::{watch_build_configs, WatchCache};
