// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the controller.

use std::time::Duration;

use crate::queue::Backoff;

/// Namespace to watch (`BC_NAMESPACE`). Unset or empty watches all namespaces.
pub fn namespace() -> Option<String> {
    std::env::var("BC_NAMESPACE").ok().filter(|s| !s.is_empty())
}

/// Number of concurrent workers (default 5)
pub fn workers() -> usize {
    std::env::var("BC_WORKERS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(5)
}

/// Rate-limited retries before a key is dropped (default 15)
pub fn max_retries() -> u32 {
    std::env::var("BC_MAX_RETRIES").ok().and_then(|s| s.parse::<u32>().ok()).unwrap_or(15)
}

/// Retry backoff from `BC_RETRY_BASE_MS` / `BC_RETRY_MAX_MS`.
pub fn backoff() -> Backoff {
    let default = Backoff::default();
    let ms = |var: &str| std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok());
    Backoff {
        base: ms("BC_RETRY_BASE_MS").map(Duration::from_millis).unwrap_or(default.base),
        max: ms("BC_RETRY_MAX_MS").map(Duration::from_millis).unwrap_or(default.max),
    }
}

/// Tracing filter directive (`BC_LOG`, default `info`)
pub fn log_filter() -> String {
    std::env::var("BC_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub namespace: Option<String>,
    pub workers: usize,
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { namespace: None, workers: 5, max_retries: 15, backoff: Backoff::default() }
    }
}

impl ControllerConfig {
    pub fn from_env() -> Self {
        Self {
            namespace: namespace(),
            workers: workers(),
            max_retries: max_retries(),
            backoff: backoff(),
        }
    }

    bc_core::setters! {
        set { workers: usize, max_retries: u32, backoff: Backoff }
        option { namespace: String }
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
