// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by a reconcile pass.

use bc_core::ConfigKey;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors from handling one build configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
    #[error("failed to read build config: {0}")]
    Lookup(#[source] GatewayError),
    #[error("failed to update trigger status: {0}")]
    Persist(#[source] GatewayError),
    /// The instantiate call failed; `source` is the gateway error as returned.
    #[error("failed to instantiate build for {key}: {source}")]
    Instantiate {
        key: ConfigKey,
        #[source]
        source: GatewayError,
    },
}

impl ControllerError {
    /// Whether requeueing the key can make progress.
    ///
    /// Malformed keys and instantiations the server will never accept are
    /// dropped; everything else, conflicts included, is retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidKey(_) => false,
            Self::Lookup(e) | Self::Persist(e) => !e.is_fatal() || e.is_not_found(),
            Self::Instantiate { source, .. } => !source.is_fatal(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
