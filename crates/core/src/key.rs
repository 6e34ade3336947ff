// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work-queue key for a build configuration.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// `namespace/name` of a build configuration.
///
/// Cluster-scoped lookups are never needed, so an empty namespace is kept
/// as a bare `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigKey(String);

impl ConfigKey {
    pub fn new(namespace: &str, name: &str) -> Self {
        if namespace.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}/{}", namespace, name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(namespace, name)`. Returns `None` for an empty name.
    pub fn split(&self) -> Option<(&str, &str)> {
        let (ns, name) = match self.0.split_once('/') {
            Some((ns, name)) => (ns, name),
            None => ("", self.0.as_str()),
        };
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some((ns, name))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<&str> for ConfigKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for ConfigKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
