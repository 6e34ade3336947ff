// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! BuildConfig watch: turn API server events into queued keys.

use std::collections::{HashMap, HashSet};

use bc_core::{BuildConfig, ConfigKey};
use futures_util::StreamExt;
use kube::api::{Api, DynamicObject};
use kube::runtime::watcher::{self, Event};
use kube::runtime::WatchStreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::gateway::{convert, GatewayError};
use crate::handlers::{on_added, on_deleted, on_updated};
use crate::queue::WorkQueue;

/// Last observed copy of every configuration, so updates can be diffed.
#[derive(Debug, Default)]
pub struct WatchCache {
    objects: HashMap<ConfigKey, BuildConfig>,
    /// Keys seen since the current relist began.
    relist: Option<HashSet<ConfigKey>>,
}

impl WatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&BuildConfig> {
        self.objects.get(key)
    }

    /// Record an add or update. Returns whether the key should be queued.
    pub fn apply(&mut self, config: BuildConfig) -> bool {
        let key = config.key();
        if let Some(seen) = self.relist.as_mut() {
            seen.insert(key.clone());
        }
        let enqueue = match self.objects.get(&key) {
            Some(old) => on_updated(old, &config),
            None => on_added(&config),
        };
        self.objects.insert(key, config);
        enqueue
    }

    /// Record a deletion. Returns the removed key if it was known.
    pub fn delete(&mut self, config: &BuildConfig) -> Option<ConfigKey> {
        on_deleted(config);
        let key = config.key();
        self.objects.remove(&key).map(|_| key)
    }

    /// A relist started; objects not re-announced before it ends are gone.
    pub fn begin_relist(&mut self) {
        self.relist = Some(HashSet::new());
    }

    /// A relist finished. Returns keys that vanished while the watch was down.
    pub fn finish_relist(&mut self) -> Vec<ConfigKey> {
        let Some(seen) = self.relist.take() else {
            return Vec::new();
        };
        let gone: Vec<ConfigKey> =
            self.objects.keys().filter(|k| !seen.contains(*k)).cloned().collect();
        for key in &gone {
            if let Some(config) = self.objects.remove(key) {
                on_deleted(&config);
            }
        }
        gone
    }

    /// Apply one watch event, queueing or forgetting keys as needed.
    pub fn handle_event(&mut self, queue: &WorkQueue, event: Event<BuildConfig>) {
        match event {
            Event::Init => {
                debug!("build config relist started");
                self.begin_relist();
            }
            Event::InitApply(config) | Event::Apply(config) => {
                let key = config.key();
                if self.apply(config) {
                    queue.add(key);
                }
            }
            Event::InitDone => {
                let gone = self.finish_relist();
                debug!(known = self.len(), removed = gone.len(), "build config relist done");
                for key in gone {
                    queue.forget(&key);
                }
            }
            Event::Delete(config) => {
                if let Some(key) = self.delete(&config) {
                    queue.forget(&key);
                }
            }
        }
    }
}

/// Decode the objects carried by a raw watch event.
pub fn decode_event(event: Event<DynamicObject>) -> Result<Event<BuildConfig>, GatewayError> {
    Ok(match event {
        Event::Init => Event::Init,
        Event::InitDone => Event::InitDone,
        Event::InitApply(obj) => Event::InitApply(convert(&obj)?),
        Event::Apply(obj) => Event::Apply(convert(&obj)?),
        Event::Delete(obj) => Event::Delete(convert(&obj)?),
    })
}

/// Watch BuildConfigs and feed the queue until `cancel` fires.
///
/// Stream errors are retried with the watcher's default backoff.
pub async fn watch_build_configs(
    api: Api<DynamicObject>,
    queue: WorkQueue,
    cancel: CancellationToken,
) {
    info!("watching build configs");
    let mut cache = WatchCache::new();
    let mut stream = watcher::watcher(api, watcher::Config::default()).default_backoff().boxed();

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.next() => next,
        };
        match next {
            Some(Ok(event)) => match decode_event(event) {
                Ok(event) => cache.handle_event(&queue, event),
                Err(e) => warn!(error = %e, "skipping undecodable build config"),
            },
            Some(Err(e)) => warn!(error = %e, "build config watch error"),
            None => break,
        }
    }
    info!("build config watch stopped");
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
