// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed work queue with per-key rate-limited retries.
//!
//! A key is held by at most one worker at a time. Adding a key that is
//! already queued is a no-op; adding one that is being processed parks it
//! until [`WorkQueue::done`], after which it is queued again.

use bc_core::ConfigKey;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Exponential per-key retry delay: `base * 2^(failures - 1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { base: Duration::from_millis(5), max: Duration::from_secs(1000) }
    }
}

impl Backoff {
    /// Delay before retry number `failures` (1-based).
    pub fn delay(&self, failures: u32) -> Duration {
        let exp = failures.saturating_sub(1).min(63);
        let factor = 1u64 << exp;
        let base_ms = u64::try_from(self.base.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(factor)).min(self.max)
    }
}

#[derive(Default)]
struct QueueState {
    queue: VecDeque<ConfigKey>,
    /// Keys waiting to be processed (queued or parked behind processing).
    dirty: HashSet<ConfigKey>,
    processing: HashSet<ConfigKey>,
    failures: HashMap<ConfigKey, u32>,
    shut_down: bool,
}

/// Cloneable handle to a shared work queue.
#[derive(Clone)]
pub struct WorkQueue {
    inner: Arc<Mutex<QueueState>>,
    notify: Arc<Notify>,
    backoff: Backoff,
}

impl WorkQueue {
    pub fn new(backoff: Backoff) -> Self {
        Self { inner: Arc::default(), notify: Arc::new(Notify::new()), backoff }
    }

    pub fn add(&self, key: ConfigKey) {
        let mut state = self.inner.lock();
        if state.shut_down || !state.dirty.insert(key.clone()) {
            return;
        }
        if !state.processing.contains(&key) {
            state.queue.push_back(key);
            drop(state);
            self.notify.notify_one();
        }
    }

    /// Wait for the next key. Returns `None` once the queue is shut down.
    pub async fn get(&self) -> Option<ConfigKey> {
        loop {
            // Register before checking so a shut_down between the check and
            // the await still wakes us.
            let mut notified = std::pin::pin!(self.notify.notified());
            notified.as_mut().enable();
            {
                let mut state = self.inner.lock();
                if let Some(key) = state.queue.pop_front() {
                    state.dirty.remove(&key);
                    state.processing.insert(key.clone());
                    return Some(key);
                }
                if state.shut_down {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Release `key` after processing; requeue it if it was added meanwhile.
    pub fn done(&self, key: &ConfigKey) {
        let mut state = self.inner.lock();
        state.processing.remove(key);
        if state.dirty.contains(key) {
            state.queue.push_back(key.clone());
            drop(state);
            self.notify.notify_one();
        }
    }

    /// Add `key` again after its backoff delay. Returns the delay used.
    pub fn add_rate_limited(&self, key: ConfigKey) -> Duration {
        let failures = {
            let mut state = self.inner.lock();
            let n = state.failures.entry(key.clone()).or_insert(0);
            *n += 1;
            *n
        };
        let delay = self.backoff.delay(failures);
        let queue = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            queue.add(key);
        });
        delay
    }

    /// Clear the retry history of `key`.
    pub fn forget(&self, key: &ConfigKey) {
        self.inner.lock().failures.remove(key);
    }

    /// Number of rate-limited requeues since the last `forget`.
    pub fn num_requeues(&self, key: &ConfigKey) -> u32 {
        self.inner.lock().failures.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop accepting keys and wake every waiting worker.
    pub fn shut_down(&self) {
        self.inner.lock().shut_down = true;
        self.notify.notify_waiters();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.lock().shut_down
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new(Backoff::default())
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
