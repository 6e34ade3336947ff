// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker loop: pull keys, run a pass, apply the retry policy.

use std::sync::Arc;

use bc_core::ConfigKey;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::{BuildConfigController, Handled};
use crate::env::ControllerConfig;
use crate::error::ControllerError;
use crate::gateway::Gateway;
use crate::queue::WorkQueue;

/// What happened to a key after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Done,
    Requeued,
    Dropped,
}

/// Apply the retry policy to the outcome of a pass over `key`.
pub fn handle_result(
    queue: &WorkQueue,
    key: &ConfigKey,
    result: Result<Option<Handled>, ControllerError>,
    max_retries: u32,
) -> Disposition {
    let err = match result {
        Ok(_) => {
            queue.forget(key);
            return Disposition::Done;
        }
        Err(err) => err,
    };

    if !err.is_retryable() {
        warn!(%key, error = %err, "giving up on build config");
        queue.forget(key);
        return Disposition::Dropped;
    }

    let retries = queue.num_requeues(key);
    if retries < max_retries {
        let delay = queue.add_rate_limited(key.clone());
        info!(%key, error = %err, retries, ?delay, "error syncing build config, requeueing");
        Disposition::Requeued
    } else {
        warn!(%key, error = %err, retries, "dropping build config out of the queue");
        queue.forget(key);
        Disposition::Dropped
    }
}

/// Process keys until the queue shuts down or `cancel` fires.
pub async fn run_worker<G: Gateway>(
    id: usize,
    controller: Arc<BuildConfigController<G>>,
    queue: WorkQueue,
    max_retries: u32,
    cancel: CancellationToken,
) {
    debug!(worker = id, "worker started");
    loop {
        let key = tokio::select! {
            _ = cancel.cancelled() => break,
            key = queue.get() => match key {
                Some(key) => key,
                None => break,
            },
        };
        let result = controller.sync(&key).await;
        handle_result(&queue, &key, result, max_retries);
        queue.done(&key);
    }
    debug!(worker = id, "worker stopped");
}

/// Run `config.workers` workers to completion. Cancelling shuts the queue down.
pub async fn run_workers<G: Gateway>(
    controller: Arc<BuildConfigController<G>>,
    queue: WorkQueue,
    config: &ControllerConfig,
    cancel: CancellationToken,
) {
    info!(workers = config.workers, "starting build config workers");
    let mut set = JoinSet::new();
    for id in 0..config.workers {
        set.spawn(run_worker(
            id,
            Arc::clone(&controller),
            queue.clone(),
            config.max_retries,
            cancel.clone(),
        ));
    }

    cancel.cancelled().await;
    queue.shut_down();
    while let Some(res) = set.join_next().await {
        if let Err(e) = res {
            warn!(error = %e, "worker task failed");
        }
    }
    info!("build config workers stopped");
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
