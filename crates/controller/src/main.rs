// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! bcd: BuildConfig trigger controller daemon

use std::process::ExitCode;
use std::sync::Arc;

use bc_controller::{
    env, run_workers, watch_build_configs, BuildConfigController, ControllerConfig, KubeGateway,
    WorkQueue,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(env::log_filter())).init();

    let config = ControllerConfig::from_env();
    info!(
        namespace = config.namespace.as_deref().unwrap_or("*"),
        workers = config.workers,
        max_retries = config.max_retries,
        "starting build config controller"
    );

    let gateway = match KubeGateway::try_default().await {
        Ok(gateway) => gateway,
        Err(e) => {
            error!(error = %e, "cannot reach the API server");
            return ExitCode::FAILURE;
        }
    };
    let api = gateway.build_configs(config.namespace.as_deref());
    let queue = WorkQueue::new(config.backoff);
    let controller = Arc::new(BuildConfigController::new(gateway));
    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
            cancel.cancel();
        }
    });

    let watch = tokio::spawn(watch_build_configs(api, queue.clone(), cancel.clone()));
    run_workers(controller, queue, &config, cancel).await;
    if let Err(e) = watch.await {
        error!(error = %e, "watch task failed");
    }
    ExitCode::SUCCESS
}
