// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic worker heartbeat.

use std::sync::Arc;
use std::time::Duration;

use cronmesh_core::{Clock, Worker, WorkerId};
use cronmesh_storage::Repository;
use tokio_util::sync::CancellationToken;

/// Create (or revive) this worker's row, then spawn a background task that
/// refreshes its `updated_at` every `heartbeat_period`.
pub async fn start<C: Clock>(
    repository: Arc<dyn Repository>,
    clock: C,
    this_worker: WorkerId,
    heartbeat_period: Duration,
    cancel: CancellationToken,
) -> Result<tokio::task::JoinHandle<()>, cronmesh_storage::StorageError> {
    let now = clock.now();
    let worker = match repository.get_worker(&this_worker).await? {
        Some(mut existing) => {
            existing.updated_at = now;
            existing.deleted_at = None;
            repository.update_worker(existing).await?
        }
        None => repository.create_worker(Worker::new(this_worker.clone(), now)).await?,
    };
    let _ = worker;

    Ok(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(heartbeat_period);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    let now = clock.now();
                    match repository.get_worker(&this_worker).await {
                        Ok(Some(mut worker)) => {
                            worker.updated_at = now;
                            if let Err(error) = repository.update_worker(worker).await {
                                tracing::error!(%error, "failed to refresh worker heartbeat");
                            }
                        }
                        Ok(None) => {
                            if let Err(error) = repository.create_worker(Worker::new(this_worker.clone(), now)).await {
                                tracing::error!(%error, "failed to recreate worker on heartbeat");
                            }
                        }
                        Err(error) => tracing::error!(%error, "failed to load worker for heartbeat"),
                    }
                }
            }
        }
    }))
}
