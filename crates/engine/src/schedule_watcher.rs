// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hot-path watcher: claims due schedules for this worker and executes them.

use std::sync::Arc;
use std::time::Duration;

use cronmesh_core::{Clock, WorkerId};
use cronmesh_storage::Repository;
use tokio_util::sync::CancellationToken;

use crate::registry::JobRegistry;
use crate::watch::process_schedules;

/// Spawn the hot-path watcher as a background task.
///
/// Each tick claims schedules with `execution_id` in the inclusive window
/// `[now - tick_duration, now]`, owned by `this_worker`. Fires once at
/// startup before the first tick iff `run_immediately`.
pub fn spawn<C: Clock>(
    repository: Arc<dyn Repository>,
    registry: JobRegistry,
    clock: C,
    this_worker: WorkerId,
    tick_duration: Duration,
    run_immediately: bool,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let tick = chrono::Duration::from_std(tick_duration).unwrap_or(chrono::Duration::seconds(60));

        let run_once = |repository: &Arc<dyn Repository>, registry: &JobRegistry, clock: &C, this_worker: &WorkerId| {
            let repository = repository.clone();
            let registry = registry.clone();
            let clock = clock.clone();
            let this_worker = this_worker.clone();
            async move {
                let now = clock.now();
                let window_start = (now - tick).timestamp_nanos_opt().unwrap_or(i64::MIN);
                let window_end = now.timestamp_nanos_opt().unwrap_or(i64::MAX);
                match repository.get_schedule_between(window_start, window_end, &this_worker).await {
                    Ok(schedules) => process_schedules(&repository, &registry, &clock, &this_worker, schedules).await,
                    Err(error) => tracing::error!(%error, "failed to load due schedules"),
                }
            }
        };

        if run_immediately {
            run_once(&repository, &registry, &clock, &this_worker).await;
        }

        let mut ticker = tokio::time::interval(tick_duration);
        ticker.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => run_once(&repository, &registry, &clock, &this_worker).await,
            }
        }
    })
}
