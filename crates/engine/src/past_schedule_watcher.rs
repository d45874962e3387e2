// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Past-schedule watcher: reclaims missed one-shots after a restart.

use std::sync::Arc;
use std::time::Duration;

use cronmesh_core::{Clock, WorkerId};
use cronmesh_storage::Repository;
use tokio_util::sync::CancellationToken;

use crate::registry::JobRegistry;
use crate::watch::process_schedules;

/// Spawn the past-schedule watcher as a background task.
///
/// Queries `GetPassedSchedule(now, this_worker, once_only=true)` on every
/// tick (including immediately at startup, unconditionally — unlike the
/// hot-path watcher, there is no `run_immediately` gate here, since a
/// restarted worker should reclaim missed one-shots as soon as possible).
/// The repository's query already excludes schedules with a non-failed
/// history row, making this watcher idempotent with the hot-path watcher.
pub fn spawn<C: Clock>(
    repository: Arc<dyn Repository>,
    registry: JobRegistry,
    clock: C,
    this_worker: WorkerId,
    tick_duration: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let run_once = |repository: &Arc<dyn Repository>, registry: &JobRegistry, clock: &C, this_worker: &WorkerId| {
            let repository = repository.clone();
            let registry = registry.clone();
            let clock = clock.clone();
            let this_worker = this_worker.clone();
            async move {
                let before = clock.now().timestamp_nanos_opt().unwrap_or(i64::MAX);
                match repository.get_passed_schedule(before, &this_worker, true).await {
                    Ok(schedules) => process_schedules(&repository, &registry, &clock, &this_worker, schedules).await,
                    Err(error) => tracing::error!(%error, "failed to load passed schedules"),
                }
            }
        };

        run_once(&repository, &registry, &clock, &this_worker).await;

        let mut ticker = tokio::time::interval(tick_duration);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => run_once(&repository, &registry, &clock, &this_worker).await,
            }
        }
    })
}
