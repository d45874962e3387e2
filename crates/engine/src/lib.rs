// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cronmesh-engine: the scheduling engine.
//!
//! [`Engine`] is the one handle client code needs: it registers this
//! worker, starts the three background watchers (heartbeat, schedule,
//! past-schedule), and exposes the job builder (`new_job`), cancellation
//! (`cancel_job`) and shutdown (`stop_watcher`) surface described in the
//! scheduler's external interface.

pub mod assignment;
pub mod builder;
pub mod cron_expr;
pub mod dispatcher;
pub mod past_schedule_watcher;
pub mod registry;
pub mod schedule_watcher;
pub mod watch;
pub mod worker_watcher;

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use cronmesh_core::{Clock, EngineConfig, Job as JobEntity, JobData, SchedulerError, StoreKind, SystemClock, WorkerId};
use cronmesh_storage::{MemoryRepository, Repository, SqlRepository};
use tokio_util::sync::CancellationToken;

pub use registry::{Job, JobRegistry};

/// The four scheduling directives a built job can be registered under,
/// returned by [`Engine::new_job`].
pub struct NewJobRequest<C: Clock> {
    inner: builder::JobBuilder<C>,
}

impl<C: Clock> NewJobRequest<C> {
    /// Recurring, on a six-field cron expression (sec, min, hour, dom, month, dow).
    pub async fn build(self, cron_expression: &str) -> Result<JobEntity, SchedulerError> {
        self.inner.build(cron_expression).await
    }

    /// One-shot, firing at exactly `t`.
    pub async fn build_to_run_at(self, t: DateTime<Utc>) -> Result<JobEntity, SchedulerError> {
        self.inner.build_to_run_at(t).await
    }

    /// One-shot, firing after `duration` elapses.
    pub async fn build_to_run_in(self, duration: ChronoDuration) -> Result<JobEntity, SchedulerError> {
        self.inner.build_to_run_in(duration).await
    }

    /// One-shot, firing as soon as a watcher next observes it.
    pub async fn build_to_run_now(self) -> Result<JobEntity, SchedulerError> {
        self.inner.build_to_run_now().await
    }
}

/// A running scheduler instance for one worker process.
///
/// Owns the repository handle, the job registry, and the join handles of
/// the three background watchers. There is no `Clone` impl — the engine
/// owns its watchers' lifetime; wrap it in an `Arc` if several call sites
/// need to register jobs against the same running instance.
pub struct Engine<C: Clock = SystemClock> {
    repository: Arc<dyn Repository>,
    registry: JobRegistry,
    clock: C,
    this_worker: WorkerId,
    cancel: CancellationToken,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Engine<SystemClock> {
    /// Start the engine under the real wall clock, deriving the worker id
    /// from this process's host name.
    pub async fn start(config: EngineConfig) -> Result<Self, SchedulerError> {
        Self::start_with(config, WorkerId::from_hostname(), SystemClock).await
    }

    /// Start the engine under the real wall clock with an explicit worker id.
    pub async fn start_as(config: EngineConfig, worker_id: WorkerId) -> Result<Self, SchedulerError> {
        Self::start_with(config, worker_id, SystemClock).await
    }
}

impl<C: Clock> Engine<C> {
    /// Start the engine against an injected [`Clock`] — the seam tests use
    /// to drive ticks deterministically instead of sleeping on wall time.
    pub async fn start_with(config: EngineConfig, worker_id: WorkerId, clock: C) -> Result<Self, SchedulerError> {
        let heartbeat_period =
            ChronoDuration::from_std(config.heartbeat_period).unwrap_or(ChronoDuration::seconds(30));

        let repository: Arc<dyn Repository> = match config.store_kind {
            StoreKind::Memory => Arc::new(MemoryRepository::new(clock.clone(), heartbeat_period)),
            StoreKind::Database => Arc::new(
                SqlRepository::connect_with_heartbeat(
                    &config.connection_url,
                    config.table_prefix.clone(),
                    config.log_level,
                    heartbeat_period,
                )
                .await
                .map_err(|e| SchedulerError::PersistenceFailure(e.into()))?,
            ),
        };

        let registry = JobRegistry::new();
        let cancel = CancellationToken::new();

        let mut handles = vec![
            worker_watcher::start(
                repository.clone(),
                clock.clone(),
                worker_id.clone(),
                config.heartbeat_period,
                cancel.clone(),
            )
            .await
            .map_err(|e| SchedulerError::PersistenceFailure(e.into()))?,
        ];

        handles.push(schedule_watcher::spawn(
            repository.clone(),
            registry.clone(),
            clock.clone(),
            worker_id.clone(),
            config.tick_duration,
            config.run_immediately,
            cancel.clone(),
        ));

        if config.watch_past {
            handles.push(past_schedule_watcher::spawn(
                repository.clone(),
                registry.clone(),
                clock.clone(),
                worker_id.clone(),
                config.tick_duration,
                cancel.clone(),
            ));
        }

        tracing::info!(worker_id = %worker_id, watch_past = config.watch_past, "engine started");

        Ok(Self { repository, registry, clock, this_worker: worker_id, cancel, handles })
    }

    pub fn worker_id(&self) -> &WorkerId {
        &self.this_worker
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    /// Register `factory` under `job_name` and return a request offering
    /// the four scheduling directives (`build`, `build_to_run_at`,
    /// `build_to_run_in`, `build_to_run_now`).
    ///
    /// `job_data` seeds the first occurrence's snapshot; pass an empty map
    /// for a job with no carried-forward state.
    pub fn new_job(
        &self,
        job_name: impl Into<String>,
        job_data: JobData,
        sub_name: Option<String>,
        factory: impl Fn() -> Box<dyn Job> + Send + Sync + 'static,
    ) -> NewJobRequest<C> {
        NewJobRequest {
            inner: builder::JobBuilder::new(
                self.repository.clone(),
                self.registry.clone(),
                self.clock.clone(),
                self.this_worker.clone(),
                job_name,
                job_data,
                sub_name,
                factory,
            ),
        }
    }

    /// Delete all schedules matching `job_name`/`sub_name`. A nonexistent
    /// job is not an error — the underlying delete simply matches no rows.
    pub async fn cancel_job(&self, job_name: &str, sub_name: Option<&str>) -> Result<(), SchedulerError> {
        builder::cancel_job(self.repository.as_ref(), job_name, sub_name).await
    }

    /// Stop all background watchers and wait for any in-flight tick (and
    /// any user `Execute` it is running) to finish. Consumes the engine —
    /// a stopped engine cannot be resumed.
    pub async fn stop_watcher(mut self) {
        self.cancel.cancel();
        for handle in self.handles.drain(..) {
            if let Err(error) = handle.await {
                tracing::warn!(%error, "watcher task did not shut down cleanly");
            }
        }
        tracing::info!(worker_id = %self.this_worker, "engine stopped");
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
