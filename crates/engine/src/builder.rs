// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Construct a [`Job`](cronmesh_core::Job) row and its first
//! [`Schedule`](cronmesh_core::Schedule) from a user request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cronmesh_core::job_data::{self, JobData};
use cronmesh_core::{Clock, Job as JobEntity, Schedule, SchedulerError, WorkerId};
use cronmesh_storage::Repository;

use crate::cron_expr;
use crate::registry::{Job, JobRegistry};

/// Builds a job (and its first schedule) for a given job name, owned by
/// the worker doing the building.
///
/// Holds the factory the caller supplied to `Engine::new_job` so it can
/// register it in the shared [`JobRegistry`] at the same point the source
/// registered a job's reflected type: immediately before the build actually
/// persists anything, not when the request object is constructed.
pub struct JobBuilder<C: Clock> {
    repository: Arc<dyn Repository>,
    registry: JobRegistry,
    clock: C,
    this_worker: WorkerId,
    job_name: String,
    sub_name: Option<String>,
    job_data: JobData,
    factory: Box<dyn Fn() -> Box<dyn Job> + Send + Sync>,
}

impl<C: Clock> JobBuilder<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: Arc<dyn Repository>,
        registry: JobRegistry,
        clock: C,
        this_worker: WorkerId,
        job_name: impl Into<String>,
        job_data: JobData,
        sub_name: Option<String>,
        factory: impl Fn() -> Box<dyn Job> + Send + Sync + 'static,
    ) -> Self {
        Self {
            repository,
            registry,
            clock,
            this_worker,
            job_name: job_name.into(),
            sub_name,
            job_data,
            factory: Box::new(factory),
        }
    }

    /// Build a recurring job on the given cron expression.
    pub async fn build(self, cron_expression: &str) -> Result<JobEntity, SchedulerError> {
        let next = cron_expr::next_occurrence(cron_expression, self.clock.now())?;
        self.build_first_schedule(cron_expression.to_string(), false, next).await
    }

    /// Build a one-shot job that fires at exactly `t`.
    pub async fn build_to_run_at(self, t: DateTime<Utc>) -> Result<JobEntity, SchedulerError> {
        self.build_first_schedule(String::new(), true, t).await
    }

    /// Build a one-shot job that fires after `duration` elapses.
    pub async fn build_to_run_in(self, duration: chrono::Duration) -> Result<JobEntity, SchedulerError> {
        let at = self.clock.now() + duration;
        self.build_to_run_at(at).await
    }

    /// Build a one-shot job that fires as soon as a watcher observes it.
    pub async fn build_to_run_now(self) -> Result<JobEntity, SchedulerError> {
        let now = self.clock.now();
        self.build_to_run_at(now).await
    }

    async fn build_first_schedule(
        self,
        cron_expression: String,
        once: bool,
        execution_at: DateTime<Utc>,
    ) -> Result<JobEntity, SchedulerError> {
        let now = self.clock.now();
        let encoded_data = job_data::encode(&self.job_data).map_err(|e| SchedulerError::PersistenceFailure(e.into()))?;

        // Register the job's factory before touching the store — a failed
        // build still leaves the registry able to dispatch a retried build.
        self.registry.register(self.job_name.clone(), self.factory);

        // (I1): a new recurring job with the same name replaces the
        // schedules of any pre-existing recurring job of that name.
        if !once {
            if let Some(existing) = self
                .repository
                .get_repeating_job_by_name(&self.job_name)
                .await
                .map_err(|e| SchedulerError::PersistenceFailure(e.into()))?
            {
                self.repository
                    .delete_schedules_for_job_name(&existing.job_name, existing.sub_name.as_deref())
                    .await
                    .map_err(|e| SchedulerError::PersistenceFailure(e.into()))?;
            }
        }

        let job = JobEntity {
            id: cronmesh_core::JobId::new(0),
            job_name: self.job_name.clone(),
            sub_name: self.sub_name.clone(),
            cron_expression,
            once,
            expired: false,
            job_data: encoded_data.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let job = self
            .repository
            .create_job(job)
            .await
            .map_err(|e| SchedulerError::PersistenceFailure(e.into()))?;

        let schedule = Schedule {
            id: cronmesh_core::ScheduleId::new(0),
            execution_id: execution_at.timestamp_nanos_opt().unwrap_or(i64::MAX),
            job_id: job.id,
            worker_id: self.this_worker.clone(),
            job_data: encoded_data,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.repository.create_schedule(schedule).await.map_err(|e| SchedulerError::PersistenceFailure(e.into()))?;

        Ok(job)
    }
}

/// Delete all schedules matching `job_name`/`sub_name`.
///
/// A nonexistent job is not an error — the delete query simply matches no
/// rows.
pub async fn cancel_job(repository: &dyn Repository, job_name: &str, sub_name: Option<&str>) -> Result<(), SchedulerError> {
    repository
        .delete_schedules_for_job_name(job_name, sub_name)
        .await
        .map(|_| ())
        .map_err(|e| SchedulerError::PersistenceFailure(e.into()))
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
