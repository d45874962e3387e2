// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared schedule-processing logic used by both the hot-path and
//! past-schedule watchers.

use std::sync::Arc;

use cronmesh_core::job_data::{self, JobData};
use cronmesh_core::{Clock, JobHistory, JobHistoryStatus, Schedule, WorkerId};
use cronmesh_storage::Repository;

use crate::assignment::pick_next_worker;
use crate::cron_expr;
use crate::dispatcher;
use crate::registry::JobRegistry;

/// Load each schedule's job, dispatch it, and (for recurring jobs) enqueue
/// the next occurrence.
///
/// A schedule whose job has gone missing, or whose job name has no
/// registry entry, is skipped — the latter also flips any existing
/// `JobHistory` row for it to `Failed`.
pub async fn process_schedules<C: Clock>(
    repository: &Arc<dyn Repository>,
    registry: &JobRegistry,
    clock: &C,
    this_worker: &WorkerId,
    schedules: Vec<Schedule>,
) {
    if schedules.is_empty() {
        return;
    }

    let alive_workers = match repository.get_alive_workers().await {
        Ok(workers) => workers,
        Err(error) => {
            tracing::error!(%error, "failed to load alive workers");
            return;
        }
    };

    for schedule in schedules {
        process_one(repository, registry, clock, this_worker, &alive_workers, schedule).await;
    }
}

async fn process_one<C: Clock>(
    repository: &Arc<dyn Repository>,
    registry: &JobRegistry,
    clock: &C,
    this_worker: &WorkerId,
    alive_workers: &[cronmesh_core::Worker],
    schedule: Schedule,
) {
    let job = match repository.get_job(schedule.job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => return,
        Err(error) => {
            tracing::error!(%error, job_id = %schedule.job_id, "failed to load job for schedule");
            return;
        }
    };

    if !registry.contains(&job.job_name) {
        tracing::error!(job_name = %job.job_name, "no registry entry for scheduled job");
        if let Ok(Some(mut history)) = repository.get_job_history_for_schedule(schedule.id).await {
            history.status = JobHistoryStatus::Failed;
            history.updated_at = clock.now();
            let _ = repository.update_job_history(history).await;
        }
        return;
    }

    let history = match repository.get_job_history_for_schedule(schedule.id).await {
        Ok(Some(mut history)) if history.status == JobHistoryStatus::New => {
            history.status = JobHistoryStatus::InProgress;
            history.updated_at = clock.now();
            match repository.update_job_history(history).await {
                Ok(history) => history,
                Err(error) => {
                    tracing::error!(%error, "failed to advance job history to in-progress");
                    return;
                }
            }
        }
        Ok(Some(history)) => history,
        Ok(None) => {
            let now = clock.now();
            let fresh = JobHistory {
                id: cronmesh_core::JobHistoryId::new(0),
                job_id: schedule.job_id,
                schedule_id: schedule.id,
                worker_id: this_worker.clone(),
                status: JobHistoryStatus::New,
                retry_count: 0,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            let mut created = match repository.create_job_history(fresh).await {
                Ok(history) => history,
                Err(error) => {
                    tracing::error!(%error, "failed to create job history");
                    return;
                }
            };
            created.status = JobHistoryStatus::InProgress;
            created.updated_at = clock.now();
            match repository.update_job_history(created).await {
                Ok(history) => history,
                Err(error) => {
                    tracing::error!(%error, "failed to advance job history to in-progress");
                    return;
                }
            }
        }
        Err(error) => {
            tracing::error!(%error, "failed to load job history for schedule");
            return;
        }
    };

    let job_instance = match registry.build(&job.job_name) {
        Some(job) => job,
        None => return,
    };

    let outcome = dispatcher::dispatch(job_instance, schedule.job_data.clone()).await;

    let mut finished = history;
    finished.status = outcome.status;
    finished.updated_at = clock.now();
    if let Err(error) = repository.update_job_history(finished).await {
        tracing::error!(%error, "failed to finalize job history");
    }

    if job.is_one_shot() {
        return;
    }

    let next_data: JobData = outcome.job_data.unwrap_or_default();
    let encoded = job_data::encode(&next_data).unwrap_or_default();

    let next_at = match cron_expr::next_occurrence(&job.cron_expression, clock.now()) {
        Ok(at) => at,
        Err(error) => {
            tracing::error!(%error, job_name = %job.job_name, "failed to compute next occurrence");
            return;
        }
    };

    let counts = match repository.get_worker_counts_by_job(job.id).await {
        Ok(counts) => counts,
        Err(error) => {
            tracing::error!(%error, "failed to load worker counts");
            Vec::new()
        }
    };
    let next_worker = pick_next_worker(&counts, alive_workers, &schedule.worker_id);

    let now = clock.now();
    let next_schedule = Schedule {
        id: cronmesh_core::ScheduleId::new(0),
        execution_id: next_at.timestamp_nanos_opt().unwrap_or(i64::MAX),
        job_id: job.id,
        worker_id: next_worker,
        job_data: encoded,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    if let Err(error) = repository.create_schedule(next_schedule).await {
        tracing::error!(%error, "failed to enqueue next schedule");
    }
}
