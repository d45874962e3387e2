// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The storage contract shared by every backend.

use async_trait::async_trait;
use cronmesh_core::{Job, JobHistory, JobHistoryId, JobId, Schedule, ScheduleId, Worker, WorkerId, WorkerJobCount};

use crate::error::StorageResult;

/// Persistence contract for workers, jobs, schedules and job histories.
///
/// Every method that can fail returns `StorageResult`; "not found" is
/// represented as `Ok(None)`, never as an error — mirroring the at-most-once
/// posture the engine documents above this layer.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    async fn create_worker(&self, worker: Worker) -> StorageResult<Worker>;
    async fn update_worker(&self, worker: Worker) -> StorageResult<Worker>;
    async fn get_worker(&self, worker_id: &WorkerId) -> StorageResult<Option<Worker>>;
    async fn get_workers(&self) -> StorageResult<Vec<Worker>>;
    /// Workers whose last heartbeat is within `3 * heartbeat_period` of now.
    async fn get_alive_workers(&self) -> StorageResult<Vec<Worker>>;
    async fn delete_worker(&self, worker_id: &WorkerId) -> StorageResult<()>;

    async fn create_job(&self, job: Job) -> StorageResult<Job>;
    async fn update_job(&self, job: Job) -> StorageResult<Job>;
    async fn get_job(&self, job_id: JobId) -> StorageResult<Option<Job>>;
    async fn get_job_by_name(&self, job_name: &str) -> StorageResult<Option<Job>>;
    /// The non-once job of this name, if one exists.
    async fn get_repeating_job_by_name(&self, job_name: &str) -> StorageResult<Option<Job>>;
    async fn delete_job(&self, job_id: JobId) -> StorageResult<()>;

    async fn create_job_history(&self, history: JobHistory) -> StorageResult<JobHistory>;
    async fn update_job_history(&self, history: JobHistory) -> StorageResult<JobHistory>;
    async fn get_job_history(&self, job_id: JobId) -> StorageResult<Vec<JobHistory>>;
    async fn get_job_history_with_limit(&self, job_id: JobId, limit: i64) -> StorageResult<Vec<JobHistory>>;
    /// The history row for this schedule, keyed on `schedule_id` (not `id`).
    async fn get_job_history_for_schedule(&self, schedule_id: ScheduleId) -> StorageResult<Option<JobHistory>>;
    async fn delete_job_history(&self, history_id: JobHistoryId) -> StorageResult<()>;

    async fn create_schedule(&self, schedule: Schedule) -> StorageResult<Schedule>;
    async fn update_schedule(&self, schedule: Schedule) -> StorageResult<Schedule>;
    async fn get_schedule(&self, schedule_id: ScheduleId) -> StorageResult<Option<Schedule>>;
    /// Schedules with `execution_id` in `[start, end]`, owned by `worker_id`.
    async fn get_schedule_between(&self, start: i64, end: i64, worker_id: &WorkerId) -> StorageResult<Vec<Schedule>>;
    /// Schedules with `execution_id < before`, owned by `worker_id`, whose job
    /// matches `once_only` and that have no non-failed history row yet.
    /// Ordered by `execution_id` ascending.
    async fn get_passed_schedule(&self, before: i64, worker_id: &WorkerId, once_only: bool) -> StorageResult<Vec<Schedule>>;
    async fn get_schedules_for_job(&self, job_id: JobId) -> StorageResult<Vec<Schedule>>;
    async fn delete_schedules_for_job(&self, job_id: JobId) -> StorageResult<Vec<Schedule>>;
    async fn delete_schedules_for_job_name(&self, job_name: &str, sub_name: Option<&str>) -> StorageResult<Vec<Schedule>>;

    /// Past-execution counts for this job, grouped by worker, used by the
    /// worker assignment policy.
    async fn get_worker_counts_by_job(&self, job_id: JobId) -> StorageResult<Vec<WorkerJobCount>>;
}
