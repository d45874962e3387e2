// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A genuine in-process [`Repository`], backed by locked hash maps rather
//! than a database connection.
//!
//! This is the implementation behind [`cronmesh_core::StoreKind::Memory`].
//! State never outlives the process — there is no file or socket behind
//! it, unlike the upstream scheduler's "memory" mode, which was actually a
//! SQLite file in disguise.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use cronmesh_core::{
    Clock, Job, JobHistory, JobHistoryId, JobHistoryStatus, JobId, Schedule, ScheduleId, Worker,
    WorkerId, WorkerJobCount,
};
use parking_lot::RwLock;

use crate::error::StorageResult;
use crate::repository::Repository;

#[derive(Default)]
struct Tables {
    workers: HashMap<WorkerId, Worker>,
    jobs: HashMap<JobId, Job>,
    schedules: HashMap<ScheduleId, Schedule>,
    histories: HashMap<JobHistoryId, JobHistory>,
}

pub struct MemoryRepository<C: Clock> {
    clock: C,
    heartbeat_period: chrono::Duration,
    tables: RwLock<Tables>,
    next_job_id: AtomicI64,
    next_schedule_id: AtomicI64,
    next_history_id: AtomicI64,
}

impl<C: Clock> MemoryRepository<C> {
    pub fn new(clock: C, heartbeat_period: chrono::Duration) -> Self {
        Self {
            clock,
            heartbeat_period,
            tables: RwLock::new(Tables::default()),
            next_job_id: AtomicI64::new(1),
            next_schedule_id: AtomicI64::new(1),
            next_history_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl<C: Clock> Repository for MemoryRepository<C> {
    async fn create_worker(&self, worker: Worker) -> StorageResult<Worker> {
        let mut tables = self.tables.write();
        tables.workers.insert(worker.worker_id.clone(), worker.clone());
        Ok(worker)
    }

    async fn update_worker(&self, worker: Worker) -> StorageResult<Worker> {
        let mut tables = self.tables.write();
        tables.workers.insert(worker.worker_id.clone(), worker.clone());
        Ok(worker)
    }

    async fn get_worker(&self, worker_id: &WorkerId) -> StorageResult<Option<Worker>> {
        Ok(self.tables.read().workers.get(worker_id).cloned())
    }

    async fn get_workers(&self) -> StorageResult<Vec<Worker>> {
        Ok(self.tables.read().workers.values().cloned().collect())
    }

    async fn get_alive_workers(&self) -> StorageResult<Vec<Worker>> {
        let now = self.clock.now();
        Ok(self
            .tables
            .read()
            .workers
            .values()
            .filter(|w| w.is_alive(now, self.heartbeat_period))
            .cloned()
            .collect())
    }

    async fn delete_worker(&self, worker_id: &WorkerId) -> StorageResult<()> {
        self.tables.write().workers.remove(worker_id);
        Ok(())
    }

    async fn create_job(&self, mut job: Job) -> StorageResult<Job> {
        let id = JobId::new(self.next_job_id.fetch_add(1, Ordering::SeqCst));
        job.id = id;
        let mut tables = self.tables.write();
        tables.jobs.insert(id, job.clone());
        Ok(job)
    }

    async fn update_job(&self, job: Job) -> StorageResult<Job> {
        let mut tables = self.tables.write();
        tables.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job(&self, job_id: JobId) -> StorageResult<Option<Job>> {
        Ok(self.tables.read().jobs.get(&job_id).cloned())
    }

    async fn get_job_by_name(&self, job_name: &str) -> StorageResult<Option<Job>> {
        Ok(self
            .tables
            .read()
            .jobs
            .values()
            .find(|j| j.job_name == job_name && j.deleted_at.is_none())
            .cloned())
    }

    async fn get_repeating_job_by_name(&self, job_name: &str) -> StorageResult<Option<Job>> {
        Ok(self
            .tables
            .read()
            .jobs
            .values()
            .find(|j| j.job_name == job_name && !j.once && j.deleted_at.is_none())
            .cloned())
    }

    async fn delete_job(&self, job_id: JobId) -> StorageResult<()> {
        let mut tables = self.tables.write();
        tables.jobs.remove(&job_id);
        tables.schedules.retain(|_, s| s.job_id != job_id);
        Ok(())
    }

    async fn create_job_history(&self, mut history: JobHistory) -> StorageResult<JobHistory> {
        let id = JobHistoryId::new(self.next_history_id.fetch_add(1, Ordering::SeqCst));
        history.id = id;
        let mut tables = self.tables.write();
        tables.histories.insert(id, history.clone());
        Ok(history)
    }

    async fn update_job_history(&self, history: JobHistory) -> StorageResult<JobHistory> {
        let mut tables = self.tables.write();
        tables.histories.insert(history.id, history.clone());
        Ok(history)
    }

    async fn get_job_history(&self, job_id: JobId) -> StorageResult<Vec<JobHistory>> {
        Ok(self
            .tables
            .read()
            .histories
            .values()
            .filter(|h| h.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn get_job_history_with_limit(&self, job_id: JobId, limit: i64) -> StorageResult<Vec<JobHistory>> {
        let mut rows: Vec<JobHistory> = self
            .tables
            .read()
            .histories
            .values()
            .filter(|h| h.job_id == job_id)
            .cloned()
            .collect();
        rows.sort_by_key(|h| h.id.get());
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn get_job_history_for_schedule(&self, schedule_id: ScheduleId) -> StorageResult<Option<JobHistory>> {
        Ok(self
            .tables
            .read()
            .histories
            .values()
            .find(|h| h.schedule_id == schedule_id)
            .cloned())
    }

    async fn delete_job_history(&self, history_id: JobHistoryId) -> StorageResult<()> {
        self.tables.write().histories.remove(&history_id);
        Ok(())
    }

    async fn create_schedule(&self, mut schedule: Schedule) -> StorageResult<Schedule> {
        let id = ScheduleId::new(self.next_schedule_id.fetch_add(1, Ordering::SeqCst));
        schedule.id = id;
        let mut tables = self.tables.write();
        tables.schedules.insert(id, schedule.clone());
        Ok(schedule)
    }

    async fn update_schedule(&self, schedule: Schedule) -> StorageResult<Schedule> {
        let mut tables = self.tables.write();
        tables.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn get_schedule(&self, schedule_id: ScheduleId) -> StorageResult<Option<Schedule>> {
        Ok(self.tables.read().schedules.get(&schedule_id).cloned())
    }

    async fn get_schedule_between(&self, start: i64, end: i64, worker_id: &WorkerId) -> StorageResult<Vec<Schedule>> {
        let mut rows: Vec<Schedule> = self
            .tables
            .read()
            .schedules
            .values()
            .filter(|s| {
                s.deleted_at.is_none()
                    && s.execution_id >= start
                    && s.execution_id <= end
                    && &s.worker_id == worker_id
            })
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.execution_id);
        Ok(rows)
    }

    async fn get_passed_schedule(&self, before: i64, worker_id: &WorkerId, once_only: bool) -> StorageResult<Vec<Schedule>> {
        let tables = self.tables.read();
        let mut rows: Vec<Schedule> = tables
            .schedules
            .values()
            .filter(|s| {
                if s.deleted_at.is_some() || s.execution_id >= before || &s.worker_id != worker_id {
                    return false;
                }
                let Some(job) = tables.jobs.get(&s.job_id) else {
                    return false;
                };
                if job.once != once_only {
                    return false;
                }
                !tables
                    .histories
                    .values()
                    .any(|h| h.schedule_id == s.id && h.status != JobHistoryStatus::Failed)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.execution_id);
        Ok(rows)
    }

    async fn get_schedules_for_job(&self, job_id: JobId) -> StorageResult<Vec<Schedule>> {
        Ok(self
            .tables
            .read()
            .schedules
            .values()
            .filter(|s| s.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn delete_schedules_for_job(&self, job_id: JobId) -> StorageResult<Vec<Schedule>> {
        let mut tables = self.tables.write();
        let removed: Vec<Schedule> = tables
            .schedules
            .values()
            .filter(|s| s.job_id == job_id)
            .cloned()
            .collect();
        tables.schedules.retain(|_, s| s.job_id != job_id);
        Ok(removed)
    }

    async fn delete_schedules_for_job_name(&self, job_name: &str, sub_name: Option<&str>) -> StorageResult<Vec<Schedule>> {
        let mut tables = self.tables.write();
        let job_ids: Vec<JobId> = tables
            .jobs
            .values()
            .filter(|j| j.job_name == job_name && j.sub_name.as_deref() == sub_name)
            .map(|j| j.id)
            .collect();
        let removed: Vec<Schedule> = tables
            .schedules
            .values()
            .filter(|s| job_ids.contains(&s.job_id))
            .cloned()
            .collect();
        tables.schedules.retain(|_, s| !job_ids.contains(&s.job_id));
        Ok(removed)
    }

    async fn get_worker_counts_by_job(&self, job_id: JobId) -> StorageResult<Vec<WorkerJobCount>> {
        let tables = self.tables.read();
        let mut counts: HashMap<WorkerId, i64> = HashMap::new();
        for history in tables.histories.values().filter(|h| h.job_id == job_id) {
            *counts.entry(history.worker_id.clone()).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(worker_id, count)| WorkerJobCount { worker_id, count })
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
