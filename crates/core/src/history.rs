// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `JobHistory` entity: the append-only ledger of execution attempts.

use crate::ids::{JobHistoryId, JobId, ScheduleId};
use crate::status::JobHistoryStatus;
use crate::worker::WorkerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the execution ledger.
///
/// Created when a schedule watcher starts dispatching a schedule (status
/// `New`, immediately advanced to `InProgress`), finalized to `Completed`
/// or `Failed` by the dispatcher's recovery block. Never mutated or
/// deleted afterward except by cascade when the owning job is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHistory {
    pub id: JobHistoryId,
    pub job_id: JobId,
    pub schedule_id: ScheduleId,
    pub worker_id: WorkerId,
    pub status: JobHistoryStatus,
    pub retry_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

crate::builder! {
    pub struct JobHistoryBuilder => JobHistory {
        set { id: JobHistoryId = JobHistoryId::new(0) }
        set { job_id: JobId = JobId::new(0) }
        set { schedule_id: ScheduleId = ScheduleId::new(0) }
        into { worker_id: WorkerId = WorkerId::new("test-worker") }
        set { status: JobHistoryStatus = JobHistoryStatus::New }
        set { retry_count: i32 = 0 }
        set { created_at: DateTime<Utc> = Utc::now() }
        set { updated_at: DateTime<Utc> = Utc::now() }
        option { deleted_at: DateTime<Utc> = None }
    }
}

/// Per-worker count of past executions for a job, used by the worker
/// assignment policy. Never persisted on its own — derived from a
/// `GROUP BY worker_id` query over `job_histories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerJobCount {
    pub worker_id: WorkerId,
    pub count: i64,
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
