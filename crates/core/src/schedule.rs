// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Schedule` entity: one pending occurrence of a job.

use crate::ids::{JobId, ScheduleId};
use crate::worker::WorkerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One pending occurrence of a job, pinned to the worker that will run it.
///
/// `execution_id` is the target instant, encoded as nanoseconds since the
/// Unix epoch — not a row identifier despite the name (a carryover from
/// how the store indexes occurrences by target time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub execution_id: i64,
    pub job_id: JobId,
    pub worker_id: WorkerId,
    pub job_data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

crate::builder! {
    pub struct ScheduleBuilder => Schedule {
        set { id: ScheduleId = ScheduleId::new(0) }
        set { execution_id: i64 = 0 }
        set { job_id: JobId = JobId::new(0) }
        into { worker_id: WorkerId = WorkerId::new("test-worker") }
        into { job_data: String = "" }
        set { created_at: DateTime<Utc> = Utc::now() }
        set { updated_at: DateTime<Utc> = Utc::now() }
        option { deleted_at: DateTime<Utc> = None }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
