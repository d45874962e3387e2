// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Job` entity: a registered schedulable unit.

use crate::ids::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered schedulable unit.
///
/// `job_name` is globally unique among non-once jobs (see the builder's
/// collision handling); `sub_name` exists so multiple one-shots can share
/// a `job_name` without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub job_name: String,
    pub sub_name: Option<String>,
    pub cron_expression: String,
    pub once: bool,
    /// Reserved for future use; the engine never sets this itself.
    pub expired: bool,
    pub job_data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A one-shot job has no cron cadence: either `once` is set, or the
    /// cron expression was never populated.
    pub fn is_one_shot(&self) -> bool {
        self.once || self.cron_expression.is_empty()
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        set { id: JobId = JobId::new(0) }
        into { job_name: String = "test-job" }
        option { sub_name: String = None }
        into { cron_expression: String = "" }
        set { once: bool = true }
        set { expired: bool = false }
        into { job_data: String = "" }
        set { created_at: DateTime<Utc> = Utc::now() }
        set { updated_at: DateTime<Utc> = Utc::now() }
        option { deleted_at: DateTime<Utc> = None }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
