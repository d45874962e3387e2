// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Panic-safe invocation of user job code.

use cronmesh_core::job_data::{self, JobData};
use cronmesh_core::JobHistoryStatus;

use crate::registry::Job;

/// Outcome of one dispatch attempt.
pub struct DispatchOutcome {
    pub status: JobHistoryStatus,
    /// The job's data after execution, to snapshot into the next occurrence.
    /// `None` when the job panicked — the prior snapshot is carried forward
    /// unchanged by the caller in that case.
    pub job_data: Option<JobData>,
}

/// Run `job.execute(job_data)` inside a dedicated thread so a panic in user
/// code is caught rather than taking the watcher loop down with it.
///
/// The initial post-recovery status is `Completed`; only an abnormal exit
/// flips it to `Failed` — mirroring the "recovery block defaults to success"
/// shape user-facing job frameworks in this space use.
pub async fn dispatch(mut job: Box<dyn Job>, raw_job_data: String) -> DispatchOutcome {
    let input = job_data::decode(&raw_job_data).unwrap_or_default();

    let result = tokio::task::spawn_blocking(move || {
        job.execute(input);
        job.job_data()
    })
    .await;

    match result {
        Ok(data) => DispatchOutcome { status: JobHistoryStatus::Completed, job_data: Some(data) },
        Err(join_error) => {
            tracing::warn!(error = %join_error, "job execution panicked");
            DispatchOutcome { status: JobHistoryStatus::Failed, job_data: None }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
