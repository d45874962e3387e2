// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by the storage and engine crates.

use crate::ids::JobId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid cron expression {expression:?}: {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("job {job_name:?} already exists as a recurring job and could not be reconciled")]
    DuplicateJob { job_name: String },

    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] anyhow::Error),

    #[error("no registry entry for job {job_name:?} (job id {job_id})")]
    UnregisteredJob { job_id: JobId, job_name: String },

    #[error("job {job_name:?} panicked during execution: {message}")]
    JobExecutionPanic { job_name: String, message: String },

    #[error("watcher {name:?} panicked: {message}")]
    WatcherPanic { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
