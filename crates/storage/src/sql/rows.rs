// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row-to-entity mapping for the `Any`-driver queries in [`super::SqlRepository`].
//!
//! `sqlx`'s `Any` driver only implements `Decode`/`Encode`/`Type` for
//! `bool, i16, i32, i64, f32, f64, String, Vec<u8>` — the `chrono`
//! Cargo feature adds temporal-type support to the concrete
//! Postgres/MySQL/SQLite drivers, not to `Any` itself. Every timestamp
//! column is therefore stored and read as fixed-precision RFC 3339 text
//! (see [`encode_timestamp`]), never as a native temporal type.

use chrono::{DateTime, SecondsFormat, Utc};
use cronmesh_core::{Job, JobHistory, JobHistoryId, JobHistoryStatus, JobId, Schedule, ScheduleId, Worker, WorkerId};
use sqlx::any::AnyRow;
use sqlx::Row;

use crate::error::{StorageError, StorageResult};

fn get<T>(row: &AnyRow, column: &str) -> StorageResult<T>
where
    T: for<'r> sqlx::Decode<'r, sqlx::any::Any> + sqlx::Type<sqlx::any::Any>,
{
    row.try_get(column).map_err(StorageError::from)
}

/// Encode an instant as fixed-precision (nanosecond), `Z`-suffixed RFC
/// 3339 text, so that lexicographic and chronological ordering agree —
/// required by the plain `>`/`<` comparisons `mod.rs` runs against
/// these columns (e.g. the heartbeat cutoff in `get_alive_workers`).
pub fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn encode_timestamp_opt(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(encode_timestamp)
}

fn parse_timestamp(column: &str, raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|error| StorageError::Decode(format!("invalid timestamp in column {column:?}: {error}")))
}

fn get_timestamp(row: &AnyRow, column: &str) -> StorageResult<DateTime<Utc>> {
    parse_timestamp(column, &get::<String>(row, column)?)
}

fn get_timestamp_opt(row: &AnyRow, column: &str) -> StorageResult<Option<DateTime<Utc>>> {
    get::<Option<String>>(row, column)?.as_deref().map(|raw| parse_timestamp(column, raw)).transpose()
}

pub fn worker_from_row(row: &AnyRow) -> StorageResult<Worker> {
    Ok(Worker {
        worker_id: WorkerId::new(get::<String>(row, "worker_id")?),
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        deleted_at: get_timestamp_opt(row, "deleted_at")?,
    })
}

pub fn job_from_row(row: &AnyRow) -> StorageResult<Job> {
    Ok(Job {
        id: JobId::new(get::<i64>(row, "id")?),
        job_name: get::<String>(row, "job_name")?,
        sub_name: get::<Option<String>>(row, "sub_name")?,
        cron_expression: get::<String>(row, "cron_expression")?,
        once: get::<bool>(row, "once")?,
        expired: get::<bool>(row, "expired")?,
        job_data: get::<String>(row, "job_data")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        deleted_at: get_timestamp_opt(row, "deleted_at")?,
    })
}

pub fn schedule_from_row(row: &AnyRow) -> StorageResult<Schedule> {
    Ok(Schedule {
        id: ScheduleId::new(get::<i64>(row, "id")?),
        execution_id: get::<i64>(row, "execution_id")?,
        job_id: JobId::new(get::<i64>(row, "job_id")?),
        worker_id: WorkerId::new(get::<String>(row, "worker_id")?),
        job_data: get::<String>(row, "job_data")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        deleted_at: get_timestamp_opt(row, "deleted_at")?,
    })
}

pub fn history_from_row(row: &AnyRow) -> StorageResult<JobHistory> {
    let status_str = get::<String>(row, "status")?;
    let status = match status_str.as_str() {
        "NEW" => JobHistoryStatus::New,
        "IN_PROGRESS" => JobHistoryStatus::InProgress,
        "COMPLETED" => JobHistoryStatus::Completed,
        "FAILED" => JobHistoryStatus::Failed,
        other => return Err(StorageError::Decode(format!("unknown job history status {other:?}"))),
    };
    Ok(JobHistory {
        id: JobHistoryId::new(get::<i64>(row, "id")?),
        job_id: JobId::new(get::<i64>(row, "job_id")?),
        schedule_id: ScheduleId::new(get::<i64>(row, "schedule_id")?),
        worker_id: WorkerId::new(get::<String>(row, "worker_id")?),
        status,
        retry_count: get::<i32>(row, "retry_count")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        deleted_at: get_timestamp_opt(row, "deleted_at")?,
    })
}

