// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table definitions, one `CREATE TABLE IF NOT EXISTS` per dialect.

use sqlx::AnyPool;

use super::dialect::Dialect;
use crate::error::StorageResult;

/// Create the four tables (`workers`, `jobs`, `schedules`, `job_histories`)
/// if they do not already exist, each optionally qualified by `prefix`.
///
/// Foreign-key enforcement on SQLite (`PRAGMA foreign_keys = ON`) is set
/// per connection in `connect_with_heartbeat`'s `after_connect` hook, not
/// here — this function may run on any connection the pool hands out.
pub async fn ensure_tables(pool: &AnyPool, dialect: Dialect, prefix: &str) -> StorageResult<()> {
    for statement in statements(dialect, prefix) {
        sqlx::query(&statement).execute(pool).await?;
    }
    Ok(())
}

fn statements(dialect: Dialect, prefix: &str) -> Vec<String> {
    let pk = match dialect {
        Dialect::Postgres => "BIGSERIAL PRIMARY KEY",
        Dialect::MySql => "BIGINT AUTO_INCREMENT PRIMARY KEY",
        Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
    };
    let bool_ty = match dialect {
        Dialect::Postgres => "BOOLEAN",
        Dialect::MySql | Dialect::Sqlite => "INTEGER",
    };
    // Timestamps are always bound and read back as RFC 3339 text (see
    // `sql::rows`), since `sqlx`'s `Any` driver has no temporal type
    // support of its own — so every dialect stores them as TEXT rather
    // than a native timestamp column.
    let ts = "TEXT";

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {prefix}workers (
                worker_id TEXT PRIMARY KEY,
                created_at {ts} NOT NULL,
                updated_at {ts} NOT NULL,
                deleted_at {ts}
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {prefix}jobs (
                id {pk},
                job_name TEXT NOT NULL,
                sub_name TEXT,
                cron_expression TEXT NOT NULL,
                once {bool_ty} NOT NULL,
                expired {bool_ty} NOT NULL,
                job_data TEXT NOT NULL,
                created_at {ts} NOT NULL,
                updated_at {ts} NOT NULL,
                deleted_at {ts}
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS {prefix}jobs_job_name_idx ON {prefix}jobs (job_name)"),
        format!(
            "CREATE TABLE IF NOT EXISTS {prefix}schedules (
                id {pk},
                execution_id BIGINT NOT NULL,
                job_id BIGINT NOT NULL REFERENCES {prefix}jobs (id) ON DELETE CASCADE,
                worker_id TEXT NOT NULL,
                job_data TEXT NOT NULL,
                created_at {ts} NOT NULL,
                updated_at {ts} NOT NULL,
                deleted_at {ts}
            )"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {prefix}schedules_job_id_idx ON {prefix}schedules (job_id)"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {prefix}job_histories (
                id {pk},
                job_id BIGINT NOT NULL REFERENCES {prefix}jobs (id) ON DELETE CASCADE,
                schedule_id BIGINT NOT NULL REFERENCES {prefix}schedules (id) ON DELETE CASCADE,
                worker_id TEXT NOT NULL,
                status TEXT NOT NULL,
                retry_count INTEGER NOT NULL,
                created_at {ts} NOT NULL,
                updated_at {ts} NOT NULL,
                deleted_at {ts}
            )"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {prefix}job_histories_schedule_id_idx ON {prefix}job_histories (schedule_id)"
        ),
    ]
}
