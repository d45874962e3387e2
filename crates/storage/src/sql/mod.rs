// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Relational [`Repository`] implementation over `sqlx`'s `Any` driver,
//! covering Postgres, MySQL and SQLite from one code path.

mod dialect;
mod rows;
mod schema;

pub use dialect::Dialect;

use std::str::FromStr;

use async_trait::async_trait;
use cronmesh_core::{Job, JobHistory, JobHistoryId, JobId, Schedule, ScheduleId, Worker, WorkerId, WorkerJobCount};
use sqlx::any::{install_default_drivers, AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions, Executor, Row};

use crate::error::StorageResult;
use crate::repository::Repository;

/// A `sqlx`-backed repository reached through `connection_url`.
///
/// Table names are all prefixed with `table_prefix` (empty by default), so
/// one database can host more than one deployment.
pub struct SqlRepository {
    pool: AnyPool,
    dialect: Dialect,
    table_prefix: String,
    heartbeat_period: chrono::Duration,
}

/// Map the store's `log_level` config (`0` defaults to `Error`) onto the
/// verbosity `sqlx` uses for its per-statement query log.
fn statement_log_level(log_level: u8) -> log::LevelFilter {
    match log_level {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

impl SqlRepository {
    /// Connect and ensure the schema exists, logging queries at the
    /// Error level (`log_level = 0`) and using the default 30s heartbeat
    /// period for worker liveness.
    pub async fn connect(connection_url: &str, table_prefix: impl Into<String>) -> StorageResult<Self> {
        Self::connect_with_log_level(connection_url, table_prefix, 0).await
    }

    /// Connect and ensure the schema exists, logging queries at the
    /// verbosity `log_level` maps to (see [`statement_log_level`]), using
    /// the default 30s heartbeat period for worker liveness.
    pub async fn connect_with_log_level(
        connection_url: &str,
        table_prefix: impl Into<String>,
        log_level: u8,
    ) -> StorageResult<Self> {
        Self::connect_with_heartbeat(connection_url, table_prefix, log_level, chrono::Duration::seconds(30)).await
    }

    /// Connect and ensure the schema exists, with an explicit heartbeat
    /// period — [`Repository::get_alive_workers`] filters on
    /// `updated_at > now - 3 * heartbeat_period`.
    pub async fn connect_with_heartbeat(
        connection_url: &str,
        table_prefix: impl Into<String>,
        log_level: u8,
        heartbeat_period: chrono::Duration,
    ) -> StorageResult<Self> {
        install_default_drivers();
        let dialect = Dialect::from_url(connection_url)?;
        // Unlike the upstream Go driver (which wants the `mysql://` scheme
        // stripped before the DSN reaches `go-sql-driver/mysql`), `sqlx`'s
        // `Any` driver dispatches to the right backend *by* sniffing the
        // scheme, so the full URL — scheme included — is what must reach
        // `AnyConnectOptions::from_str` for every dialect.
        let options = AnyConnectOptions::from_str(connection_url)?.log_statements(statement_log_level(log_level));
        // SQLite enforces (and cascades) foreign keys only once
        // `PRAGMA foreign_keys = ON` has run on the *same* connection that
        // later issues the delete, and a bare `sqlite::memory:` DSN hands
        // every new connection its own isolated database — so the pool is
        // pinned to a single connection for SQLite, and `after_connect`
        // sets the pragma on every connection the pool ever opens (just
        // the one, for SQLite; all ten, for Postgres/MySQL where it's a
        // harmless no-op).
        let max_connections = if dialect == Dialect::Sqlite { 1 } else { 10 };
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    if dialect == Dialect::Sqlite {
                        conn.execute("PRAGMA foreign_keys = ON").await?;
                    }
                    Ok(())
                })
            })
            .connect_with(options)
            .await?;
        let table_prefix = table_prefix.into();
        schema::ensure_tables(&pool, dialect, &table_prefix).await?;
        Ok(Self { pool, dialect, table_prefix, heartbeat_period })
    }

    fn table(&self, name: &str) -> String {
        format!("{}{name}", self.table_prefix)
    }

    /// Append `RETURNING id` when the dialect supports it (Postgres,
    /// SQLite); MySQL has no such clause and reads the id back via
    /// `LAST_INSERT_ID()` after the insert instead.
    fn insert_sql(&self, base: &str) -> String {
        if self.dialect.supports_returning() {
            format!("{base} RETURNING id")
        } else {
            base.to_string()
        }
    }

    /// Run `query` (an `INSERT` built through [`Self::insert_sql`]) and
    /// return the inserted row's id, branching on the same
    /// `supports_returning` check used to build the statement:
    /// `RETURNING id` on Postgres/SQLite, `AnyQueryResult::last_insert_id`
    /// on MySQL.
    async fn insert_returning_id<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::any::Any, sqlx::any::AnyArguments<'q>>,
    ) -> StorageResult<i64> {
        if self.dialect.supports_returning() {
            let row = query.fetch_one(&self.pool).await?;
            row.try_get::<i64, _>("id").map_err(crate::error::StorageError::from)
        } else {
            let result = query.execute(&self.pool).await?;
            result
                .last_insert_id()
                .ok_or_else(|| crate::error::StorageError::Decode("insert did not return a last_insert_id".to_string()))
        }
    }
}

#[async_trait]
impl Repository for SqlRepository {
    async fn create_worker(&self, worker: Worker) -> StorageResult<Worker> {
        let sql = format!(
            "INSERT INTO {} (worker_id, created_at, updated_at, deleted_at) VALUES ({}, {}, {}, {})",
            self.table("workers"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
            self.dialect.placeholder(3),
            self.dialect.placeholder(4),
        );
        sqlx::query(&sql)
            .bind(worker.worker_id.as_str().to_string())
            .bind(rows::encode_timestamp(worker.created_at))
            .bind(rows::encode_timestamp(worker.updated_at))
            .bind(rows::encode_timestamp_opt(worker.deleted_at))
            .execute(&self.pool)
            .await?;
        Ok(worker)
    }

    async fn update_worker(&self, worker: Worker) -> StorageResult<Worker> {
        let sql = format!(
            "UPDATE {} SET updated_at = {}, deleted_at = {} WHERE worker_id = {}",
            self.table("workers"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
            self.dialect.placeholder(3),
        );
        sqlx::query(&sql)
            .bind(rows::encode_timestamp(worker.updated_at))
            .bind(rows::encode_timestamp_opt(worker.deleted_at))
            .bind(worker.worker_id.as_str().to_string())
            .execute(&self.pool)
            .await?;
        Ok(worker)
    }

    async fn get_worker(&self, worker_id: &WorkerId) -> StorageResult<Option<Worker>> {
        let sql = format!(
            "SELECT worker_id, created_at, updated_at, deleted_at FROM {} WHERE worker_id = {}",
            self.table("workers"),
            self.dialect.placeholder(1),
        );
        let row = sqlx::query(&sql).bind(worker_id.as_str().to_string()).fetch_optional(&self.pool).await?;
        row.map(|r| rows::worker_from_row(&r)).transpose()
    }

    async fn get_workers(&self) -> StorageResult<Vec<Worker>> {
        let sql = format!("SELECT worker_id, created_at, updated_at, deleted_at FROM {}", self.table("workers"));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(rows::worker_from_row).collect()
    }

    async fn get_alive_workers(&self) -> StorageResult<Vec<Worker>> {
        // Liveness is evaluated against `Utc::now()` rather than a
        // dialect-specific `NOW() - INTERVAL` clause, so the same query
        // shape works across all three backends behind the `Any` driver.
        let cutoff = chrono::Utc::now() - self.heartbeat_period * 3;
        let sql = format!(
            "SELECT worker_id, created_at, updated_at, deleted_at FROM {} WHERE updated_at > {} AND deleted_at IS NULL",
            self.table("workers"),
            self.dialect.placeholder(1),
        );
        let rows = sqlx::query(&sql).bind(rows::encode_timestamp(cutoff)).fetch_all(&self.pool).await?;
        rows.iter().map(rows::worker_from_row).collect()
    }

    async fn delete_worker(&self, worker_id: &WorkerId) -> StorageResult<()> {
        let sql = format!("DELETE FROM {} WHERE worker_id = {}", self.table("workers"), self.dialect.placeholder(1));
        sqlx::query(&sql).bind(worker_id.as_str().to_string()).execute(&self.pool).await?;
        Ok(())
    }

    async fn create_job(&self, mut job: Job) -> StorageResult<Job> {
        let sql = self.insert_sql(&format!(
            "INSERT INTO {} (job_name, sub_name, cron_expression, once, expired, job_data, created_at, updated_at, deleted_at) VALUES ({})",
            self.table("jobs"),
            self.dialect.placeholders(9),
        ));
        let query = sqlx::query(&sql)
            .bind(job.job_name.clone())
            .bind(job.sub_name.clone())
            .bind(job.cron_expression.clone())
            .bind(job.once)
            .bind(job.expired)
            .bind(job.job_data.clone())
            .bind(rows::encode_timestamp(job.created_at))
            .bind(rows::encode_timestamp(job.updated_at))
            .bind(rows::encode_timestamp_opt(job.deleted_at));
        job.id = JobId::new(self.insert_returning_id(query).await?);
        Ok(job)
    }

    async fn update_job(&self, job: Job) -> StorageResult<Job> {
        let sql = format!(
            "UPDATE {} SET job_name = {}, sub_name = {}, cron_expression = {}, once = {}, expired = {}, job_data = {}, updated_at = {}, deleted_at = {} WHERE id = {}",
            self.table("jobs"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
            self.dialect.placeholder(3),
            self.dialect.placeholder(4),
            self.dialect.placeholder(5),
            self.dialect.placeholder(6),
            self.dialect.placeholder(7),
            self.dialect.placeholder(8),
            self.dialect.placeholder(9),
        );
        sqlx::query(&sql)
            .bind(job.job_name.clone())
            .bind(job.sub_name.clone())
            .bind(job.cron_expression.clone())
            .bind(job.once)
            .bind(job.expired)
            .bind(job.job_data.clone())
            .bind(rows::encode_timestamp(job.updated_at))
            .bind(rows::encode_timestamp_opt(job.deleted_at))
            .bind(job.id.get())
            .execute(&self.pool)
            .await?;
        Ok(job)
    }

    async fn get_job(&self, job_id: JobId) -> StorageResult<Option<Job>> {
        let sql = format!(
            "SELECT id, job_name, sub_name, cron_expression, once, expired, job_data, created_at, updated_at, deleted_at FROM {} WHERE id = {}",
            self.table("jobs"),
            self.dialect.placeholder(1),
        );
        let row = sqlx::query(&sql).bind(job_id.get()).fetch_optional(&self.pool).await?;
        row.map(|r| rows::job_from_row(&r)).transpose()
    }

    async fn get_job_by_name(&self, job_name: &str) -> StorageResult<Option<Job>> {
        let sql = format!(
            "SELECT id, job_name, sub_name, cron_expression, once, expired, job_data, created_at, updated_at, deleted_at FROM {} WHERE job_name = {} AND deleted_at IS NULL",
            self.table("jobs"),
            self.dialect.placeholder(1),
        );
        let row = sqlx::query(&sql).bind(job_name.to_string()).fetch_optional(&self.pool).await?;
        row.map(|r| rows::job_from_row(&r)).transpose()
    }

    async fn get_repeating_job_by_name(&self, job_name: &str) -> StorageResult<Option<Job>> {
        let sql = format!(
            "SELECT id, job_name, sub_name, cron_expression, once, expired, job_data, created_at, updated_at, deleted_at FROM {} WHERE job_name = {} AND once = {} AND deleted_at IS NULL",
            self.table("jobs"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
        );
        let row = sqlx::query(&sql).bind(job_name.to_string()).bind(false).fetch_optional(&self.pool).await?;
        row.map(|r| rows::job_from_row(&r)).transpose()
    }

    async fn delete_job(&self, job_id: JobId) -> StorageResult<()> {
        // `schedules.job_id` carries an `ON DELETE CASCADE` FK in every
        // dialect's schema, so the row delete alone reclaims its schedules.
        let sql = format!("DELETE FROM {} WHERE id = {}", self.table("jobs"), self.dialect.placeholder(1));
        sqlx::query(&sql).bind(job_id.get()).execute(&self.pool).await?;
        Ok(())
    }

    async fn create_job_history(&self, mut history: JobHistory) -> StorageResult<JobHistory> {
        let sql = self.insert_sql(&format!(
            "INSERT INTO {} (job_id, schedule_id, worker_id, status, retry_count, created_at, updated_at, deleted_at) VALUES ({})",
            self.table("job_histories"),
            self.dialect.placeholders(8),
        ));
        let query = sqlx::query(&sql)
            .bind(history.job_id.get())
            .bind(history.schedule_id.get())
            .bind(history.worker_id.as_str().to_string())
            .bind(history.status.to_string())
            .bind(history.retry_count)
            .bind(rows::encode_timestamp(history.created_at))
            .bind(rows::encode_timestamp(history.updated_at))
            .bind(rows::encode_timestamp_opt(history.deleted_at));
        history.id = JobHistoryId::new(self.insert_returning_id(query).await?);
        Ok(history)
    }

    async fn update_job_history(&self, history: JobHistory) -> StorageResult<JobHistory> {
        let sql = format!(
            "UPDATE {} SET status = {}, retry_count = {}, updated_at = {} WHERE id = {}",
            self.table("job_histories"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
            self.dialect.placeholder(3),
            self.dialect.placeholder(4),
        );
        sqlx::query(&sql)
            .bind(history.status.to_string())
            .bind(history.retry_count)
            .bind(rows::encode_timestamp(history.updated_at))
            .bind(history.id.get())
            .execute(&self.pool)
            .await?;
        Ok(history)
    }

    async fn get_job_history(&self, job_id: JobId) -> StorageResult<Vec<JobHistory>> {
        let sql = format!(
            "SELECT id, job_id, schedule_id, worker_id, status, retry_count, created_at, updated_at, deleted_at FROM {} WHERE job_id = {}",
            self.table("job_histories"),
            self.dialect.placeholder(1),
        );
        let rows = sqlx::query(&sql).bind(job_id.get()).fetch_all(&self.pool).await?;
        rows.iter().map(rows::history_from_row).collect()
    }

    async fn get_job_history_with_limit(&self, job_id: JobId, limit: i64) -> StorageResult<Vec<JobHistory>> {
        let sql = format!(
            "SELECT id, job_id, schedule_id, worker_id, status, retry_count, created_at, updated_at, deleted_at FROM {} WHERE job_id = {} ORDER BY id ASC LIMIT {}",
            self.table("job_histories"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
        );
        let rows = sqlx::query(&sql).bind(job_id.get()).bind(limit).fetch_all(&self.pool).await?;
        rows.iter().map(rows::history_from_row).collect()
    }

    async fn get_job_history_for_schedule(&self, schedule_id: ScheduleId) -> StorageResult<Option<JobHistory>> {
        // Keyed on `schedule_id`, not the history row's own `id` — the
        // upstream query conflated the two.
        let sql = format!(
            "SELECT id, job_id, schedule_id, worker_id, status, retry_count, created_at, updated_at, deleted_at FROM {} WHERE schedule_id = {}",
            self.table("job_histories"),
            self.dialect.placeholder(1),
        );
        let row = sqlx::query(&sql).bind(schedule_id.get()).fetch_optional(&self.pool).await?;
        row.map(|r| rows::history_from_row(&r)).transpose()
    }

    async fn delete_job_history(&self, history_id: JobHistoryId) -> StorageResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = {}", self.table("job_histories"), self.dialect.placeholder(1));
        sqlx::query(&sql).bind(history_id.get()).execute(&self.pool).await?;
        Ok(())
    }

    async fn create_schedule(&self, mut schedule: Schedule) -> StorageResult<Schedule> {
        let sql = self.insert_sql(&format!(
            "INSERT INTO {} (execution_id, job_id, worker_id, job_data, created_at, updated_at, deleted_at) VALUES ({})",
            self.table("schedules"),
            self.dialect.placeholders(7),
        ));
        let query = sqlx::query(&sql)
            .bind(schedule.execution_id)
            .bind(schedule.job_id.get())
            .bind(schedule.worker_id.as_str().to_string())
            .bind(schedule.job_data.clone())
            .bind(rows::encode_timestamp(schedule.created_at))
            .bind(rows::encode_timestamp(schedule.updated_at))
            .bind(rows::encode_timestamp_opt(schedule.deleted_at));
        schedule.id = ScheduleId::new(self.insert_returning_id(query).await?);
        Ok(schedule)
    }

    async fn update_schedule(&self, schedule: Schedule) -> StorageResult<Schedule> {
        let sql = format!(
            "UPDATE {} SET worker_id = {}, job_data = {}, updated_at = {}, deleted_at = {} WHERE id = {}",
            self.table("schedules"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
            self.dialect.placeholder(3),
            self.dialect.placeholder(4),
            self.dialect.placeholder(5),
        );
        sqlx::query(&sql)
            .bind(schedule.worker_id.as_str().to_string())
            .bind(schedule.job_data.clone())
            .bind(rows::encode_timestamp(schedule.updated_at))
            .bind(rows::encode_timestamp_opt(schedule.deleted_at))
            .bind(schedule.id.get())
            .execute(&self.pool)
            .await?;
        Ok(schedule)
    }

    async fn get_schedule(&self, schedule_id: ScheduleId) -> StorageResult<Option<Schedule>> {
        let sql = format!(
            "SELECT id, execution_id, job_id, worker_id, job_data, created_at, updated_at, deleted_at FROM {} WHERE id = {}",
            self.table("schedules"),
            self.dialect.placeholder(1),
        );
        let row = sqlx::query(&sql).bind(schedule_id.get()).fetch_optional(&self.pool).await?;
        row.map(|r| rows::schedule_from_row(&r)).transpose()
    }

    async fn get_schedule_between(&self, start: i64, end: i64, worker_id: &WorkerId) -> StorageResult<Vec<Schedule>> {
        let sql = format!(
            "SELECT id, execution_id, job_id, worker_id, job_data, created_at, updated_at, deleted_at FROM {} WHERE execution_id >= {} AND execution_id <= {} AND worker_id = {} AND deleted_at IS NULL ORDER BY execution_id ASC",
            self.table("schedules"),
            self.dialect.placeholder(1),
            self.dialect.placeholder(2),
            self.dialect.placeholder(3),
        );
        let rows = sqlx::query(&sql)
            .bind(start)
            .bind(end)
            .bind(worker_id.as_str().to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(rows::schedule_from_row).collect()
    }

    async fn get_passed_schedule(&self, before: i64, worker_id: &WorkerId, once_only: bool) -> StorageResult<Vec<Schedule>> {
        let sql = format!(
            "SELECT s.id, s.execution_id, s.job_id, s.worker_id, s.job_data, s.created_at, s.updated_at, s.deleted_at
             FROM {schedules} s
             INNER JOIN {jobs} j ON j.id = s.job_id AND j.once = {once_ph}
             LEFT JOIN {histories} h ON h.schedule_id = s.id AND h.status != {failed_ph}
             WHERE h.id IS NULL AND s.execution_id < {before_ph} AND s.worker_id = {worker_ph} AND s.deleted_at IS NULL
             ORDER BY s.execution_id ASC",
            schedules = self.table("schedules"),
            jobs = self.table("jobs"),
            histories = self.table("job_histories"),
            once_ph = self.dialect.placeholder(1),
            failed_ph = self.dialect.placeholder(2),
            before_ph = self.dialect.placeholder(3),
            worker_ph = self.dialect.placeholder(4),
        );
        let rows = sqlx::query(&sql)
            .bind(once_only)
            .bind(cronmesh_core::JobHistoryStatus::Failed.to_string())
            .bind(before)
            .bind(worker_id.as_str().to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(rows::schedule_from_row).collect()
    }

    async fn get_schedules_for_job(&self, job_id: JobId) -> StorageResult<Vec<Schedule>> {
        let sql = format!(
            "SELECT id, execution_id, job_id, worker_id, job_data, created_at, updated_at, deleted_at FROM {} WHERE job_id = {}",
            self.table("schedules"),
            self.dialect.placeholder(1),
        );
        let rows = sqlx::query(&sql).bind(job_id.get()).fetch_all(&self.pool).await?;
        rows.iter().map(rows::schedule_from_row).collect()
    }

    async fn delete_schedules_for_job(&self, job_id: JobId) -> StorageResult<Vec<Schedule>> {
        let existing = self.get_schedules_for_job(job_id).await?;
        let sql = format!("DELETE FROM {} WHERE job_id = {}", self.table("schedules"), self.dialect.placeholder(1));
        sqlx::query(&sql).bind(job_id.get()).execute(&self.pool).await?;
        Ok(existing)
    }

    async fn delete_schedules_for_job_name(&self, job_name: &str, sub_name: Option<&str>) -> StorageResult<Vec<Schedule>> {
        let name_ph = self.dialect.placeholder(1);
        let sub_ph = self.dialect.placeholder(2);
        let joined_sub_name_eq = self.dialect.null_safe_eq("j.sub_name", &sub_ph);
        let bare_sub_name_eq = self.dialect.null_safe_eq("sub_name", &sub_ph);

        let sql = format!(
            "SELECT s.id, s.execution_id, s.job_id, s.worker_id, s.job_data, s.created_at, s.updated_at, s.deleted_at
             FROM {schedules} s
             INNER JOIN {jobs} j ON j.id = s.job_id
             WHERE j.job_name = {name_ph} AND {joined_sub_name_eq}",
            schedules = self.table("schedules"),
            jobs = self.table("jobs"),
        );
        let rows = sqlx::query(&sql)
            .bind(job_name.to_string())
            .bind(sub_name.map(str::to_string))
            .fetch_all(&self.pool)
            .await?;
        let schedules: Vec<Schedule> = rows.iter().map(rows::schedule_from_row).collect::<StorageResult<_>>()?;

        let delete_sql = format!(
            "DELETE FROM {schedules} WHERE job_id IN (SELECT id FROM {jobs} WHERE job_name = {name_ph} AND {bare_sub_name_eq})",
            schedules = self.table("schedules"),
            jobs = self.table("jobs"),
        );
        sqlx::query(&delete_sql)
            .bind(job_name.to_string())
            .bind(sub_name.map(str::to_string))
            .execute(&self.pool)
            .await?;
        Ok(schedules)
    }

    async fn get_worker_counts_by_job(&self, job_id: JobId) -> StorageResult<Vec<WorkerJobCount>> {
        let sql = format!(
            "SELECT worker_id, COUNT(*) as count FROM {} WHERE job_id = {} GROUP BY worker_id",
            self.table("job_histories"),
            self.dialect.placeholder(1),
        );
        let rows = sqlx::query(&sql).bind(job_id.get()).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                Ok(WorkerJobCount {
                    worker_id: WorkerId::new(row.try_get::<String, _>("worker_id").map_err(crate::error::StorageError::from)?),
                    count: row.try_get::<i64, _>("count").map_err(crate::error::StorageError::from)?,
                })
            })
            .collect()
    }
}
