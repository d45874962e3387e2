// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios driving a real [`Engine`] against the in-memory
//! repository, exercising the seed scenarios a watcher-based scheduler is
//! expected to satisfy: one-shot delivery, recurring chains, cancellation,
//! name-collision rebuilds, missed-one-shot recovery, and unregistered-job
//! skipping.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cronmesh_core::{EngineConfig, Job as JobEntity, JobData, JobHistoryStatus, StoreKind, WorkerId};
use cronmesh_engine::{Engine, Job};
use cronmesh_storage::Repository;

struct CountingJob {
    runs: Arc<AtomicUsize>,
}

impl Job for CountingJob {
    fn job_name(&self) -> &str {
        "counting-job"
    }

    fn execute(&mut self, _job_data: JobData) {
        self.runs.fetch_add(1, Ordering::SeqCst);
    }

    fn job_data(&self) -> JobData {
        JobData::new()
    }
}

fn config(tick: Duration, run_immediately: bool) -> EngineConfig {
    EngineConfig {
        store_kind: StoreKind::Memory,
        tick_duration: tick,
        heartbeat_period: Duration::from_millis(50),
        run_immediately,
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn simple_one_shot_produces_exactly_one_completed_history_row() {
    let engine = Engine::start_with(config(Duration::from_millis(100), false), WorkerId::new("w1"), cronmesh_core::SystemClock)
        .await
        .expect("engine starts");

    let runs = Arc::new(AtomicUsize::new(0));
    let runs_for_job = runs.clone();
    let job = engine
        .new_job("simple-one-shot", JobData::new(), None, move || {
            Box::new(CountingJob { runs: runs_for_job.clone() }) as Box<dyn Job>
        })
        .build_to_run_at(Utc::now() + chrono::Duration::milliseconds(250))
        .await
        .expect("build succeeds");

    tokio::time::sleep(Duration::from_millis(900)).await;

    let history = engine.repository().get_job_history(job.id).await.expect("history query succeeds");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, JobHistoryStatus::Completed);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    engine.stop_watcher().await;
}

#[tokio::test]
async fn recurring_chain_produces_at_least_three_strictly_increasing_completions() {
    let engine = Engine::start_with(
        config(Duration::from_millis(300), true),
        WorkerId::new("w1"),
        cronmesh_core::SystemClock,
    )
    .await
    .expect("engine starts");

    let runs = Arc::new(AtomicUsize::new(0));
    let runs_for_job = runs.clone();
    let job = engine
        .new_job("recurring-chain", JobData::new(), None, move || {
            Box::new(CountingJob { runs: runs_for_job.clone() }) as Box<dyn Job>
        })
        .build("*/1 * * * * *")
        .await
        .expect("build succeeds");

    tokio::time::sleep(Duration::from_millis(3_500)).await;

    let mut history = engine.repository().get_job_history(job.id).await.expect("history query succeeds");
    assert!(history.len() >= 3, "expected at least 3 executions, got {}", history.len());
    assert!(history.iter().all(|h| h.status == JobHistoryStatus::Completed));

    // Schedules are never deleted on success (history is the append-only
    // ledger instead) — one row accumulates per occurrence, so "exactly one
    // unprocessed schedule remains" is checked by counting schedules with no
    // history row yet, not by the total row count for the job.
    let schedules = engine.repository().get_schedules_for_job(job.id).await.expect("schedule query succeeds");
    let mut unprocessed = 0;
    for schedule in &schedules {
        if engine.repository().get_job_history_for_schedule(schedule.id).await.expect("history lookup succeeds").is_none() {
            unprocessed += 1;
        }
    }
    assert_eq!(unprocessed, 1, "exactly one unprocessed successor should remain");
    assert!(schedules.len() > unprocessed, "prior occurrences' schedule rows persist alongside their history");

    history.sort_by_key(|h| h.id.get());
    assert!(runs.load(Ordering::SeqCst) >= 3);

    engine.stop_watcher().await;
}

#[tokio::test]
async fn cancel_job_removes_schedules_and_stops_future_executions() {
    let engine = Engine::start_with(
        config(Duration::from_millis(100), true),
        WorkerId::new("w1"),
        cronmesh_core::SystemClock,
    )
    .await
    .expect("engine starts");

    let runs = Arc::new(AtomicUsize::new(0));
    let runs_for_job = runs.clone();
    let job = engine
        .new_job("cancel-me", JobData::new(), None, move || {
            Box::new(CountingJob { runs: runs_for_job.clone() }) as Box<dyn Job>
        })
        .build("*/1 * * * * *")
        .await
        .expect("build succeeds");

    engine.cancel_job("cancel-me", None).await.expect("cancel succeeds");

    let schedules = engine.repository().get_schedules_for_job(job.id).await.expect("schedule query succeeds");
    assert!(schedules.is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let history = engine.repository().get_job_history(job.id).await.expect("history query succeeds");
    assert!(history.is_empty(), "a cancelled job must not accrue new history rows");

    engine.stop_watcher().await;
}

#[tokio::test]
async fn rebuilding_a_recurring_job_with_the_same_name_replaces_its_schedule() {
    let engine = Engine::start_with(
        config(Duration::from_millis(500), false),
        WorkerId::new("w1"),
        cronmesh_core::SystemClock,
    )
    .await
    .expect("engine starts");

    let runs = Arc::new(AtomicUsize::new(0));
    let first_job = engine
        .new_job("name-collision", JobData::new(), None, {
            let runs = runs.clone();
            move || Box::new(CountingJob { runs: runs.clone() }) as Box<dyn Job>
        })
        .build("0 0 0 1 1 *")
        .await
        .expect("first build succeeds");

    let second_job = engine
        .new_job("name-collision", JobData::new(), None, {
            let runs = runs.clone();
            move || Box::new(CountingJob { runs: runs.clone() }) as Box<dyn Job>
        })
        .build("0 0 12 1 1 *")
        .await
        .expect("second build succeeds");

    assert_ne!(first_job.id, second_job.id);

    let first_schedules = engine.repository().get_schedules_for_job(first_job.id).await.expect("schedule query succeeds");
    assert!(first_schedules.is_empty(), "rebuilding a recurring job must cancel the prior job's schedule");

    let second_schedules = engine.repository().get_schedules_for_job(second_job.id).await.expect("schedule query succeeds");
    assert_eq!(second_schedules.len(), 1);

    engine.stop_watcher().await;
}

#[tokio::test]
async fn missed_one_shot_is_reclaimed_by_the_past_schedule_watcher_on_restart() {
    let mut cfg = config(Duration::from_millis(150), false);
    cfg.watch_past = true;
    let engine = Engine::start_with(cfg, WorkerId::new("w1"), cronmesh_core::SystemClock).await.expect("engine starts");

    let runs = Arc::new(AtomicUsize::new(0));
    let runs_for_job = runs.clone();
    // Build the job with a schedule far enough in the future that this
    // test's watchers never observe it; its only purpose is to register
    // the job's factory and row, the same way a real caller would.
    let job = engine
        .new_job("missed-job", JobData::new(), None, move || Box::new(CountingJob { runs: runs_for_job.clone() }) as Box<dyn Job>)
        .build_to_run_at(Utc::now() + chrono::Duration::seconds(30))
        .await
        .expect("build succeeds");

    // Now simulate the one-shot having actually been scheduled 10s in the
    // past with no history yet, as if the worker had been offline since
    // before it fired.
    let past = Utc::now() - chrono::Duration::seconds(10);
    let schedule = cronmesh_core::Schedule {
        id: cronmesh_core::ScheduleId::new(0),
        execution_id: past.timestamp_nanos_opt().unwrap_or(i64::MIN),
        job_id: job.id,
        worker_id: WorkerId::new("w1"),
        job_data: String::new(),
        created_at: past,
        updated_at: past,
        deleted_at: None,
    };
    engine.repository().create_schedule(schedule).await.expect("schedule insert succeeds");

    tokio::time::sleep(Duration::from_millis(700)).await;

    let history = engine.repository().get_job_history(job.id).await.expect("history query succeeds");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, JobHistoryStatus::Completed);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    engine.stop_watcher().await;
}

#[tokio::test]
async fn a_schedule_for_an_unregistered_job_name_is_skipped() {
    let engine = Engine::start_with(
        config(Duration::from_millis(100), false),
        WorkerId::new("w1"),
        cronmesh_core::SystemClock,
    )
    .await
    .expect("engine starts");

    let job = JobEntity {
        id: cronmesh_core::JobId::new(0),
        job_name: "never-registered".to_string(),
        sub_name: None,
        cron_expression: String::new(),
        once: true,
        expired: false,
        job_data: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    };
    let job = engine.repository().create_job(job).await.expect("job insert succeeds");

    let now = Utc::now();
    let schedule = cronmesh_core::Schedule {
        id: cronmesh_core::ScheduleId::new(0),
        execution_id: now.timestamp_nanos_opt().unwrap_or(i64::MAX),
        job_id: job.id,
        worker_id: WorkerId::new("w1"),
        job_data: String::new(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    engine.repository().create_schedule(schedule).await.expect("schedule insert succeeds");

    tokio::time::sleep(Duration::from_millis(500)).await;

    let history = engine.repository().get_job_history(job.id).await.expect("history query succeeds");
    assert!(history.is_empty(), "an unregistered job name must never accrue a completed history row");

    // The skipped schedule itself is never deleted (only a registered job's
    // successful dispatch enqueues a successor, and deletion only happens on
    // cancellation or cascade) — it just never grows a completed history row.
    let remaining_schedules = engine.repository().get_schedules_for_job(job.id).await.expect("schedule query succeeds");
    assert_eq!(remaining_schedules.len(), 1, "the skipped schedule is left in place, not deleted");

    engine.stop_watcher().await;
}
