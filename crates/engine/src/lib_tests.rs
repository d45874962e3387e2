// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cronmesh_core::FakeClock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc as StdArc;

struct CountingJob {
    runs: StdArc<AtomicUsize>,
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

async fn memory_config() -> EngineConfig {
    EngineConfig {
        store_kind: StoreKind::Memory,
        run_immediately: true,
        tick_duration: std::time::Duration::from_millis(20),
        heartbeat_period: std::time::Duration::from_millis(20),
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn run_at_scheduled_instant_produces_one_completed_history_row() {
    let clock = FakeClock::default();
    let engine = Engine::start_with(memory_config().await, WorkerId::new("w1"), clock.clone())
        .await
        .expect("engine starts");

    let runs = StdArc::new(AtomicUsize::new(0));
    let runs_for_job = runs.clone();
    let job = engine
        .new_job("counting-job", JobData::new(), None, move || {
            Box::new(CountingJob { runs: runs_for_job.clone() }) as Box<dyn Job>
        })
        .build_to_run_now()
        .await
        .expect("build succeeds");

    // Let the run-immediately tick observe the due schedule.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let history = engine.repository().get_job_history(job.id).await.expect("history query succeeds");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, cronmesh_core::JobHistoryStatus::Completed);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    engine.stop_watcher().await;
}

#[tokio::test]
async fn cancel_job_on_nonexistent_job_is_not_an_error() {
    let engine = Engine::start_with(memory_config().await, WorkerId::new("w1"), FakeClock::default())
        .await
        .expect("engine starts");
    engine.cancel_job("does-not-exist", None).await.expect("cancel is a no-op, not an error");
    engine.stop_watcher().await;
}
