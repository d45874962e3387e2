// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cronmesh_core::{FakeClock, WorkerId};

fn repo() -> MemoryRepository<FakeClock> {
    MemoryRepository::new(FakeClock::default(), chrono::Duration::seconds(30))
}

#[tokio::test]
async fn create_job_assigns_sequential_ids() {
    let repo = repo();
    let a = repo.create_job(Job::builder().job_name("a").build()).await.unwrap();
    let b = repo.create_job(Job::builder().job_name("b").build()).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn job_history_for_schedule_keys_on_schedule_id_not_row_id() {
    let repo = repo();
    let job = repo.create_job(Job::builder().job_name("a").build()).await.unwrap();
    let schedule = repo
        .create_schedule(Schedule::builder().job_id(job.id).execution_id(1).build())
        .await
        .unwrap();
    let history = repo
        .create_job_history(JobHistory::builder().job_id(job.id).schedule_id(schedule.id).build())
        .await
        .unwrap();
    // The history row's own id deliberately differs from the schedule id
    // it belongs to, so a lookup keyed on row id would miss it.
    assert_ne!(history.id.get(), schedule.id.get() + 100);

    let found = repo.get_job_history_for_schedule(schedule.id).await.unwrap();
    assert_eq!(found.map(|h| h.id), Some(history.id));
}

#[tokio::test]
async fn passed_schedule_excludes_rows_with_non_failed_history() {
    let repo = repo();
    let job = repo
        .create_job(Job::builder().job_name("a").once(true).build())
        .await
        .unwrap();
    let worker = WorkerId::new("w1");
    let done = repo
        .create_schedule(
            Schedule::builder().job_id(job.id).execution_id(10).worker_id(worker.clone()).build(),
        )
        .await
        .unwrap();
    let pending = repo
        .create_schedule(
            Schedule::builder().job_id(job.id).execution_id(20).worker_id(worker.clone()).build(),
        )
        .await
        .unwrap();
    repo.create_job_history(
        JobHistory::builder()
            .job_id(job.id)
            .schedule_id(done.id)
            .status(JobHistoryStatus::Completed)
            .build(),
    )
    .await
    .unwrap();

    let rows = repo.get_passed_schedule(100, &worker, true).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, pending.id);
}
