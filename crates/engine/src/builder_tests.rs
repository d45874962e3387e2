// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cronmesh_core::FakeClock;
use cronmesh_storage::MemoryRepository;

struct NoopJob;

impl Job for NoopJob {
    fn job_name(&self) -> &str {
        "noop"
    }

    fn execute(&mut self, _job_data: JobData) {}

    fn job_data(&self) -> JobData {
        JobData::new()
    }
}

fn harness() -> (Arc<dyn Repository>, JobRegistry, FakeClock) {
    let clock = FakeClock::default();
    let repository: Arc<dyn Repository> = Arc::new(MemoryRepository::new(clock.clone(), chrono::Duration::seconds(30)));
    (repository, JobRegistry::new(), clock)
}

fn builder(repository: Arc<dyn Repository>, registry: JobRegistry, clock: FakeClock, job_name: &str) -> JobBuilder<FakeClock> {
    JobBuilder::new(repository, registry, clock, WorkerId::new("w1"), job_name, JobData::new(), None, || Box::new(NoopJob))
}

#[tokio::test]
async fn build_registers_the_factory_before_persisting() {
    let (repository, registry, clock) = harness();
    assert!(!registry.contains("recurring-report"));
    builder(repository, registry.clone(), clock, "recurring-report").build("0 0 * * * *").await.expect("build succeeds");
    assert!(registry.contains("recurring-report"));
}

#[tokio::test]
async fn recurring_build_replaces_schedules_of_a_same_named_recurring_job() {
    let (repository, registry, clock) = harness();
    let first = builder(repository.clone(), registry.clone(), clock.clone(), "heartbeat-report")
        .build("0 0 * * * *")
        .await
        .expect("first build succeeds");
    let first_schedules = repository.get_schedules_for_job(first.id).await.expect("schedules query succeeds");
    assert_eq!(first_schedules.len(), 1);

    let second = builder(repository.clone(), registry, clock, "heartbeat-report")
        .build("0 30 * * * *")
        .await
        .expect("second build succeeds");
    assert_ne!(first.id, second.id);

    // The first job's row survives, but its schedule was replaced by the rebuild.
    let remaining_for_first = repository.get_schedules_for_job(first.id).await.expect("schedules query succeeds");
    assert!(remaining_for_first.is_empty());
    let schedules_for_second = repository.get_schedules_for_job(second.id).await.expect("schedules query succeeds");
    assert_eq!(schedules_for_second.len(), 1);
}

#[tokio::test]
async fn a_one_shot_build_does_not_touch_an_existing_recurring_job_of_the_same_name() {
    let (repository, registry, clock) = harness();
    let recurring = builder(repository.clone(), registry.clone(), clock.clone(), "nightly-sync")
        .build("0 0 0 * * *")
        .await
        .expect("recurring build succeeds");

    builder(repository.clone(), registry, clock.clone(), "nightly-sync")
        .build_to_run_at(clock.now())
        .await
        .expect("one-shot build succeeds");

    let recurring_schedules = repository.get_schedules_for_job(recurring.id).await.expect("schedules query succeeds");
    assert_eq!(recurring_schedules.len(), 1, "one-shot build must not cancel the recurring job's schedule");
}

#[tokio::test]
async fn cancel_job_on_a_nonexistent_job_succeeds_with_no_effect() {
    let (repository, _registry, _clock) = harness();
    cancel_job(repository.as_ref(), "never-built", None).await.expect("cancel is a no-op, not an error");
}
