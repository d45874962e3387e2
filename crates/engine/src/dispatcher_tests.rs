// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

struct Doubler;

impl Job for Doubler {
    fn job_name(&self) -> &str {
        "doubler"
    }

    fn execute(&mut self, _job_data: JobData) {}

    fn job_data(&self) -> JobData {
        JobData::from([("ran".to_string(), "true".to_string())])
    }
}

struct Panicky;

impl Job for Panicky {
    fn job_name(&self) -> &str {
        "panicky"
    }

    fn execute(&mut self, _job_data: JobData) {
        panic!("boom");
    }

    fn job_data(&self) -> JobData {
        JobData::new()
    }
}

#[tokio::test]
async fn normal_return_marks_completed() {
    let outcome = dispatch(Box::new(Doubler), String::new()).await;
    assert_eq!(outcome.status, JobHistoryStatus::Completed);
    assert!(outcome.job_data.is_some());
}

#[tokio::test]
async fn panic_marks_failed_without_crashing_caller() {
    let outcome = dispatch(Box::new(Panicky), String::new()).await;
    assert_eq!(outcome.status, JobHistoryStatus::Failed);
    assert!(outcome.job_data.is_none());
}
