// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_starts_new() {
    let history = JobHistory::builder().job_id(JobId::new(1)).build();
    assert_eq!(history.status, JobHistoryStatus::New);
    assert_eq!(history.retry_count, 0);
}
