// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn one_shot_when_once_flag_set() {
    let job = Job::builder().once(true).cron_expression("* * * * * *").build();
    assert!(job.is_one_shot());
}

#[test]
fn one_shot_when_cron_expression_empty() {
    let job = Job::builder().once(false).cron_expression("").build();
    assert!(job.is_one_shot());
}

#[test]
fn recurring_when_not_once_and_cron_present() {
    let job = Job::builder().once(false).cron_expression("*/1 * * * * *").build();
    assert!(!job.is_one_shot());
}
