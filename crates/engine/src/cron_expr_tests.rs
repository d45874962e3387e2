// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn every_second_fires_one_second_later() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let next = next_occurrence("*/1 * * * * *", start).unwrap();
    assert_eq!(next, start + chrono::Duration::seconds(1));
}

#[test]
fn invalid_expression_is_rejected() {
    assert!(next_occurrence("not a cron expression", Utc::now()).is_err());
}
