// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn display_matches_inner_integer() {
    assert_eq!(JobId::new(42).to_string(), "42");
}

#[test]
fn round_trips_through_i64() {
    let id = ScheduleId::from(7);
    let raw: i64 = id.into();
    assert_eq!(raw, 7);
}
