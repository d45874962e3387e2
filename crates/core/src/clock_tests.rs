// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn fake_clock_advances_monotonically() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    assert_eq!(clock.now(), start);

    clock.advance(chrono::Duration::seconds(30));
    assert_eq!(clock.now(), start + chrono::Duration::seconds(30));
}

#[test]
fn now_nanos_round_trips_through_chrono() {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let clock = FakeClock::new(start);
    let nanos = clock.now_nanos();
    assert_eq!(nanos, start.timestamp_nanos_opt().unwrap());
}

#[test]
fn system_clock_is_close_to_wall_clock() {
    let clock = SystemClock;
    let before = Utc::now();
    let now = clock.now();
    let after = Utc::now();
    assert!(before <= now && now <= after);
}
