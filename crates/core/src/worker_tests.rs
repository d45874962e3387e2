// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn alive_within_three_heartbeats() {
    let now = Utc::now();
    let worker = Worker::new(WorkerId::new("w1"), now - chrono::Duration::seconds(89));
    assert!(worker.is_alive(now, chrono::Duration::seconds(30)));
}

#[test]
fn dead_past_three_heartbeats() {
    let now = Utc::now();
    let worker = Worker::new(WorkerId::new("w1"), now - chrono::Duration::seconds(91));
    assert!(!worker.is_alive(now, chrono::Duration::seconds(30)));
}
