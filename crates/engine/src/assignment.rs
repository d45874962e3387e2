// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-assignment policy for a recurring job's next occurrence.

use cronmesh_core::{Worker, WorkerId, WorkerJobCount};
use rand::seq::SliceRandom;

/// Pick the worker that should own a job's next occurrence.
///
/// If no history exists yet for this job, the current owner keeps it — an
/// empty metric list is treated as "nothing to rebalance against" rather
/// than handing the job to an arbitrary alive worker. Otherwise every
/// alive worker missing from the metric list is
/// added at count zero, and the least-loaded worker wins; ties are broken
/// uniformly at random rather than by the first match in sort order, so a
/// persistent tie (e.g. two workers both freshly alive) doesn't always
/// favor the same one.
pub fn pick_next_worker(counts: &[WorkerJobCount], alive_workers: &[Worker], current_owner: &WorkerId) -> WorkerId {
    if counts.is_empty() {
        return current_owner.clone();
    }

    let mut tally: Vec<(WorkerId, i64)> = counts.iter().map(|c| (c.worker_id.clone(), c.count)).collect();
    for worker in alive_workers {
        if !tally.iter().any(|(id, _)| id == &worker.worker_id) {
            tally.push((worker.worker_id.clone(), 0));
        }
    }

    let Some(min_count) = tally.iter().map(|(_, count)| *count).min() else {
        return current_owner.clone();
    };
    let least_loaded: Vec<WorkerId> =
        tally.into_iter().filter(|(_, count)| *count == min_count).map(|(id, _)| id).collect();

    least_loaded.choose(&mut rand::thread_rng()).cloned().unwrap_or_else(|| current_owner.clone())
}

#[cfg(test)]
#[path = "assignment_tests.rs"]
mod tests;
