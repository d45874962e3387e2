// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store-assigned identifiers for [`crate::job::Job`], [`crate::schedule::Schedule`]
//! and [`crate::history::JobHistory`].

crate::define_store_id! {
    /// Primary key of a `jobs` row.
    pub struct JobId;
}

crate::define_store_id! {
    /// Primary key of a `schedules` row.
    pub struct ScheduleId;
}

crate::define_store_id! {
    /// Primary key of a `job_histories` row.
    pub struct JobHistoryId;
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
