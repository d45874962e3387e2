// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron expression parsing — a thin wrapper over the `cron` crate's
//! six-field (sec, min, hour, dom, month, dow) syntax.

use chrono::{DateTime, Utc};
use cronmesh_core::SchedulerError;
use std::str::FromStr;

/// Parse a six-field cron expression and return the next occurrence
/// strictly after `after`.
pub fn next_occurrence(expression: &str, after: DateTime<Utc>) -> Result<DateTime<Utc>, SchedulerError> {
    let schedule = cron::Schedule::from_str(expression).map_err(|e| SchedulerError::InvalidCronExpression {
        expression: expression.to_string(),
        reason: e.to_string(),
    })?;
    schedule.after(&after).next().ok_or_else(|| SchedulerError::InvalidCronExpression {
        expression: expression.to_string(),
        reason: "expression never fires again".to_string(),
    })
}

#[cfg(test)]
#[path = "cron_expr_tests.rs"]
mod tests;
