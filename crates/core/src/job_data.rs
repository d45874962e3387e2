// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serialization helpers for the `job_data` snapshot carried on every
//! [`crate::schedule::Schedule`].
//!
//! The wire format is a JSON object string, with one deliberate deviation
//! from plain `serde_json`: an empty map serializes to the empty string,
//! not `"{}"` or `"null"`. Schedules created before a job ever ran carry
//! no data at all, and the empty string reads unambiguously as "nothing
//! here" in a database column, whereas `"null"` would need a second parse
//! branch everywhere it's read.

use std::collections::HashMap;

pub type JobData = HashMap<String, String>;

/// Serialize job data to its on-wire form.
///
/// An empty map becomes the empty string.
pub fn encode(data: &JobData) -> Result<String, serde_json::Error> {
    if data.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(data)
}

/// Parse job data from its on-wire form.
///
/// The empty string decodes back to an empty map.
pub fn decode(raw: &str) -> Result<JobData, serde_json::Error> {
    if raw.is_empty() {
        return Ok(JobData::new());
    }
    serde_json::from_str(raw)
}

#[cfg(test)]
#[path = "job_data_tests.rs"]
mod tests;
