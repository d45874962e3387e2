// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identifier and entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a worker instance.
///
/// Unlike every other id in this crate, a `WorkerId` is caller-supplied
/// rather than store-assigned — it defaults to the process's host name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a `WorkerId` from this process's host name.
    ///
    /// Falls back to `"unknown-worker"` if the host name cannot be read
    /// (e.g. a sandboxed environment without `/etc/hostname`).
    pub fn from_hostname() -> Self {
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .map(Self::new)
            .unwrap_or_else(|| Self::new("unknown-worker"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for WorkerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WorkerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for WorkerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A participating scheduler process.
///
/// Never hard-deleted by the engine; `deleted_at` exists purely so the
/// repository contract matches the store's soft-deletion convention for
/// the other three entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: WorkerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Worker {
    pub fn new(worker_id: WorkerId, now: DateTime<Utc>) -> Self {
        Self { worker_id, created_at: now, updated_at: now, deleted_at: None }
    }

    /// A worker is alive iff its last heartbeat is within `3 * heartbeat_period` of `now`.
    pub fn is_alive(&self, now: DateTime<Utc>, heartbeat_period: chrono::Duration) -> bool {
        now - self.updated_at < heartbeat_period * 3
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
