// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Driver detection and placeholder-syntax handling.
//!
//! `sqlx`'s `Any` driver abstracts over connection pooling but not over bind
//! placeholder syntax — Postgres wants `$1, $2, ...`, MySQL and SQLite want
//! repeated `?`. Every query is built through [`Dialect::placeholders`]
//! instead of hardcoding one or the other.

use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Sniff the dialect from a connection URL's scheme.
    pub fn from_url(url: &str) -> StorageResult<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else if url.starts_with("mysql://") {
            Ok(Self::MySql)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else {
            Err(StorageError::UnsupportedDialect(url.to_string()))
        }
    }

    /// Render `count` placeholders, comma-separated, starting at `$1`/`?`.
    pub fn placeholders(&self, count: usize) -> String {
        match self {
            Self::Postgres => (1..=count).map(|i| format!("${i}")).collect::<Vec<_>>().join(", "),
            Self::MySql | Self::Sqlite => vec!["?"; count].join(", "),
        }
    }

    /// A single placeholder at 1-based position `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }

    /// `INSERT ... RETURNING id` is only available on Postgres/SQLite;
    /// MySQL needs `LAST_INSERT_ID()` read back separately.
    pub fn supports_returning(&self) -> bool {
        matches!(self, Self::Postgres | Self::Sqlite)
    }

    /// Null-safe equality operator: standard SQL's `IS NOT DISTINCT FROM`
    /// on Postgres/SQLite, MySQL's `<=>` everywhere else.
    pub fn null_safe_eq(&self, lhs: &str, rhs: &str) -> String {
        match self {
            Self::Postgres | Self::Sqlite => format!("{lhs} IS NOT DISTINCT FROM {rhs}"),
            Self::MySql => format!("{lhs} <=> {rhs}"),
        }
    }
}

#[cfg(test)]
#[path = "dialect_tests.rs"]
mod tests;
