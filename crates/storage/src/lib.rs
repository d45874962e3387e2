// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cronmesh-storage: persistence backends for the distributed job scheduler.
//!
//! [`MemoryRepository`] is a genuine in-process store. [`sql::SqlRepository`]
//! persists to Postgres, MySQL or SQLite through `sqlx`'s `Any` driver,
//! dialect-sniffed from the connection URL.

pub mod error;
pub mod memory;
pub mod repository;
pub mod sql;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryRepository;
pub use repository::Repository;
pub use sql::{Dialect, SqlRepository};
