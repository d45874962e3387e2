// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-layer error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported connection url {0:?}")]
    UnsupportedDialect(String),

    #[error(transparent)]
    Sql(#[from] sqlx::Error),

    #[error("row decode failure: {0}")]
    Decode(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
