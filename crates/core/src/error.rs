// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for evsync-core operations.

use thiserror::Error;

/// All possible errors that can occur in evsync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("job run not found: {0}")]
    JobRunNotFound(String),

    #[error("sync event not found: {0}")]
    SyncEventNotFound(i64),

    #[error("invalid run status: '{0}'\n  hint: valid statuses are: pending, in_progress, completed, errored, cancelled")]
    InvalidRunStatus(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for evsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
