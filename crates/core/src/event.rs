// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable sync events awaiting acknowledgment by the collector.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A queued event holding the serialized payload of one monitored write.
///
/// The body is produced once at capture time and never modified. The row is
/// deleted only after the collector acknowledges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Monotonic queue id, also the deletion key.
    pub id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Inserts a new event row on `conn`, returning its id.
pub(crate) fn insert(conn: &Connection, body: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO sync_events (body, created_at) VALUES (?1, ?2)",
        params![body, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}
