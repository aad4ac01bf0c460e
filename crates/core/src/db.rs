// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed storage for jobs, job runs and the sync event queue.
//!
//! The [`Database`] struct owns the connection and the [`CaptureHook`] for
//! monitored writes. Every monitored write goes through
//! [`Database::write_monitored`], which appends the sync event in the same
//! transaction as the entity write.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;

use crate::capture::{CaptureHook, Monitored};
use crate::error::{Error, Result};
use crate::event::SyncEvent;
use crate::run::{Job, JobRun};

/// SQL schema for the dispatcher database.
pub const SCHEMA: &str = r#"
-- Job definitions (not monitored)
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Job executions (monitored)
CREATE TABLE IF NOT EXISTS job_runs (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    error TEXT,
    initiator TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    finished_at TEXT,
    FOREIGN KEY (job_id) REFERENCES jobs(id)
);

-- Events awaiting acknowledgment by the collector
CREATE TABLE IF NOT EXISTS sync_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_job_runs_job ON job_runs(job_id);
CREATE INDEX IF NOT EXISTS idx_job_runs_status ON job_runs(status);
"#;

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn parse_timestamp_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<DateTime<Utc>>, rusqlite::Error> {
    value.map(|s| parse_timestamp(&s, column)).transpose()
}

fn job_run_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<JobRun, rusqlite::Error> {
    let status_str: String = row.get(2)?;
    let created_str: String = row.get(5)?;
    let updated_str: String = row.get(6)?;
    let finished_str: Option<String> = row.get(7)?;

    Ok(JobRun {
        id: row.get(0)?,
        job_id: row.get(1)?,
        status: parse_db(&status_str, "status")?,
        error: row.get(3)?,
        initiator: row.get(4)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
        finished_at: parse_timestamp_opt(finished_str, "finished_at")?,
    })
}

/// Apply the schema to a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection with job and sync queue operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
    capture: CaptureHook,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for concurrency
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database {
            conn,
            capture: CaptureHook::new(),
        };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database {
            conn,
            capture: CaptureHook::new(),
        };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Returns a handle sharing this database's capture registration.
    pub fn capture_hook(&self) -> CaptureHook {
        self.capture.clone()
    }

    /// Runs `write` and the capture step for `entity` in one transaction.
    ///
    /// Returns the id of the captured event, if capture is registered. If
    /// either the write or the capture fails, nothing is committed.
    pub fn write_monitored<E, F>(&mut self, entity: &E, write: F) -> Result<Option<i64>>
    where
        E: Monitored + ?Sized,
        F: FnOnce(&Transaction<'_>) -> Result<()>,
    {
        let tx = self.conn.transaction()?;
        write(&tx)?;
        let event_id = self.capture.record(&tx, entity)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Create a new job.
    pub fn create_job(&self, job: &Job) -> Result<()> {
        self.conn.execute(
            "INSERT INTO jobs (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![job.id, job.name, job.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Get a job by ID.
    pub fn get_job(&self, id: &str) -> Result<Job> {
        let job = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM jobs WHERE id = ?1",
                params![id],
                |row| {
                    let created_str: String = row.get(2)?;
                    Ok(Job {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: parse_timestamp(&created_str, "created_at")?,
                    })
                },
            )
            .optional()?;

        job.ok_or_else(|| Error::JobNotFound(id.to_string()))
    }

    /// Check if a job exists.
    pub fn job_exists(&self, id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM jobs WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Create a job run, capturing a sync event when registered.
    pub fn create_job_run(&mut self, run: &JobRun) -> Result<Option<i64>> {
        self.write_monitored(run, |tx| {
            tx.execute(
                "INSERT INTO job_runs (id, job_id, status, error, initiator,
                 created_at, updated_at, finished_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    run.id,
                    run.job_id,
                    run.status.as_str(),
                    run.error,
                    run.initiator,
                    run.created_at.to_rfc3339(),
                    run.updated_at.to_rfc3339(),
                    run.finished_at.map(|t| t.to_rfc3339()),
                ],
            )?;
            Ok(())
        })
    }

    /// Persist the mutable fields of a job run in a single update.
    ///
    /// Captures exactly one sync event regardless of how many fields changed.
    pub fn update_job_run(&mut self, run: &JobRun) -> Result<Option<i64>> {
        self.write_monitored(run, |tx| {
            let affected = tx.execute(
                "UPDATE job_runs SET status = ?1, error = ?2, updated_at = ?3, finished_at = ?4
                 WHERE id = ?5",
                params![
                    run.status.as_str(),
                    run.error,
                    run.updated_at.to_rfc3339(),
                    run.finished_at.map(|t| t.to_rfc3339()),
                    run.id,
                ],
            )?;
            if affected == 0 {
                return Err(Error::JobRunNotFound(run.id.clone()));
            }
            Ok(())
        })
    }

    /// Get a job run by ID.
    pub fn get_job_run(&self, id: &str) -> Result<JobRun> {
        let run = self
            .conn
            .query_row(
                "SELECT id, job_id, status, error, initiator, created_at, updated_at, finished_at
                 FROM job_runs WHERE id = ?1",
                params![id],
                job_run_from_row,
            )
            .optional()?;

        run.ok_or_else(|| Error::JobRunNotFound(id.to_string()))
    }

    /// List all runs of a job, oldest first.
    pub fn list_job_runs(&self, job_id: &str) -> Result<Vec<JobRun>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, job_id, status, error, initiator, created_at, updated_at, finished_at
             FROM job_runs WHERE job_id = ?1 ORDER BY created_at, id",
        )?;
        let runs = stmt
            .query_map(params![job_id], job_run_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    /// Visit every queued sync event in id order.
    ///
    /// Stops at, and returns, the first error produced by `visit`.
    pub fn for_each_sync_event<E, F>(&self, mut visit: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnMut(SyncEvent) -> std::result::Result<(), E>,
    {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body, created_at FROM sync_events ORDER BY id")
            .map_err(Error::from)?;
        let rows = stmt
            .query_map([], |row| {
                let created_str: String = row.get(2)?;
                Ok(SyncEvent {
                    id: row.get(0)?,
                    body: row.get(1)?,
                    created_at: parse_timestamp(&created_str, "created_at")?,
                })
            })
            .map_err(Error::from)?;

        for row in rows {
            let event = row.map_err(Error::from)?;
            visit(event)?;
        }
        Ok(())
    }

    /// Collect all queued sync events in id order.
    pub fn sync_events(&self) -> Result<Vec<SyncEvent>> {
        let mut events = Vec::new();
        self.for_each_sync_event(|event| {
            events.push(event);
            Ok::<(), Error>(())
        })?;
        Ok(events)
    }

    /// Number of queued sync events.
    pub fn count_sync_events(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sync_events", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete an acknowledged sync event.
    pub fn delete_sync_event(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM sync_events WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::SyncEventNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
