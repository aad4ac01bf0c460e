// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Job and job run entities.
//!
//! A [`JobRun`] is the monitored entity: every create or update is mirrored to
//! the remote collector. A [`Job`] is local bookkeeping and is never captured.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Lifecycle status of a job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created but not yet executing.
    Pending,
    /// Currently executing.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Errored,
    /// Stopped before completion.
    Cancelled,
}

impl RunStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
            RunStatus::Errored => "errored",
            RunStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true if the run can no longer change status.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Errored | RunStatus::Cancelled
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RunStatus::Pending),
            "in_progress" => Ok(RunStatus::InProgress),
            "completed" => Ok(RunStatus::Completed),
            "errored" => Ok(RunStatus::Errored),
            "cancelled" => Ok(RunStatus::Cancelled),
            _ => Err(Error::InvalidRunStatus(s.to_string())),
        }
    }
}

/// A job definition. Runs reference their job by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: String, name: String, created_at: DateTime<Utc>) -> Self {
        Job {
            id,
            name,
            created_at,
        }
    }
}

/// A single execution of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub id: String,
    pub job_id: String,
    pub status: RunStatus,
    pub error: Option<String>,
    /// What started the run (e.g. "web", "cron", "runlog").
    pub initiator: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobRun {
    /// Creates a pending run with a fresh id.
    pub fn new(job_id: String, initiator: String, created_at: DateTime<Utc>) -> Self {
        JobRun {
            id: uuid::Uuid::new_v4().simple().to_string(),
            job_id,
            status: RunStatus::Pending,
            error: None,
            initiator,
            created_at,
            updated_at: created_at,
            finished_at: None,
        }
    }

    /// Moves the run to `status`, stamping `finished_at` for terminal states.
    pub fn transition(&mut self, status: RunStatus, error: Option<String>, at: DateTime<Utc>) {
        self.status = status;
        self.error = error;
        self.updated_at = at;
        if status.is_finished() {
            self.finished_at = Some(at);
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
