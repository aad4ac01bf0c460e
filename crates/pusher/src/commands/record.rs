// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Monitored writes from the command line.
//!
//! Capture is registered only when a remote is configured, matching what
//! `evsync run` does for the same configuration.

use std::path::Path;

use chrono::Utc;
use evsync_core::{Database, Job, JobRun, RunStatus};

use super::open_db;
use crate::config::Config;
use crate::error::Result;

pub fn record_run(
    config_path: &Path,
    job_id: &str,
    status: &str,
    initiator: &str,
    error: Option<String>,
) -> Result<()> {
    let (mut db, config) = open_db(config_path)?;
    let status: RunStatus = status.parse()?;
    enable_capture(&db, &config);

    let (run, event_id) = create_run(&mut db, job_id, status, initiator, error)?;
    println!("{}", describe(&run.id, event_id));
    Ok(())
}

pub fn update_run(
    config_path: &Path,
    run_id: &str,
    status: &str,
    error: Option<String>,
) -> Result<()> {
    let (mut db, config) = open_db(config_path)?;
    let status: RunStatus = status.parse()?;
    enable_capture(&db, &config);

    let mut run = db.get_job_run(run_id)?;
    run.transition(status, error, Utc::now());
    let event_id = db.update_job_run(&run)?;
    println!("{}", describe(&run.id, event_id));
    Ok(())
}

fn enable_capture(db: &Database, config: &Config) {
    if config.is_remote_mode() {
        db.capture_hook().register();
    }
}

/// Create `job_id` if needed, then a run in `status`.
pub(crate) fn create_run(
    db: &mut Database,
    job_id: &str,
    status: RunStatus,
    initiator: &str,
    error: Option<String>,
) -> Result<(JobRun, Option<i64>)> {
    if !db.job_exists(job_id)? {
        db.create_job(&Job::new(job_id.to_string(), job_id.to_string(), Utc::now()))?;
        tracing::debug!(job_id, "created job");
    }

    let now = Utc::now();
    let mut run = JobRun::new(job_id.to_string(), initiator.to_string(), now);
    if status != RunStatus::Pending || error.is_some() {
        run.transition(status, error, now);
    }
    let event_id = db.create_job_run(&run)?;
    Ok((run, event_id))
}

fn describe(run_id: &str, event_id: Option<i64>) -> String {
    match event_id {
        Some(id) => format!("{run_id} (queued event {id})"),
        None => format!("{run_id} (sync disabled)"),
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
