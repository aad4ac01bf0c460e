// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    pending = { "pending", RunStatus::Pending },
    in_progress = { "in_progress", RunStatus::InProgress },
    completed = { "completed", RunStatus::Completed },
    errored = { "ERRORED", RunStatus::Errored },
    cancelled = { "cancelled", RunStatus::Cancelled },
)]
fn run_status_parses(input: &str, expected: RunStatus) {
    assert_eq!(input.parse::<RunStatus>().unwrap(), expected);
}

#[test]
fn run_status_rejects_unknown() {
    let err = "paused".parse::<RunStatus>().unwrap_err();
    assert!(matches!(err, Error::InvalidRunStatus(s) if s == "paused"));
}

#[test]
fn run_status_round_trips_through_display() {
    for status in [
        RunStatus::Pending,
        RunStatus::InProgress,
        RunStatus::Completed,
        RunStatus::Errored,
        RunStatus::Cancelled,
    ] {
        assert_eq!(status.to_string().parse::<RunStatus>().unwrap(), status);
    }
}

#[test]
fn new_run_is_pending_with_unique_id() {
    let now = Utc::now();
    let a = JobRun::new("job-1".into(), "web".into(), now);
    let b = JobRun::new("job-1".into(), "web".into(), now);

    assert_eq!(a.status, RunStatus::Pending);
    assert_eq!(a.created_at, a.updated_at);
    assert!(a.finished_at.is_none());
    assert_ne!(a.id, b.id);
}

#[test]
fn transition_to_terminal_stamps_finished_at() {
    let start = Utc::now();
    let mut run = JobRun::new("job-1".into(), "cron".into(), start);

    let later = start + chrono::Duration::seconds(3);
    run.transition(RunStatus::InProgress, None, later);
    assert!(run.finished_at.is_none());

    let end = later + chrono::Duration::seconds(3);
    run.transition(RunStatus::Errored, Some("boom".into()), end);
    assert_eq!(run.finished_at, Some(end));
    assert_eq!(run.updated_at, end);
    assert_eq!(run.error.as_deref(), Some("boom"));
}
