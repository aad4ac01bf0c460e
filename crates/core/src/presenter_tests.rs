// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::Value;

fn sample_run() -> JobRun {
    let created = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    JobRun::new("job-abc".into(), "cron".into(), created)
}

#[test]
fn presenter_uses_camel_case_fields() {
    let run = sample_run();
    let json: Value = serde_json::to_value(run.present()).unwrap();

    assert_eq!(json["runId"], run.id.as_str());
    assert_eq!(json["jobId"], "job-abc");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["initiator"]["type"], "cron");
    assert_eq!(json["createdAt"], "2026-03-01T12:00:00Z");
    assert!(json["finishedAt"].is_null());
}

#[test]
fn presenter_omits_absent_error() {
    let run = sample_run();
    let json: Value = serde_json::to_value(run.present()).unwrap();
    assert!(json.get("error").is_none());
}

#[test]
fn presenter_includes_error_and_finish_time() {
    let mut run = sample_run();
    let end = run.created_at + chrono::Duration::seconds(10);
    run.transition(RunStatus::Errored, Some("timeout".into()), end);

    let json: Value = serde_json::to_value(run.present()).unwrap();
    assert_eq!(json["status"], "errored");
    assert_eq!(json["error"], "timeout");
    assert_eq!(json["finishedAt"], "2026-03-01T12:00:10Z");
}
