// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::path::PathBuf;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `evsync` with no inherited configuration from the environment.
pub fn evsync() -> Command {
    let mut cmd = cargo_bin_cmd!("evsync");
    cmd.env_remove("EVSYNC_REMOTE_URL")
        .env_remove("EVSYNC_ACCESS_KEY")
        .env_remove("EVSYNC_SECRET")
        .env_remove("EVSYNC_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Temp directory with an `evsync.toml` holding `content`.
pub fn temp_with_config(content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("evsync.toml"), content).unwrap();
    temp
}

/// Config pointing at a collector that is never listening.
pub const UNREACHABLE_REMOTE: &str = r#"
[remote]
url = "ws://127.0.0.1:9"
access_key = "key"
secret = "secret"

[dispatch]
poll_period_ms = 50
"#;

/// Record a run and return its id.
pub fn record_run(temp: &TempDir, job: &str) -> String {
    let output = evsync()
        .args(["record-run", "--job", job])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "record-run failed: {output:?}");
    String::from_utf8(output.stdout)
        .unwrap()
        .split_whitespace()
        .next()
        .unwrap()
        .to_string()
}

pub fn db_path(temp: &TempDir) -> PathBuf {
    temp.path().join("evsync.db")
}
