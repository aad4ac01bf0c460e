// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::EVSYNC_REMOTE_URL, "EVSYNC_REMOTE_URL");
    assert_eq!(vars::EVSYNC_ACCESS_KEY, "EVSYNC_ACCESS_KEY");
    assert_eq!(vars::EVSYNC_SECRET, "EVSYNC_SECRET");
    assert_eq!(vars::EVSYNC_CONFIG, "EVSYNC_CONFIG");
}

#[test]
fn test_remote_url_set_and_unset() {
    std::env::set_var("EVSYNC_REMOTE_URL", "ws://localhost:7890");
    assert_eq!(remote_url().as_deref(), Some("ws://localhost:7890"));
    std::env::remove_var("EVSYNC_REMOTE_URL");
    assert_eq!(remote_url(), None);
}

#[test]
fn test_access_key_empty_is_unset() {
    std::env::set_var("EVSYNC_ACCESS_KEY", "");
    assert_eq!(access_key(), None);
    std::env::remove_var("EVSYNC_ACCESS_KEY");
}

#[test]
fn test_secret_set() {
    std::env::set_var("EVSYNC_SECRET", "s3cret");
    assert_eq!(secret().as_deref(), Some("s3cret"));
    std::env::remove_var("EVSYNC_SECRET");
}

#[test]
fn test_config_path_set() {
    std::env::set_var("EVSYNC_CONFIG", "/etc/evsync.toml");
    assert_eq!(config_path(), Some(PathBuf::from("/etc/evsync.toml")));
    std::env::remove_var("EVSYNC_CONFIG");
}
