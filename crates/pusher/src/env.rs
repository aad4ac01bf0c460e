// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule. Empty values count as unset.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Returns the value of `EVSYNC_REMOTE_URL` if set.
pub fn remote_url() -> Option<String> {
    non_empty(vars::EVSYNC_REMOTE_URL)
}

/// Returns the value of `EVSYNC_ACCESS_KEY` if set.
pub fn access_key() -> Option<String> {
    non_empty(vars::EVSYNC_ACCESS_KEY)
}

/// Returns the value of `EVSYNC_SECRET` if set.
pub fn secret() -> Option<String> {
    non_empty(vars::EVSYNC_SECRET)
}

/// Returns the value of `EVSYNC_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    non_empty(vars::EVSYNC_CONFIG).map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
