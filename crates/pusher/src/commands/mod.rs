// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod pending;
pub mod record;
pub mod run;

use std::path::{Path, PathBuf};

use evsync_core::Database;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::env;
use crate::error::Result;

/// Config file from the flag, then `EVSYNC_CONFIG`, then `./evsync.toml`.
pub fn config_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(env::config_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load the configuration and open its database.
pub fn open_db(config_path: &Path) -> Result<(Database, Config)> {
    let config = Config::resolve(config_path)?;
    let db_path = config.database_path(config_path);
    tracing::debug!(path = %db_path.display(), "opening database");
    let db = Database::open(&db_path)?;
    Ok((db, config))
}
