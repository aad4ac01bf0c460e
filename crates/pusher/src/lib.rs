// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! evsync - forwards captured events to a remote collector.
//!
//! Monitored writes in [`evsync_core`] append sync events to a durable queue
//! in the same transaction. This crate drains that queue: the
//! [`sync::Dispatcher`] polls it and pushes each event over a
//! [`sync::Transport`], deleting it only once the collector answers 201.
//!
//! # Main Components
//!
//! - [`sync`] - dispatcher, transports, queue access and backoff
//! - [`Config`] - TOML configuration with environment overrides
//! - [`Error`] - Error types for the binary
//!
//! ```rust,ignore
//! use evsync::sync::Dispatcher;
//!
//! let config = Config::resolve(Path::new("evsync.toml"))?;
//! let db = Arc::new(Mutex::new(Database::open(&config.database_path(path))?));
//! let mut dispatcher =
//!     Dispatcher::for_endpoint(config.dispatcher_config(), config.endpoint(), db)?;
//! dispatcher.start().await?;
//! // ...
//! dispatcher.stop().await?;
//! ```

mod cli;
mod commands;
mod logging;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{Error, Result};

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose);
    let config_path = commands::config_path(cli.config);

    match cli.command {
        Command::Run => commands::run::run(&config_path),
        Command::Pending => commands::pending::run(&config_path),
        Command::RecordRun {
            job,
            status,
            initiator,
            error,
        } => commands::record::record_run(&config_path, &job, &status, &initiator, error),
        Command::UpdateRun { id, status, error } => {
            commands::record::update_run(&config_path, &id, &status, error)
        }
    }
}
