// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const QUICKSTART_HELP: &str = "\
Get started:
  evsync record-run --job nightly   Record a job run (queued when a remote is set)
  evsync pending                    List events awaiting acknowledgment
  evsync run                        Forward queued events until Ctrl-C";

#[derive(Parser)]
#[command(name = "evsync")]
#[command(version)]
#[command(about = "Forward captured job-run events to a remote collector")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Configuration file (default: $EVSYNC_CONFIG or ./evsync.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the dispatcher until interrupted
    Run,

    /// List events awaiting acknowledgment
    Pending,

    /// Record a new job run
    RecordRun {
        /// Job the run belongs to (created if missing)
        #[arg(long)]
        job: String,

        /// Initial status: pending, in_progress, completed, errored, cancelled
        #[arg(long, default_value = "pending")]
        status: String,

        /// What started the run
        #[arg(long, default_value = "cli")]
        initiator: String,

        /// Error message for errored runs
        #[arg(long)]
        error: Option<String>,
    },

    /// Change the status of an existing job run
    UpdateRun {
        /// Run ID
        id: String,

        /// New status
        #[arg(long)]
        status: String,

        /// Error message for errored runs
        #[arg(long)]
        error: Option<String>,
    },
}
