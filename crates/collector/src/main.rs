// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! evsync-collector: reference collector for evsync pushers.
//!
//! Accepts WebSocket connections from pushers, archives every event that is
//! a JSON object, and acknowledges it with `{"status":201}`.

mod archive;
mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use state::{CollectorState, Credentials};

/// evsync-collector: event collector for evsync pushers
#[derive(Parser, Debug)]
#[command(name = "evsync-collector")]
#[command(about = "WebSocket collector that acknowledges evsync events")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Access key pushers must present (requires --secret)
    #[arg(long, requires = "secret")]
    access_key: Option<String>,

    /// Secret pushers must present (requires --access-key)
    #[arg(long, requires = "access_key")]
    secret: Option<String>,

    /// JSONL file receiving accepted events
    #[arg(short, long)]
    archive: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let credentials = match (args.access_key, args.secret) {
        (Some(access_key), Some(secret)) => Some(Credentials { access_key, secret }),
        _ => None,
    };

    info!("Starting evsync-collector");
    info!("  Bind address: {}", args.bind);
    info!(
        "  Authentication: {}",
        if credentials.is_some() { "required" } else { "disabled" }
    );
    if let Some(path) = &args.archive {
        info!("  Archive: {}", path.display());
    }

    let state = CollectorState::new(credentials, args.archive.as_deref())?;

    server::run(args.bind, state).await?;

    Ok(())
}
