// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::info;

use super::open_db;
use crate::error::{Error, Result};
use crate::sync::Dispatcher;

/// Run the dispatcher until Ctrl-C.
pub fn run(config_path: &Path) -> Result<()> {
    let (db, config) = open_db(config_path)?;
    let db = Arc::new(Mutex::new(db));
    let mut dispatcher =
        Dispatcher::for_endpoint(config.dispatcher_config(), config.endpoint(), db)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        dispatcher.start().await?;
        info!(pending = dispatcher.pending_count()?, "waiting for events");

        tokio::signal::ctrl_c().await?;
        info!("interrupted, shutting down");

        dispatcher.stop().await?;
        Ok::<(), Error>(())
    })
}
