// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use evsync_core::Database;

use super::open_db;
use crate::error::Result;

pub fn run(config_path: &Path) -> Result<()> {
    let (db, _) = open_db(config_path)?;
    let stdout = std::io::stdout();
    write_pending(&db, &mut stdout.lock())
}

/// One line per queued event, oldest first, then a count.
pub(crate) fn write_pending(db: &Database, out: &mut impl Write) -> Result<()> {
    let events = db.sync_events()?;
    for event in &events {
        writeln!(
            out,
            "{}\t{}\t{} bytes",
            event.id,
            event.created_at.to_rfc3339(),
            event.body.len()
        )?;
    }
    writeln!(out, "{} pending event(s)", events.len())?;
    Ok(())
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
