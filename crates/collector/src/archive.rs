// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL archive of accepted events.
//!
//! Each accepted event is stored as a single JSON line with fsync, so an
//! acknowledgment is only sent for an event that reached the disk.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One archived event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedEvent {
    pub received_at: DateTime<Utc>,
    /// The event body exactly as the pusher sent it.
    pub event: serde_json::Value,
}

/// Append-only JSONL file.
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
}

impl Archive {
    /// Opens the archive, creating the file and its parent directory if needed.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Archive {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `event` with the current time and syncs the file.
    pub fn append(&self, event: &serde_json::Value) -> io::Result<()> {
        let record = ArchivedEvent {
            received_at: Utc::now(),
            event: event.clone(),
        };
        let json = serde_json::to_string(&record)?;

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{json}")?;
        file.sync_all()
    }
}

/// Reads every archived event. A missing file reads as empty.
#[cfg_attr(not(test), allow(dead_code))]
pub fn read_all(path: &Path) -> io::Result<Vec<ArchivedEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
