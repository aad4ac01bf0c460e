// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Collector state shared by all connections.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use evsync_core::Response;

use crate::archive::Archive;

/// Credentials a pusher must present during the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret: String,
}

/// Shared collector state: credentials, archive and counters.
#[derive(Clone)]
pub struct CollectorState {
    inner: Arc<CollectorStateInner>,
}

struct CollectorStateInner {
    /// Required credentials; `None` accepts every pusher.
    credentials: Option<Credentials>,
    /// Serializes appends so lines from concurrent connections never interleave.
    archive: Option<Arc<Mutex<Archive>>>,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl CollectorState {
    /// Creates the state, opening the archive if a path is given.
    pub fn new(credentials: Option<Credentials>, archive_path: Option<&Path>) -> io::Result<Self> {
        let archive = archive_path.map(Archive::open).transpose()?
            .map(|archive| Arc::new(Mutex::new(archive)));
        Ok(CollectorState {
            inner: Arc::new(CollectorStateInner {
                credentials,
                archive,
                accepted: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
            }),
        })
    }

    /// Checks handshake credentials. A missing header counts as empty.
    pub fn authorize(&self, access_key: Option<&str>, secret: Option<&str>) -> bool {
        match &self.inner.credentials {
            None => true,
            Some(expected) => {
                access_key.unwrap_or_default() == expected.access_key
                    && secret.unwrap_or_default() == expected.secret
            }
        }
    }

    /// Handles one event body, returning the reply for the pusher.
    ///
    /// JSON objects are archived and acknowledged with 201. Anything else
    /// gets 400. An archive failure gets 500, so the pusher keeps the event.
    pub async fn receive(&self, text: &str) -> Response {
        let event = match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) if value.is_object() => value,
            _ => {
                debug!(len = text.len(), "rejecting payload that is not a JSON object");
                return self.reject();
            }
        };

        if let Some(archive) = &self.inner.archive {
            // Append and fsync block, so they run off the connection task.
            let archive = Arc::clone(archive);
            let appended = tokio::task::spawn_blocking(move || {
                let archive = archive
                    .lock()
                    .map_err(|_| io::Error::other("archive lock poisoned"))?;
                archive.append(&event).inspect_err(|e| {
                    error!(error = %e, path = %archive.path().display(), "failed to archive event");
                })
            })
            .await;
            match appended {
                Ok(Ok(())) => {}
                Ok(Err(_)) => return Response::internal_error(),
                Err(e) => {
                    error!(error = %e, "archive task failed");
                    return Response::internal_error();
                }
            }
        }

        self.inner.accepted.fetch_add(1, Ordering::Relaxed);
        Response::created()
    }

    /// Counts a rejected payload.
    pub fn reject(&self) -> Response {
        self.inner.rejected.fetch_add(1, Ordering::Relaxed);
        Response::bad_request()
    }

    /// Number of events acknowledged so far.
    pub fn accepted(&self) -> u64 {
        self.inner.accepted.load(Ordering::Relaxed)
    }

    /// Number of payloads answered with 400.
    pub fn rejected(&self) -> u64 {
        self.inner.rejected.load(Ordering::Relaxed)
    }
}
