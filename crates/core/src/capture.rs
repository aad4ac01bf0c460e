// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture step for monitored entities.
//!
//! Writes to a [`Monitored`] entity call [`CaptureHook::record`] inside the
//! same transaction as the entity write, so the queued sync event and its
//! source either both persist or neither does. The hook is a shared switch:
//! the dispatcher registers it when a remote is configured and unregisters it
//! on shutdown. While unregistered, recording is a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rusqlite::Connection;
use serde::Serialize;

use crate::error::Result;
use crate::event;

/// An entity whose creates and updates are mirrored to the remote collector.
pub trait Monitored {
    /// Wire representation of the entity.
    type Presenter<'a>: Serialize
    where
        Self: 'a;

    /// Maps the entity to its wire representation.
    fn present(&self) -> Self::Presenter<'_>;
}

/// Registration switch for the capture step.
///
/// Cloning shares the switch, so the storage layer and the dispatcher see
/// the same registration state.
#[derive(Debug, Clone, Default)]
pub struct CaptureHook {
    registered: Arc<AtomicBool>,
}

impl CaptureHook {
    /// Creates an unregistered hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables capture for subsequent monitored writes.
    pub fn register(&self) {
        self.registered.store(true, Ordering::Release);
    }

    /// Disables capture for subsequent monitored writes.
    pub fn unregister(&self) {
        self.registered.store(false, Ordering::Release);
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Appends a sync event for `entity` using the caller's connection.
    ///
    /// Pass the open transaction of the triggering write. Returns the new
    /// event id, or `None` when the hook is unregistered. A serialization
    /// failure is returned to the caller, which must abandon its write.
    pub fn record<E: Monitored + ?Sized>(
        &self,
        conn: &Connection,
        entity: &E,
    ) -> Result<Option<i64>> {
        if !self.is_registered() {
            return Ok(None);
        }

        let body = serde_json::to_string(&entity.present())?;
        let id = event::insert(conn, &body)?;
        tracing::debug!(event_id = id, "captured sync event");
        Ok(Some(id))
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
