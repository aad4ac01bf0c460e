// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Access to the durable sync event queue.
//!
//! The queue lives in the same SQLite database as the monitored entities.
//! The dispatcher only enumerates events and deletes them by id; bodies are
//! never modified after capture.

use std::sync::{Arc, Mutex, MutexGuard};

use evsync_core::{Database, SyncEvent};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] evsync_core::Error),

    /// A writer panicked while holding the database lock.
    #[error("database lock poisoned")]
    Poisoned,
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Database handle shared between the write path and the dispatcher.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Queue of events awaiting acknowledgment.
pub trait EventQueue: Send + Sync {
    /// Visit every queued event in id order.
    ///
    /// Stops at, and returns, the first error produced by `visit`.
    fn for_each_pending(
        &self,
        visit: &mut dyn FnMut(&SyncEvent) -> QueueResult<()>,
    ) -> QueueResult<()>;

    /// Delete an acknowledged event.
    fn delete(&self, id: i64) -> QueueResult<()>;

    /// Snapshot of all queued events in id order.
    fn pending(&self) -> QueueResult<Vec<SyncEvent>> {
        let mut events = Vec::new();
        self.for_each_pending(&mut |event| {
            events.push(event.clone());
            Ok(())
        })?;
        Ok(events)
    }

    /// Number of queued events.
    fn pending_count(&self) -> QueueResult<usize> {
        Ok(self.pending()?.len())
    }
}

/// [`EventQueue`] backed by the shared SQLite database.
#[derive(Clone)]
pub struct SqliteQueue {
    db: SharedDatabase,
}

impl SqliteQueue {
    pub fn new(db: SharedDatabase) -> Self {
        SqliteQueue { db }
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| QueueError::Poisoned)
    }
}

impl EventQueue for SqliteQueue {
    fn for_each_pending(
        &self,
        visit: &mut dyn FnMut(&SyncEvent) -> QueueResult<()>,
    ) -> QueueResult<()> {
        let db = self.lock()?;
        db.for_each_sync_event(|event| visit(&event))
    }

    fn delete(&self, id: i64) -> QueueResult<()> {
        self.lock()?.delete_sync_event(id)?;
        Ok(())
    }

    fn pending_count(&self) -> QueueResult<usize> {
        Ok(self.lock()?.count_sync_events()?)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
