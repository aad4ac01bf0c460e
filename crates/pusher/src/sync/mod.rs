// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event synchronization with the remote collector.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Dispatcher  │────►│  Transport  │────►│  Collector  │
//! │ (poll task) │◄────│   (trait)   │◄────│   (remote)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ EventQueue  │  (sync_events table)
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - At-least-once delivery: an event is deleted only after a 201 response
//! - Periodic polling with bounded exponential backoff on failure
//! - Cooperative cancellation of every wait
//! - No-op transport when no remote is configured
//! - Injectable transport and queue traits for testing

mod backoff;
mod dispatcher;
mod queue;
mod transport;

pub use backoff::Backoff;
pub use dispatcher::{Dispatcher, DispatcherConfig, SyncError, SyncResult};
pub use queue::{EventQueue, QueueError, QueueResult, SharedDatabase, SqliteQueue};
pub use transport::{
    Endpoint, NoopTransport, Transport, TransportError, TransportFuture, TransportResult,
    WebSocketTransport,
};

#[cfg(test)]
mod test_helpers;
