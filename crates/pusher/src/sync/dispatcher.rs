// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background dispatcher that forwards queued events to the collector.
//!
//! The dispatcher owns a [`Transport`] and an [`EventQueue`]. Once started,
//! a single task polls the queue every period and syncs each event in id
//! order: send, wait for the response, require [`STATUS_CREATED`], delete.
//! The first failure aborts the pass; the task then sleeps with exponential
//! backoff before polling again. Only cancellation ends the task.
//!
//! [`STATUS_CREATED`]: evsync_core::STATUS_CREATED

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use evsync_core::{CaptureHook, Response, SyncEvent};

use super::backoff::Backoff;
use super::queue::{EventQueue, QueueError, QueueResult, SharedDatabase, SqliteQueue};
use super::transport::{Endpoint, NoopTransport, Transport, TransportError, WebSocketTransport};

/// Timing configuration for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Wait between poll passes.
    pub period: Duration,
    /// First delay after a failed pass.
    pub backoff_min: Duration,
    /// Upper bound for the delay after repeated failures.
    pub backoff_max: Duration,
    /// How long to wait for the collector to answer one event.
    pub response_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            period: Duration::from_secs(5),
            backoff_min: Duration::from_secs(1),
            backoff_max: Duration::from_secs(300),
            response_timeout: Duration::from_secs(30),
        }
    }
}

/// Error type for sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The collector answered with a status other than 201.
    #[error("event {event_id} rejected with status {status}")]
    Rejected { event_id: i64, status: u16 },

    /// The response could not be parsed.
    #[error("invalid response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Queue error.
    #[error("storage error: {0}")]
    Storage(#[from] QueueError),

    /// No response arrived in time.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The poll task panicked.
    #[error("poll task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

enum State<T> {
    /// Constructed, transport not yet started.
    Idle(T),
    /// Poll task running; it hands the transport back when it ends.
    Running {
        cancel: CancellationToken,
        task: JoinHandle<T>,
    },
    Stopped,
}

/// Forwards captured events to the collector.
pub struct Dispatcher<T: Transport + 'static = Box<dyn Transport>> {
    config: DispatcherConfig,
    queue: Arc<dyn EventQueue>,
    capture: Option<CaptureHook>,
    state: State<T>,
}

impl<T: Transport + 'static> Dispatcher<T> {
    /// Create a dispatcher.
    ///
    /// When `capture` is given it is registered right away, so monitored
    /// writes start queueing events even before [`Dispatcher::start`].
    pub fn new(
        config: DispatcherConfig,
        transport: T,
        queue: Arc<dyn EventQueue>,
        capture: Option<CaptureHook>,
    ) -> Self {
        if let Some(hook) = &capture {
            hook.register();
        }
        Dispatcher {
            config,
            queue,
            capture,
            state: State::Idle(transport),
        }
    }

    /// Start the transport and spawn the poll task.
    ///
    /// A transport that fails to start is kept, and the error returned; no
    /// task is spawned. Calling this while running or after `stop` does
    /// nothing.
    pub async fn start(&mut self) -> SyncResult<()> {
        let mut transport = match std::mem::replace(&mut self.state, State::Stopped) {
            State::Idle(transport) => transport,
            other => {
                self.state = other;
                return Ok(());
            }
        };

        if let Err(e) = transport.start().await {
            error!(error = %e, "failed to start transport");
            self.state = State::Idle(transport);
            return Err(e.into());
        }

        let cancel = CancellationToken::new();
        let poller = Poller::new(transport, Arc::clone(&self.queue), &self.config);
        let task = tokio::spawn(poller.run(cancel.clone()));
        info!(period = ?self.config.period, "dispatcher started");

        self.state = State::Running { cancel, task };
        Ok(())
    }

    /// Cancel the poll task, wait for it, and close the transport.
    ///
    /// Also unregisters the capture hook. Only the first call does anything.
    pub async fn stop(&mut self) -> SyncResult<()> {
        let transport = match std::mem::replace(&mut self.state, State::Stopped) {
            State::Idle(transport) => Some(transport),
            State::Running { cancel, task } => {
                cancel.cancel();
                match task.await {
                    Ok(transport) => Some(transport),
                    Err(e) => {
                        self.unregister();
                        return Err(e.into());
                    }
                }
            }
            State::Stopped => return Ok(()),
        };

        self.unregister();
        if let Some(mut transport) = transport {
            transport.close().await?;
        }
        info!("dispatcher stopped");
        Ok(())
    }

    /// Returns true while the poll task is alive.
    pub fn is_running(&self) -> bool {
        matches!(&self.state, State::Running { task, .. } if !task.is_finished())
    }

    /// Number of events still waiting for acknowledgment.
    pub fn pending_count(&self) -> QueueResult<usize> {
        self.queue.pending_count()
    }

    fn unregister(&self) {
        if let Some(hook) = &self.capture {
            hook.unregister();
        }
    }
}

impl Dispatcher {
    /// Build a dispatcher over the shared database.
    ///
    /// With an endpoint, events go over a WebSocket and the database's
    /// capture hook is registered. Without one, the dispatcher runs a
    /// [`NoopTransport`] and monitored writes queue nothing.
    pub fn for_endpoint(
        config: DispatcherConfig,
        endpoint: Option<Endpoint>,
        db: SharedDatabase,
    ) -> SyncResult<Self> {
        let queue: Arc<dyn EventQueue> = Arc::new(SqliteQueue::new(Arc::clone(&db)));
        let dispatcher = match endpoint {
            Some(endpoint) => {
                let hook = db.lock().map_err(|_| QueueError::Poisoned)?.capture_hook();
                info!(url = %endpoint.url, "synchronization enabled");
                let transport: Box<dyn Transport> = Box::new(WebSocketTransport::new(endpoint));
                Dispatcher::new(config, transport, queue, Some(hook))
            }
            None => {
                info!("no remote configured, synchronization disabled");
                let transport: Box<dyn Transport> = Box::new(NoopTransport);
                Dispatcher::new(config, transport, queue, None)
            }
        };
        Ok(dispatcher)
    }
}

/// State owned by the poll task.
pub(crate) struct Poller<T> {
    transport: T,
    queue: Arc<dyn EventQueue>,
    period: Duration,
    response_timeout: Duration,
    backoff: Backoff,
}

impl<T: Transport> Poller<T> {
    pub(crate) fn new(transport: T, queue: Arc<dyn EventQueue>, config: &DispatcherConfig) -> Self {
        Poller {
            transport,
            queue,
            period: config.period,
            response_timeout: config.response_timeout,
            backoff: Backoff::new(config.backoff_min, config.backoff_max),
        }
    }

    /// Poll until cancelled, backing off after each failed pass.
    ///
    /// Returns the transport so the owner can close it.
    pub(crate) async fn run(mut self, cancel: CancellationToken) -> T {
        loop {
            let Err(e) = self.poll_events(&cancel).await else {
                break;
            };

            let delay = self.backoff.next_delay();
            error!(
                error = %e,
                sleep_duration = ?delay,
                attempt = self.backoff.attempt(),
                "sync failed, backing off"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        debug!("poll task exiting");
        self.transport
    }

    /// Sync every period until cancelled (`Ok`) or a pass fails (`Err`).
    async fn poll_events(&mut self, cancel: &CancellationToken) -> SyncResult<()> {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(self.period) => {}
            }

            // Dropping the pass mid-event leaves that event queued.
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                result = self.sync_pending() => result?,
            }

            self.backoff.reset();
        }
    }

    /// Sync all queued events in id order, stopping at the first failure.
    async fn sync_pending(&mut self) -> SyncResult<()> {
        let events = self.queue.pending()?;
        if !events.is_empty() {
            debug!(count = events.len(), "syncing queued events");
        }

        for event in &events {
            if let Err(e) = self.sync_event(event).await {
                warn!(event_id = event.id, error = %e, "event not synced");
                return Err(e);
            }
        }
        Ok(())
    }

    async fn sync_event(&mut self, event: &SyncEvent) -> SyncResult<()> {
        self.transport.send(event.body.clone()).await?;

        let received = tokio::time::timeout(self.response_timeout, self.transport.receive()).await;
        let message = match received {
            Ok(message) => message?,
            Err(_) => {
                // The reply may still arrive; it must not answer the next send.
                if let Err(e) = self.transport.reset().await {
                    debug!(error = %e, "failed to reset transport");
                }
                return Err(SyncError::Timeout(self.response_timeout));
            }
        };

        let response = Response::from_slice(&message)?;
        if !response.is_created() {
            return Err(SyncError::Rejected {
                event_id: event.id,
                status: response.status,
            });
        }

        self.queue.delete(event.id)?;
        debug!(event_id = event.id, "event acknowledged");
        Ok(())
    }
}
