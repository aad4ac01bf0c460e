// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the collector connection.
//!
//! Provides a trait-based transport layer that enables:
//! - A live WebSocket connection for production
//! - A no-op transport when synchronization is disabled
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;

use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;

use evsync_core::protocol::{ACCESS_KEY_HEADER, SECRET_HEADER};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection or handshake failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed, or never started.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Persistent connection to the collector.
///
/// Responses are correlated by order: the dispatcher keeps at most one
/// payload in flight and reads its response before sending the next.
pub trait Transport: Send + Sync {
    /// Connect and authenticate.
    fn start(&mut self) -> TransportFuture<'_, ()>;

    /// Send one payload.
    fn send(&mut self, payload: String) -> TransportFuture<'_, ()>;

    /// Wait for the next response.
    fn receive(&mut self) -> TransportFuture<'_, Vec<u8>>;

    /// Drop the current connection but stay started; the next `send`
    /// reconnects.
    ///
    /// Called after a response timed out, so a late reply is never read as
    /// the answer to a later payload.
    fn reset(&mut self) -> TransportFuture<'_, ()>;

    /// Release the connection. Calling it again is a no-op.
    fn close(&mut self) -> TransportFuture<'_, ()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn start(&mut self) -> TransportFuture<'_, ()> {
        (**self).start()
    }

    fn send(&mut self, payload: String) -> TransportFuture<'_, ()> {
        (**self).send(payload)
    }

    fn receive(&mut self) -> TransportFuture<'_, Vec<u8>> {
        (**self).receive()
    }

    fn reset(&mut self) -> TransportFuture<'_, ()> {
        (**self).reset()
    }

    fn close(&mut self) -> TransportFuture<'_, ()> {
        (**self).close()
    }
}

/// Collector location and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `ws://` or `wss://` URL.
    pub url: String,
    pub access_key: String,
    pub secret: String,
}

/// WebSocket transport implementation using tokio-tungstenite.
///
/// After a broken connection, the next `send` dials again, so a dispatcher
/// retrying after backoff picks up a collector that came back.
pub struct WebSocketTransport {
    endpoint: Endpoint,
    /// The WebSocket connection, if connected.
    ws: Option<WebSocketConnection>,
    /// Set between `start` and `close`.
    started: bool,
}

/// Internal WebSocket connection wrapper.
struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        tokio_tungstenite::tungstenite::Message,
    >,
    stream: futures_util::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    >,
}

impl WebSocketTransport {
    /// Create a new WebSocket transport for `endpoint`. Does not connect.
    pub fn new(endpoint: Endpoint) -> Self {
        WebSocketTransport {
            endpoint,
            ws: None,
            started: false,
        }
    }

    /// Check if a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    async fn dial(&mut self) -> TransportResult<()> {
        use futures_util::StreamExt;

        let mut request = self
            .endpoint
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let headers = request.headers_mut();
        for (name, value) in [
            (ACCESS_KEY_HEADER, &self.endpoint.access_key),
            (SECRET_HEADER, &self.endpoint.secret),
        ] {
            if value.is_empty() {
                continue;
            }
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            headers.insert(name, value);
        }

        let (ws_stream, _) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let (sink, stream) = ws_stream.split();
        self.ws = Some(WebSocketConnection { sink, stream });
        tracing::info!(url = %self.endpoint.url, "connected to collector");
        Ok(())
    }
}

impl Transport for WebSocketTransport {
    fn start(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.dial().await?;
            self.started = true;
            Ok(())
        })
    }

    fn send(&mut self, payload: String) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            use futures_util::SinkExt;
            use tokio_tungstenite::tungstenite::Message;

            if !self.started {
                return Err(TransportError::ConnectionClosed);
            }
            if self.ws.is_none() {
                tracing::info!(url = %self.endpoint.url, "reconnecting to collector");
                self.dial().await?;
            }
            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            if let Err(e) = ws.sink.send(Message::Text(payload.into())).await {
                // Connection is broken, clear it
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            // Flush so a dead connection is detected here rather than on receive
            if let Err(e) = ws.sink.flush().await {
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }

    fn receive(&mut self) -> TransportFuture<'_, Vec<u8>> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Ok(text.as_str().as_bytes().to_vec());
                    }
                    Some(Ok(Message::Binary(data))) => return Ok(data.to_vec()),
                    Some(Ok(Message::Close(_))) | None => {
                        self.ws = None;
                        return Err(TransportError::ConnectionClosed);
                    }
                    Some(Ok(_)) => {
                        // Ping/pong and raw frames carry no response
                        continue;
                    }
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn reset(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if self.ws.take().is_some() {
                tracing::debug!(url = %self.endpoint.url, "dropped collector connection");
            }
            Ok(())
        })
    }

    fn close(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.started = false;
            if let Some(mut ws) = self.ws.take() {
                use futures_util::SinkExt;
                if let Err(e) = ws.sink.close().await {
                    tracing::debug!(error = %e, "error closing collector connection");
                }
            }
            Ok(())
        })
    }
}

/// Transport used when synchronization is disabled.
///
/// Sends are discarded and every receive yields an empty message, which
/// never parses as an acknowledgment, so nothing is ever deleted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransport;

impl Transport for NoopTransport {
    fn start(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }

    fn send(&mut self, _payload: String) -> TransportFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }

    fn receive(&mut self) -> TransportFuture<'_, Vec<u8>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn reset(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }

    fn close(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}
