// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Authenticates pushers during the handshake, then answers every text
//! frame with a status response.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response as HandshakeResponse,
};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use evsync_core::protocol::{ACCESS_KEY_HEADER, SECRET_HEADER};

use crate::state::CollectorState;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: CollectorState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    serve(listener, state).await?;
    Ok(())
}

/// Accept connections on `listener` until it fails.
pub(crate) async fn serve(listener: TcpListener, state: CollectorState) -> std::io::Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!(%peer_addr, error = %e, "connection error");
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: CollectorState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let auth_state = state.clone();
    let authorize = move |req: &Request, resp: HandshakeResponse| {
        let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());
        if auth_state.authorize(header(ACCESS_KEY_HEADER), header(SECRET_HEADER)) {
            Ok(resp)
        } else {
            let mut rejection = ErrorResponse::new(Some("invalid credentials".to_string()));
            *rejection.status_mut() = StatusCode::UNAUTHORIZED;
            Err(rejection)
        }
    };

    let ws_stream = match tokio_tungstenite::accept_hdr_async(stream, authorize).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            warn!(%peer_addr, error = %e, "handshake rejected");
            return Ok(());
        }
    };
    info!(%peer_addr, "pusher connected");

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        match ws_stream.next().await {
            Some(Ok(Message::Text(text))) => {
                let response = state.receive(text.as_str()).await;
                debug!(%peer_addr, status = response.status, "replying");
                ws_sink.send(Message::Text(response.to_json()?.into())).await?;
            }
            Some(Ok(Message::Binary(_))) => {
                let response = state.reject();
                ws_sink.send(Message::Text(response.to_json()?.into())).await?;
            }
            Some(Ok(Message::Ping(data))) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Some(Ok(Message::Close(_))) => {
                info!(%peer_addr, "pusher disconnected");
                break;
            }
            Some(Ok(_)) => {
                // Pong and raw frames need no reply
            }
            Some(Err(e)) => {
                warn!(%peer_addr, error = %e, "websocket error");
                break;
            }
            None => {
                info!(%peer_addr, "stream ended");
                break;
            }
        }
    }

    info!(
        %peer_addr,
        accepted = state.accepted(),
        rejected = state.rejected(),
        "connection closed"
    );
    Ok(())
}
