// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between the pusher and the collector.
//!
//! The pusher sends one event body per text frame. The collector answers
//! each frame with a [`Response`] carrying an HTTP-style status code; only
//! [`STATUS_CREATED`] acknowledges the event.

use serde::{Deserialize, Serialize};

/// Status signaling the collector durably accepted the event.
pub const STATUS_CREATED: u16 = 201;

/// Status for a payload the collector could not accept.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status for an event the collector could not store.
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Header carrying the pusher's access key during the handshake.
pub const ACCESS_KEY_HEADER: &str = "X-Access-Key";

/// Header carrying the pusher's secret during the handshake.
pub const SECRET_HEADER: &str = "X-Secret";

/// Collector reply to a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
}

impl Response {
    /// Creates an acknowledgment.
    pub fn created() -> Self {
        Response {
            status: STATUS_CREATED,
        }
    }

    /// Creates a rejection.
    pub fn bad_request() -> Self {
        Response {
            status: STATUS_BAD_REQUEST,
        }
    }

    /// Creates a storage failure reply.
    pub fn internal_error() -> Self {
        Response {
            status: STATUS_INTERNAL_ERROR,
        }
    }

    /// Returns true if the event was accepted.
    pub fn is_created(&self) -> bool {
        self.status == STATUS_CREATED
    }

    /// Serializes the response to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a response from raw message bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
