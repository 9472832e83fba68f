// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for server communication.

use thiserror::Error;

/// Errors raised while talking to the task server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, write, or read failure below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The whole request (connect + write + read) exceeded its deadline.
    #[error("HTTP request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned HTTP {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, trimmed for display.
        body: String,
    },

    /// The response body was not the JSON shape we expect.
    #[error("invalid server response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Build a [`ClientError::Status`] from a response body, trimming it to
    /// something fit for a log line.
    pub fn status(code: u16, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body);
        let body: String = body.trim().chars().take(200).collect();
        Self::Status { code, body }
    }
}
