// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP GET capability and a plain TCP transport.
//!
//! Sends HTTP/1.1 requests and reads responses using Content-Length
//! framing (does not depend on connection close for EOF). TLS termination
//! is the host agent's concern; production deployments hand this crate a
//! transport that already speaks to the right server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::ClientError;

/// An HTTP response: status code plus raw body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.code == 200
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal HTTP GET capability consumed by the task subsystem.
///
/// `path` is server-relative and may carry a query string; `headers` are
/// extra request headers as `(name, value)` pairs.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response, ClientError>;
}

#[async_trait]
impl<T: HttpGet + ?Sized> HttpGet for Arc<T> {
    async fn get(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response, ClientError> {
        (**self).get(path, headers).await
    }
}

/// HTTP/1.1 over plain TCP.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: String,
    timeout: Duration,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), timeout: Duration::from_secs(30) }
    }

    /// Override the per-request deadline (connect + write + read).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl HttpGet for TcpTransport {
    async fn get(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response, ClientError> {
        let mut request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\n", path);
        for (name, value) in headers {
            request.push_str(&format!("{}: {}\r\n", name, value));
        }
        request.push_str("\r\n");

        tokio::time::timeout(self.timeout, send_request(&self.addr, &request))
            .await
            .map_err(|_| ClientError::Timeout)?
    }
}

async fn send_request(addr: &str, request: &str) -> Result<Response, ClientError> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|e| ClientError::Transport(format!("connect failed: {}", e)))?;
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| ClientError::Transport(format!("write failed: {}", e)))?;

    let mut reader = BufReader::new(&mut stream);
    read_http_response(&mut reader).await
}

/// Read and parse an HTTP/1.1 response from a buffered stream.
///
/// Status codes are passed through; callers decide what counts as an
/// error. Only the Content-Length framing is interpreted here.
async fn read_http_response<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
) -> Result<Response, ClientError> {
    // Read status line
    let mut status_line = String::new();
    reader
        .read_line(&mut status_line)
        .await
        .map_err(|e| ClientError::Transport(format!("read status failed: {}", e)))?;

    let code = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| ClientError::Transport(format!("bad status line {:?}", status_line)))?;

    // Read headers, extract Content-Length (case-insensitive)
    let mut content_length: usize = 0;
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .await
            .map_err(|e| ClientError::Transport(format!("read header failed: {}", e)))?;
        if line == "\r\n" || line.is_empty() {
            break;
        }
        let line_lower = line.to_ascii_lowercase();
        if let Some(val) = line_lower.strip_prefix("content-length:") {
            content_length = val.trim().parse().unwrap_or(0);
        }
    }

    // Read body
    let body = if content_length > 0 {
        let mut buf = vec![0u8; content_length];
        reader
            .read_exact(&mut buf)
            .await
            .map_err(|e| ClientError::Transport(format!("read body failed: {}", e)))?;
        buf
    } else {
        Vec::new()
    };

    Ok(Response { code, body })
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
