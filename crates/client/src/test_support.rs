// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory HTTP fake for tests across the workspace.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ClientError;
use crate::http::{HttpGet, Response};

/// Canned-response HTTP capability.
///
/// Responses are queued per path (ignoring the query string's order is the
/// caller's problem: paths must match byte for byte). When more than one
/// response is queued the fake pops them in order; the last queued response
/// is sticky, so repeated fetches keep seeing it.
#[derive(Default)]
pub struct FakeHttp {
    routes: Mutex<HashMap<String, VecDeque<Response>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Mutex<Option<Duration>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `path`.
    pub fn respond(&self, path: impl Into<String>, code: u16, body: impl Into<Vec<u8>>) {
        self.routes
            .lock()
            .entry(path.into())
            .or_default()
            .push_back(Response { code, body: body.into() });
    }

    /// Delay every request, to widen race windows in concurrency tests.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// How many requests hit `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait]
impl HttpGet for FakeHttp {
    async fn get(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response, ClientError> {
        self.requests.lock().push(RecordedRequest {
            path: path.to_string(),
            headers: headers.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect(),
        });

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut routes = self.routes.lock();
        match routes.get_mut(path) {
            Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap_or(Response {
                code: 404,
                body: b"no response queued".to_vec(),
            })),
            Some(queue) => queue
                .front()
                .cloned()
                .ok_or_else(|| ClientError::Transport("no response queued".to_string())),
            None => Ok(Response { code: 404, body: b"not found".to_vec() }),
        }
    }
}
