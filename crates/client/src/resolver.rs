// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task metadata resolution against the Puppet Server v3 API.

use errand_core::{FileEntry, TaskName};
use serde::Deserialize;

use crate::error::ClientError;
use crate::http::HttpGet;

/// A task descriptor as served by `GET /puppet/v3/tasks/{module}/{task}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInfo {
    #[serde(default)]
    pub name: Option<String>,
    /// The task's own metadata document (parameters, descriptions).
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// One entry of `GET /puppet/v3/tasks`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskListEntry {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Fetches task metadata and listings for one Puppet environment.
pub struct TaskResolver<H> {
    http: H,
    environment: String,
}

impl<H: HttpGet> TaskResolver<H> {
    pub fn new(http: H, environment: impl Into<String>) -> Self {
        Self { http, environment: environment.into() }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Fetch the server descriptor for one task.
    pub async fn metadata(&self, name: &TaskName) -> Result<TaskInfo, ClientError> {
        let path = format!(
            "/puppet/v3/tasks/{}/{}?environment={}",
            name.module(),
            name.task(),
            urlencoding::encode(&self.environment),
        );
        tracing::debug!(task = %name, path = %path, "fetching task metadata");
        let response = self.http.get(&path, &[]).await?;
        if !response.is_success() {
            return Err(ClientError::status(response.code, &response.body));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// List the tasks known to the environment, sorted by name.
    pub async fn list(&self) -> Result<Vec<TaskListEntry>, ClientError> {
        let path =
            format!("/puppet/v3/tasks?environment={}", urlencoding::encode(&self.environment));
        let response = self.http.get(&path, &[]).await?;
        if !response.is_success() {
            return Err(ClientError::status(response.code, &response.body));
        }
        let mut tasks: Vec<TaskListEntry> = serde_json::from_slice(&response.body)?;
        tasks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tasks)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
