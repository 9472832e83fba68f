// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for task runs.

use std::path::PathBuf;

use errand_core::RequestId;
use thiserror::Error;

use crate::planner::PlanError;

/// Errors raised while launching or observing a task.
#[derive(Debug, Error)]
pub enum RunError {
    /// The platform wrapper binary is not installed.
    #[error("task wrapper not found at {}", .0.display())]
    WrapperMissing(PathBuf),

    /// One or more task files are missing from the local cache.
    #[error("task {task} is not cached, download it first")]
    NotCached {
        /// Qualified task name.
        task: String,
    },

    /// The request was launched before; reruns are refused.
    #[error("request {0} has already been executed")]
    AlreadyRequested(RequestId),

    /// Status was asked for a request that never ran here.
    #[error("task {0} has not been requested")]
    NotRequested(RequestId),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("failed to spawn task wrapper: {0}")]
    Spawn(String),

    #[error("spool i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wrapper payload serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Task(#[from] errand_core::TaskError),

    #[error(transparent)]
    Cache(#[from] errand_cache::CacheError),

    #[error(transparent)]
    Client(#[from] errand_client::ClientError),
}
