// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only lifecycle queries over the spool.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use errand_client::HttpGet;
use errand_core::{Clock, RequestId};
use serde::Serialize;

use crate::error::RunError;
use crate::launcher::TaskRunner;
use crate::spool::files;

/// Exit code reported while the real one is unknown.
const UNKNOWN_EXITCODE: i32 = 127;

/// Point-in-time view of one request, assembled entirely from spool files
/// so it survives agent restarts.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    /// The request's spool directory.
    pub spool: PathBuf,
    /// Task stdout so far, empty if none was produced yet.
    pub stdout: String,
    /// Task stderr so far.
    pub stderr: String,
    /// Exit status; 127 until the wrapper records the real one.
    pub exitcode: i32,
    /// Milliseconds the task has been (or was) running.
    pub runtime_ms: u64,
    /// When the wrapper was recorded as started; epoch if it never was.
    pub start_time: DateTime<Utc>,
    /// True once the wrapper process came up cleanly.
    pub wrapper_spawned: bool,
    /// Wrapper-level failure output, empty when the wrapper is healthy.
    pub wrapper_error: String,
    /// PID the wrapper was started with.
    pub wrapper_pid: Option<u32>,
    /// True once the run reached a terminal state.
    pub completed: bool,
}

impl<H: HttpGet, C: Clock> TaskRunner<H, C> {
    /// A run is complete once the wrapper reported a task exit status, or
    /// failed at the wrapper level. Either marker is terminal; the
    /// transition never reverses because the files are never truncated.
    pub fn is_complete(&self, id: &RequestId) -> bool {
        non_empty(&self.spool().file(id, files::WRAPPER_STDERR))
            || non_empty(&self.spool().file(id, files::EXITCODE))
    }

    /// How long the task has been running, or ran.
    ///
    /// Completed runs measure `exitcode` mtime against `wrapper_pid` mtime;
    /// wrapper-level failures count as zero; in-flight runs measure against
    /// the current wall clock and therefore grow on repeated calls.
    pub fn runtime(&self, id: &RequestId) -> Duration {
        let started = mtime(&self.spool().file(id, files::WRAPPER_PID));
        if self.is_complete(id) {
            match mtime(&self.spool().file(id, files::EXITCODE)) {
                Some(finished) => {
                    let started = started.unwrap_or(finished);
                    finished.duration_since(started).unwrap_or_default()
                }
                None => Duration::ZERO,
            }
        } else {
            match started {
                Some(started) => self.clock.wall().duration_since(started).unwrap_or_default(),
                None => Duration::ZERO,
            }
        }
    }

    /// Assemble the full status record for a request.
    ///
    /// Errors when the request has no spool directory, i.e. it was never
    /// launched from this node.
    pub fn status(&self, id: &RequestId) -> Result<TaskStatus, RunError> {
        if !self.spool().exists(id) {
            return Err(RunError::NotRequested(id.clone()));
        }

        let spool = self.spool().path(id);
        let wrapper_stderr_path = spool.join(files::WRAPPER_STDERR);
        let wrapper_error = read_or_default(&wrapper_stderr_path);
        let wrapper_spawned =
            std::fs::metadata(&wrapper_stderr_path).map(|m| m.len() == 0).unwrap_or(false);

        let exitcode = read_or_default(&spool.join(files::EXITCODE))
            .trim()
            .parse()
            .unwrap_or(UNKNOWN_EXITCODE);

        let start_time = mtime(&spool.join(files::WRAPPER_PID))
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|| DateTime::<Utc>::from(SystemTime::UNIX_EPOCH));

        let wrapper_pid = read_or_default(&spool.join(files::WRAPPER_PID)).trim().parse().ok();

        // A wrapper-level failure forces completion even though no task
        // exit status will ever arrive.
        let completed = self.is_complete(id) || !wrapper_error.is_empty();

        Ok(TaskStatus {
            stdout: read_or_default(&spool.join(files::STDOUT)),
            stderr: read_or_default(&spool.join(files::STDERR)),
            exitcode,
            runtime_ms: self.runtime(id).as_millis() as u64,
            start_time,
            wrapper_spawned,
            wrapper_error,
            wrapper_pid,
            completed,
            spool,
        })
    }
}

fn read_or_default(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

fn mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

fn non_empty(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
