// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request spool directories.
//!
//! The spool is the state machine: the launcher writes `wrapper_stdin` and
//! `wrapper_pid`, the wrapper process owns everything else, and observers
//! only read. Directories are never garbage-collected here.

use std::path::{Path, PathBuf};

use errand_core::RequestId;

/// Well-known files inside one request's spool directory.
pub mod files {
    /// JSON payload handed to the wrapper on stdin.
    pub const WRAPPER_STDIN: &str = "wrapper_stdin";
    /// Wrapper process stdout; its presence means the wrapper spawned.
    pub const WRAPPER_STDOUT: &str = "wrapper_stdout";
    /// Wrapper process stderr; non-empty means a wrapper-level failure.
    pub const WRAPPER_STDERR: &str = "wrapper_stderr";
    /// PID of the spawned wrapper; its mtime is the start time.
    pub const WRAPPER_PID: &str = "wrapper_pid";
    /// The task's own stdout.
    pub const STDOUT: &str = "stdout";
    /// The task's own stderr.
    pub const STDERR: &str = "stderr";
    /// ASCII decimal exit status; non-empty means the task completed.
    pub const EXITCODE: &str = "exitcode";
}

/// Spool root holding one directory per run request.
#[derive(Debug, Clone)]
pub struct Spool {
    root: PathBuf,
}

impl Spool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one request. The request ID is already validated to be
    /// a single safe path component.
    pub fn path(&self, id: &RequestId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Path of one well-known file inside a request's directory.
    pub fn file(&self, id: &RequestId, name: &str) -> PathBuf {
        self.path(id).join(name)
    }

    /// True when the request has a spool directory, i.e. it ran before.
    pub fn exists(&self, id: &RequestId) -> bool {
        self.path(id).is_dir()
    }

    /// Create the request directory (and the spool root if needed) with
    /// mode 0o750. No state files are pre-created.
    pub fn create(&self, id: &RequestId) -> std::io::Result<PathBuf> {
        let path = self.path(id);
        std::fs::create_dir_all(&path)?;
        set_mode(&self.root, 0o750)?;
        set_mode(&path, 0o750)?;
        tracing::debug!(request = %id, spool = %path.display(), "spool directory created");
        Ok(path)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "spool_tests.rs"]
mod tests;
