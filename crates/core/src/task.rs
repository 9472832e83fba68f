// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task descriptors, file entries, and qualified task names.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating a task descriptor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The qualified task name was empty or started with `::`.
    #[error("empty task name")]
    EmptyName,

    /// The descriptor lists no files, so there is nothing to execute.
    #[error("task {task:?} has no files")]
    NoFiles {
        /// The qualified task name.
        task: String,
    },

    /// A file entry's digest is not 64 hex characters.
    #[error("file {filename:?} has invalid sha256 digest {digest:?}")]
    InvalidDigest {
        /// The file the digest belongs to.
        filename: String,
        /// The rejected digest string.
        digest: String,
    },

    /// An unrecognized input method string.
    #[error("unknown input method {0:?}")]
    UnknownInputMethod(String),
}

/// Qualified task name: `module` or `module::task`.
///
/// A bare module name addresses the module's `init` task. Segments past the
/// second are ignored; module and task fully address a task on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskName {
    module: String,
    task: String,
}

impl TaskName {
    pub fn parse(qname: &str) -> Result<Self, TaskError> {
        let mut segments = qname.split("::");
        let module = segments.next().unwrap_or_default();
        if module.is_empty() {
            return Err(TaskError::EmptyName);
        }
        let task = match segments.next() {
            Some(t) if !t.is_empty() => t,
            _ => "init",
        };
        Ok(Self { module: module.to_string(), task: task.to_string() })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn task(&self) -> &str {
        &self.task
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.task)
    }
}

impl FromStr for TaskName {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How task parameters reach the task process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// Input JSON is fed to the task on stdin.
    Stdin,
    /// Input keys become `PT_*` environment variables.
    Environment,
    /// Both stdin and environment.
    Both,
    /// Input is delivered by the PowerShell shim; stdin carries the JSON.
    Powershell,
}

impl InputMethod {
    /// True when the raw input string is written to the task's stdin.
    pub fn wants_stdin(self) -> bool {
        matches!(self, Self::Stdin | Self::Both | Self::Powershell)
    }

    /// True when input keys are exported as `PT_*` environment variables.
    /// The PowerShell shim reads `PT_*` variables to build its parameter
    /// list, so `powershell` exports them as well.
    pub fn wants_environment(self) -> bool {
        matches!(self, Self::Environment | Self::Both | Self::Powershell)
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stdin => "stdin",
            Self::Environment => "environment",
            Self::Both => "both",
            Self::Powershell => "powershell",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for InputMethod {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdin" => Ok(Self::Stdin),
            "environment" => Ok(Self::Environment),
            "both" => Ok(Self::Both),
            "powershell" => Ok(Self::Powershell),
            other => Err(TaskError::UnknownInputMethod(other.to_string())),
        }
    }
}

/// Server-relative location of a task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUri {
    /// Server path, e.g. `/puppet/v3/file_content/tasks/acme/hello.sh`.
    pub path: String,
    /// Query parameters. A `BTreeMap` keeps composed URLs stable.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl FileUri {
    /// Compose the request URL from `path` and percent-encoded `params`.
    ///
    /// Parameters join with `?`, or `&` when the path already carries a
    /// query string.
    pub fn url(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let sep = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.path, sep, query)
    }
}

/// One executable artifact of a task. Identity is the sha256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: u64,
    pub uri: FileUri,
}

impl FileEntry {
    /// The filename's extension, lowercased, without the dot.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    fn validate(&self) -> Result<(), TaskError> {
        let digest_ok =
            self.sha256.len() == 64 && self.sha256.chars().all(|c| c.is_ascii_hexdigit());
        if !digest_ok {
            return Err(TaskError::InvalidDigest {
                filename: self.filename.clone(),
                digest: self.sha256.clone(),
            });
        }
        Ok(())
    }
}

/// A task run request as delivered over the message bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Qualified task name (`module` or `module::task`).
    pub task: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Opaque input string, typically a JSON document.
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub input_method: Option<InputMethod>,
}

impl TaskDescriptor {
    pub fn name(&self) -> Result<TaskName, TaskError> {
        TaskName::parse(&self.task)
    }

    /// Check the descriptor is runnable before any network or disk work.
    pub fn validate(&self) -> Result<(), TaskError> {
        self.name()?;
        if self.files.is_empty() {
            return Err(TaskError::NoFiles { task: self.task.clone() });
        }
        for file in &self.files {
            file.validate()?;
        }
        Ok(())
    }

    /// The file that is executed: the first entry in the descriptor.
    pub fn primary_file(&self) -> Option<&FileEntry> {
        self.files.first()
    }

    /// Resolve the effective input method.
    ///
    /// An explicit method wins; otherwise a `.ps1` primary file selects
    /// `powershell`, and everything else defaults to `both`.
    pub fn resolved_input_method(&self) -> InputMethod {
        if let Some(method) = self.input_method {
            return method;
        }
        match self.primary_file().and_then(FileEntry::extension) {
            Some(ext) if ext == "ps1" => InputMethod::Powershell,
            _ => InputMethod::Both,
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
