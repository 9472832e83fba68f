// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a caller-supplied request ID.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestIdError {
    #[error("empty request id")]
    Empty,

    /// The ID contains characters outside `[A-Za-z0-9._-]`.
    #[error("request id {0:?} contains characters outside [A-Za-z0-9._-]")]
    InvalidChar(String),

    /// The ID is `.` or `..`.
    #[error("request id {0:?} is a relative path component")]
    PathComponent(String),
}

/// Caller-supplied identifier for one run attempt.
///
/// The ID is used verbatim as a spool directory name, so only
/// `[A-Za-z0-9._-]` is accepted and the relative path components `.` and
/// `..` are rejected outright.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Result<Self, RequestIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RequestIdError::Empty);
        }
        if id == "." || id == ".." {
            return Err(RequestIdError::PathComponent(id));
        }
        let ok = id.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
        if !ok {
            return Err(RequestIdError::InvalidChar(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for RequestId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RequestId::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
