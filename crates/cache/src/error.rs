// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the artifact cache.

use thiserror::Error;

/// Errors raised while caching task files.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem failure while staging or installing an artifact.
    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Server or transport failure while fetching an artifact.
    #[error(transparent)]
    Client(#[from] errand_client::ClientError),
}
