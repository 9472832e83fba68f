// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! errand-client: Puppet Server task API access for the errand agent.
//!
//! The HTTPS details (certificates, server discovery) are the host agent's
//! concern; everything here runs against the [`HttpGet`] capability.

pub mod error;
pub mod http;
pub mod resolver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::ClientError;
pub use http::{HttpGet, Response, TcpTransport};
pub use resolver::{TaskInfo, TaskListEntry, TaskResolver};
