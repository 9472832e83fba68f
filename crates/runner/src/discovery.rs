// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery capability advertisement.

use serde::Serialize;

/// Filtering capabilities this agent advertises to the discovery layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscoveryCapabilities {
    pub capabilities: [&'static str; 5],
    pub timeout_secs: u64,
}

/// The declarative discovery record for this agent.
pub const DISCOVERY: DiscoveryCapabilities = DiscoveryCapabilities {
    capabilities: ["classes", "facts", "identity", "agents", "compound"],
    timeout_secs: 2,
};
