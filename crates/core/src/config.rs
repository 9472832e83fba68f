// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access and platform path defaults.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    /// No usable state directory could be resolved.
    #[error("cannot resolve a state directory (set ERRAND_STATE_DIR or HOME)")]
    NoStateDir,
}

/// Filesystem roots used by the task subsystem.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Content-addressed artifact cache root.
    pub cache_dir: PathBuf,
    /// Spool root holding one directory per run request.
    pub spool_dir: PathBuf,
    /// Directory holding the task wrapper binary and the PowerShell shim.
    pub bin_dir: PathBuf,
    /// Puppet environment used for server requests.
    pub environment: String,
}

impl Settings {
    /// Resolve settings from the environment.
    ///
    /// Each path can be overridden individually; otherwise both cache and
    /// spool live under the state directory.
    pub fn from_env() -> Result<Self, SettingsError> {
        let state = state_dir()?;
        Ok(Self {
            cache_dir: env_path("ERRAND_TASK_CACHE_DIR")
                .unwrap_or_else(|| state.join("tasks-cache")),
            spool_dir: env_path("ERRAND_TASK_SPOOL_DIR")
                .unwrap_or_else(|| state.join("tasks-spool")),
            bin_dir: env_path("ERRAND_BIN_DIR").unwrap_or_else(default_bin_dir),
            environment: std::env::var("ERRAND_ENVIRONMENT")
                .unwrap_or_else(|_| "production".to_string()),
        })
    }
}

/// Resolve state directory: ERRAND_STATE_DIR > XDG_STATE_HOME/errand > ~/.local/state/errand
fn state_dir() -> Result<PathBuf, SettingsError> {
    if let Ok(dir) = std::env::var("ERRAND_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("errand"));
    }
    let home = std::env::var("HOME").map_err(|_| SettingsError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/errand"))
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key).ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Platform root for the puppet toolchain binaries.
#[cfg(windows)]
pub fn default_bin_dir() -> PathBuf {
    PathBuf::from(r"C:\Program Files\Puppet Labs\Puppet\bin")
}

/// Platform root for the puppet toolchain binaries.
#[cfg(not(windows))]
pub fn default_bin_dir() -> PathBuf {
    PathBuf::from("/opt/puppetlabs/puppet/bin")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
