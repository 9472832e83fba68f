// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command planning: executable, argv, environment, and stdin for a task.

use std::path::{Path, PathBuf};

use errand_core::TaskDescriptor;
use thiserror::Error;

/// Errors raised while planning a task command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The descriptor has no files, so there is nothing to execute.
    #[error("task {0:?} has no executable file")]
    NoExecutable(String),

    /// Environment delivery needs the input to be a JSON object of strings.
    #[error("task input for environment delivery must be a JSON object of strings")]
    InputNotStringMap,

    /// The input string is not JSON at all.
    #[error("task input is not valid JSON: {0}")]
    InputJson(String),
}

/// Host platform. Injectable so planning is testable across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Root of the puppet toolchain install.
    pub fn bin_root(self) -> PathBuf {
        match self {
            Self::Unix => PathBuf::from("/opt/puppetlabs/puppet/bin"),
            Self::Windows => PathBuf::from(r"C:\Program Files\Puppet Labs\Puppet\bin"),
        }
    }

    fn wrapper_filename(self) -> &'static str {
        match self {
            Self::Unix => "task_wrapper",
            Self::Windows => "task_wrapper.exe",
        }
    }
}

/// Locations of the wrapper binary and the PowerShell shim beside it.
#[derive(Debug, Clone)]
pub struct WrapperPaths {
    pub wrapper: PathBuf,
    pub shim: PathBuf,
}

impl WrapperPaths {
    pub fn new(bin_dir: &Path, platform: Platform) -> Self {
        Self {
            wrapper: join_for(bin_dir, platform.wrapper_filename(), platform),
            shim: join_for(bin_dir, "PowershellShim.ps1", platform),
        }
    }
}

/// Windows paths are joined textually so they stay intact when a plan is
/// built on a non-Windows host.
fn join_for(dir: &Path, name: &str, platform: Platform) -> PathBuf {
    match platform {
        Platform::Unix => dir.join(name),
        Platform::Windows => PathBuf::from(format!(r"{}\{}", dir.display(), name)),
    }
}

/// The fully planned command for one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    /// Full argument vector, executable first.
    pub argv: Vec<String>,
    /// `PT_*` environment variables handed to the wrapper.
    pub env: Vec<(String, String)>,
    /// Raw input delivered on the task's stdin.
    pub stdin: Option<String>,
}

impl CommandPlan {
    pub fn executable(&self) -> &str {
        &self.argv[0]
    }

    /// Everything after the executable.
    pub fn arguments(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// Plan the executable, argv, environment, and stdin payload for a task
/// whose primary file is cached at `command_path`.
pub fn plan(
    task: &TaskDescriptor,
    command_path: &Path,
    platform: Platform,
    paths: &WrapperPaths,
) -> Result<CommandPlan, PlanError> {
    if task.files.is_empty() {
        return Err(PlanError::NoExecutable(task.task.clone()));
    }

    let method = task.resolved_input_method();
    let mut argv = platform_argv(command_path, platform);
    if method == errand_core::InputMethod::Powershell {
        argv.insert(0, paths.shim.display().to_string());
    }

    let env = if method.wants_environment() {
        environment_from_input(task.input.as_deref())?
    } else {
        Vec::new()
    };
    let stdin = if method.wants_stdin() { task.input.clone() } else { None };

    Ok(CommandPlan { argv, env, stdin })
}

/// Interpreter dispatch. Windows cannot rely on shebangs, so known
/// extensions get an explicit interpreter prefix; Unix always executes the
/// file directly.
fn platform_argv(path: &Path, platform: Platform) -> Vec<String> {
    let path_str = path.display().to_string();
    if platform != Platform::Windows {
        return vec![path_str];
    }

    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("rb") => vec!["ruby".to_string(), path_str],
        Some("pp") => vec!["puppet".to_string(), "apply".to_string(), path_str],
        Some("ps1") => vec![
            "powershell".to_string(),
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-NoLogo".to_string(),
            "-ExecutionPolicy".to_string(),
            "Bypass".to_string(),
            "-File".to_string(),
            path_str,
        ],
        _ => vec![path_str],
    }
}

/// Turn the task input into `PT_*` variables.
///
/// The input must be a JSON object whose values are all strings; anything
/// else is rejected rather than coerced.
fn environment_from_input(input: Option<&str>) -> Result<Vec<(String, String)>, PlanError> {
    let Some(input) = input else {
        return Ok(Vec::new());
    };
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(input).map_err(|e| PlanError::InputJson(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(PlanError::InputNotStringMap);
    };

    let mut env = Vec::with_capacity(object.len());
    for (key, value) in object {
        let Some(value) = value.as_str() else {
            return Err(PlanError::InputNotStringMap);
        };
        env.push((format!("PT_{}", key), value.to_string()));
    }
    Ok(env)
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
