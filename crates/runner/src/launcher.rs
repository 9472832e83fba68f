// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detached wrapper launch and the spawn handshake.

use std::fs::File;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use errand_cache::ArtifactCache;
use errand_client::HttpGet;
use errand_core::{Clock, RequestId, SystemClock, TaskDescriptor};
use serde::Serialize;

use crate::error::RunError;
use crate::planner::{self, CommandPlan, PlanError, Platform, WrapperPaths};
use crate::spool::{files, Spool};

/// Sleep between handshake and completion polls.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// JSON document the wrapper reads from its stdin.
#[derive(Debug, Serialize)]
struct WrapperPayload<'a> {
    executable: &'a str,
    arguments: &'a [String],
    input: Option<&'a str>,
    stdout: String,
    stderr: String,
    exitcode: String,
}

/// Launches tasks through the platform wrapper and answers lifecycle
/// queries from the spool.
pub struct TaskRunner<H, C = SystemClock> {
    cache: ArtifactCache<H>,
    spool: Spool,
    paths: WrapperPaths,
    platform: Platform,
    pub(crate) clock: C,
}

impl<H: HttpGet> TaskRunner<H, SystemClock> {
    pub fn new(cache: ArtifactCache<H>, spool: Spool, paths: WrapperPaths) -> Self {
        Self::with_clock(cache, spool, paths, Platform::current(), SystemClock)
    }
}

impl<H: HttpGet, C: Clock> TaskRunner<H, C> {
    pub fn with_clock(
        cache: ArtifactCache<H>,
        spool: Spool,
        paths: WrapperPaths,
        platform: Platform,
        clock: C,
    ) -> Self {
        Self { cache, spool, paths, platform, clock }
    }

    pub fn cache(&self) -> &ArtifactCache<H> {
        &self.cache
    }

    pub fn spool(&self) -> &Spool {
        &self.spool
    }

    /// Launch a task through the detached wrapper.
    ///
    /// When `wait` is true, blocks (polling) until the run completes; the
    /// caller's own deadline governs how long it is willing to wait.
    pub async fn run(
        &self,
        id: &RequestId,
        task: &TaskDescriptor,
        wait: bool,
    ) -> Result<crate::status::TaskStatus, RunError> {
        task.validate()?;
        if !self.paths.wrapper.is_file() {
            return Err(RunError::WrapperMissing(self.paths.wrapper.clone()));
        }
        if !self.cache.all_cached(&task.files) {
            return Err(RunError::NotCached { task: task.task.clone() });
        }
        if self.spool.exists(id) {
            return Err(RunError::AlreadyRequested(id.clone()));
        }

        let primary =
            task.primary_file().ok_or_else(|| PlanError::NoExecutable(task.task.clone()))?;
        let command_path = self.cache.file_path(primary);
        let plan = planner::plan(task, &command_path, self.platform, &self.paths)?;

        let dir = self.spool.create(id)?;

        let payload = WrapperPayload {
            executable: plan.executable(),
            arguments: plan.arguments(),
            input: plan.stdin.as_deref(),
            stdout: dir.join(files::STDOUT).display().to_string(),
            stderr: dir.join(files::STDERR).display().to_string(),
            exitcode: dir.join(files::EXITCODE).display().to_string(),
        };
        let stdin_path = dir.join(files::WRAPPER_STDIN);
        std::fs::write(&stdin_path, serde_json::to_vec(&payload)?)?;

        let pid = self.spawn_wrapper(&dir, &stdin_path, &plan)?;

        // Spawn handshake: the wrapper's stdout log must exist before the
        // run is recorded as started.
        let marker = dir.join(files::WRAPPER_STDOUT);
        while !marker.exists() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        std::fs::write(dir.join(files::WRAPPER_PID), pid.to_string())?;
        tracing::info!(request = %id, pid, task = %task.task, "task wrapper spawned");

        if wait {
            while !self.is_complete(id) {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }

        self.status(id)
    }

    /// Spawn the wrapper detached, with its stdio wired into the spool.
    ///
    /// The child goes into its own process group and the handle is dropped
    /// without waiting: the task must survive this process dying.
    fn spawn_wrapper(
        &self,
        dir: &Path,
        stdin_path: &Path,
        plan: &CommandPlan,
    ) -> Result<u32, RunError> {
        let stdout = File::create(dir.join(files::WRAPPER_STDOUT))?;
        let stderr = File::create(dir.join(files::WRAPPER_STDERR))?;
        let stdin = File::open(stdin_path)?;

        let mut command = std::process::Command::new(&self.paths.wrapper);
        command
            .current_dir(workdir(self.platform))
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .envs(plan.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        detach(&mut command);

        let child = command.spawn().map_err(|e| RunError::Spawn(e.to_string()))?;
        let pid = child.id();
        drop(child);
        Ok(pid)
    }
}

/// Working directory for the wrapper: the filesystem root.
fn workdir(platform: Platform) -> &'static str {
    match platform {
        Platform::Unix => "/",
        Platform::Windows => r"C:\",
    }
}

#[cfg(unix)]
fn detach(command: &mut std::process::Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn detach(command: &mut std::process::Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut std::process::Command) {}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
