// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The operations the surrounding agent dispatches to this subsystem.

use std::sync::Arc;

use errand_cache::ArtifactCache;
use errand_client::{HttpGet, TaskInfo, TaskListEntry, TaskResolver};
use errand_core::{Clock, RequestId, Settings, SystemClock, TaskDescriptor, TaskName};

use crate::error::RunError;
use crate::launcher::TaskRunner;
use crate::planner::{Platform, WrapperPaths};
use crate::spool::Spool;
use crate::status::TaskStatus;

/// Facade over resolver, cache, and runner.
///
/// One instance serves many concurrent requests; the only shared mutable
/// state is the filesystem.
pub struct TaskAgent<H, C = SystemClock> {
    resolver: TaskResolver<Arc<H>>,
    runner: TaskRunner<Arc<H>, C>,
}

impl<H: HttpGet> TaskAgent<H, SystemClock> {
    pub fn new(settings: &Settings, http: H) -> Self {
        Self::with_clock(settings, http, Platform::current(), SystemClock)
    }
}

impl<H: HttpGet, C: Clock> TaskAgent<H, C> {
    pub fn with_clock(settings: &Settings, http: H, platform: Platform, clock: C) -> Self {
        let http = Arc::new(http);
        let cache = ArtifactCache::new(&settings.cache_dir, http.clone());
        let spool = Spool::new(&settings.spool_dir);
        let paths = WrapperPaths::new(&settings.bin_dir, platform);
        Self {
            resolver: TaskResolver::new(http, settings.environment.clone()),
            runner: TaskRunner::with_clock(cache, spool, paths, platform, clock),
        }
    }

    pub fn runner(&self) -> &TaskRunner<Arc<H>, C> {
        &self.runner
    }

    /// Make sure every file of the task is in the local cache.
    pub async fn download_task(&self, task: &TaskDescriptor) -> Result<(), RunError> {
        task.validate()?;
        self.runner.cache().ensure_cached(&task.files).await?;
        Ok(())
    }

    /// Launch a task; with `wait` the call returns only once it completed.
    pub async fn run_task(
        &self,
        id: &RequestId,
        task: &TaskDescriptor,
        wait: bool,
    ) -> Result<TaskStatus, RunError> {
        self.runner.run(id, task, wait).await
    }

    /// Current status of a previously launched request.
    pub fn task_status(&self, id: &RequestId) -> Result<TaskStatus, RunError> {
        self.runner.status(id)
    }

    /// Fetch the server's descriptor for a qualified task name.
    pub async fn task_metadata(&self, qname: &str) -> Result<TaskInfo, RunError> {
        let name = TaskName::parse(qname)?;
        Ok(self.resolver.metadata(&name).await?)
    }

    /// List tasks available in the configured environment.
    pub async fn task_list(&self) -> Result<Vec<TaskListEntry>, RunError> {
        Ok(self.resolver.list().await?)
    }
}
