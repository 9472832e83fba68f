// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use errand_cache::ArtifactCache;
use errand_client::test_support::FakeHttp;
use errand_core::FakeClock;
use tempfile::TempDir;

use crate::planner::{Platform, WrapperPaths};
use crate::spool::Spool;

fn runner(dir: &TempDir) -> (TaskRunner<FakeHttp, FakeClock>, FakeClock) {
    let clock = FakeClock::new();
    let cache = ArtifactCache::new(dir.path().join("cache"), FakeHttp::new());
    let spool = Spool::new(dir.path().join("spool"));
    let paths = WrapperPaths::new(Path::new("/nonexistent"), Platform::Unix);
    let runner = TaskRunner::with_clock(cache, spool, paths, Platform::Unix, clock.clone());
    (runner, clock)
}

fn id(s: &str) -> RequestId {
    RequestId::new(s).unwrap()
}

#[test]
fn status_of_unknown_request_errors() {
    let dir = TempDir::new().unwrap();
    let (runner, _clock) = runner(&dir);
    let err = runner.status(&id("ghost")).unwrap_err();
    assert!(matches!(err, RunError::NotRequested(_)), "{:?}", err);
}

#[test]
fn fresh_spool_reports_defaults() {
    let dir = TempDir::new().unwrap();
    let (runner, _clock) = runner(&dir);
    let request = id("req-1");
    runner.spool().create(&request).unwrap();

    let status = runner.status(&request).unwrap();
    assert_eq!(status.exitcode, 127);
    assert_eq!(status.stdout, "");
    assert_eq!(status.stderr, "");
    assert_eq!(status.wrapper_error, "");
    assert_eq!(status.wrapper_pid, None);
    assert_eq!(status.start_time, DateTime::<Utc>::from(SystemTime::UNIX_EPOCH));
    assert!(!status.wrapper_spawned);
    assert!(!status.completed);
    assert_eq!(status.runtime_ms, 0);
    assert_eq!(status.spool, runner.spool().path(&request));
}

#[test]
fn spawned_run_reports_pid_and_growing_runtime() {
    let dir = TempDir::new().unwrap();
    let (runner, clock) = runner(&dir);
    let request = id("req-1");
    let spool = runner.spool().create(&request).unwrap();

    std::fs::write(spool.join(files::WRAPPER_STDOUT), "alive\n").unwrap();
    std::fs::write(spool.join(files::WRAPPER_STDERR), "").unwrap();
    std::fs::write(spool.join(files::WRAPPER_PID), "4242").unwrap();

    let status = runner.status(&request).unwrap();
    assert!(status.wrapper_spawned);
    assert_eq!(status.wrapper_pid, Some(4242));
    assert!(!status.completed);
    assert_eq!(status.exitcode, 127);
    assert!(status.start_time > DateTime::<Utc>::from(SystemTime::UNIX_EPOCH));

    clock.advance(Duration::from_secs(10));
    let first = runner.runtime(&request);
    assert!(first >= Duration::from_secs(9), "{:?}", first);

    clock.advance(Duration::from_secs(5));
    let second = runner.runtime(&request);
    assert!(second >= first, "runtime regressed: {:?} -> {:?}", first, second);
}

#[test]
fn completed_run_measures_runtime_from_file_mtimes() {
    let dir = TempDir::new().unwrap();
    let (runner, clock) = runner(&dir);
    let request = id("req-1");
    let spool = runner.spool().create(&request).unwrap();

    std::fs::write(spool.join(files::WRAPPER_STDERR), "").unwrap();
    std::fs::write(spool.join(files::WRAPPER_PID), "4242").unwrap();
    std::thread::sleep(Duration::from_millis(30));
    std::fs::write(spool.join(files::EXITCODE), "0").unwrap();

    let status = runner.status(&request).unwrap();
    assert!(status.completed);
    assert_eq!(status.exitcode, 0);
    assert!(status.runtime_ms >= 10, "runtime_ms = {}", status.runtime_ms);
    assert!(status.runtime_ms < 5_000, "runtime_ms = {}", status.runtime_ms);

    // A finished run's runtime is frozen; the clock no longer matters.
    let before = runner.runtime(&request);
    clock.advance(Duration::from_secs(60));
    assert_eq!(runner.runtime(&request), before);
}

#[test]
fn nonzero_exitcode_is_reported_verbatim() {
    let dir = TempDir::new().unwrap();
    let (runner, _clock) = runner(&dir);
    let request = id("req-1");
    let spool = runner.spool().create(&request).unwrap();
    std::fs::write(spool.join(files::EXITCODE), "3\n").unwrap();

    let status = runner.status(&request).unwrap();
    assert!(status.completed);
    assert_eq!(status.exitcode, 3);
}

#[test]
fn wrapper_failure_forces_completion() {
    let dir = TempDir::new().unwrap();
    let (runner, _clock) = runner(&dir);
    let request = id("req-1");
    let spool = runner.spool().create(&request).unwrap();
    std::fs::write(spool.join(files::WRAPPER_STDERR), "wrapper exploded").unwrap();

    let status = runner.status(&request).unwrap();
    assert!(status.completed);
    assert!(!status.wrapper_spawned);
    assert_eq!(status.wrapper_error, "wrapper exploded");
    assert_eq!(status.exitcode, 127);
    assert_eq!(status.runtime_ms, 0);
}

#[test]
fn empty_marker_files_are_not_terminal() {
    let dir = TempDir::new().unwrap();
    let (runner, _clock) = runner(&dir);
    let request = id("req-1");
    let spool = runner.spool().create(&request).unwrap();

    std::fs::write(spool.join(files::WRAPPER_STDERR), "").unwrap();
    std::fs::write(spool.join(files::EXITCODE), "").unwrap();
    assert!(!runner.is_complete(&request));

    std::fs::write(spool.join(files::EXITCODE), "0").unwrap();
    assert!(runner.is_complete(&request));
}

#[test]
fn task_output_is_surfaced() {
    let dir = TempDir::new().unwrap();
    let (runner, _clock) = runner(&dir);
    let request = id("req-1");
    let spool = runner.spool().create(&request).unwrap();
    std::fs::write(spool.join(files::STDOUT), "all good\n").unwrap();
    std::fs::write(spool.join(files::STDERR), "warning: x\n").unwrap();

    let status = runner.status(&request).unwrap();
    assert_eq!(status.stdout, "all good\n");
    assert_eq!(status.stderr, "warning: x\n");
}

#[test]
fn status_serializes_for_the_rpc_layer() {
    let dir = TempDir::new().unwrap();
    let (runner, _clock) = runner(&dir);
    let request = id("req-1");
    runner.spool().create(&request).unwrap();

    let status = runner.status(&request).unwrap();
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["exitcode"], 127);
    assert_eq!(json["completed"], false);
    assert!(json["spool"].as_str().unwrap().ends_with("req-1"));
}
