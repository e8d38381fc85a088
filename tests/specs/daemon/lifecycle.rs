//! sqsd start, monitor and drain specs

use crate::prelude::*;

#[test]
fn status_reports_running_daemon() {
    let daemon = RunningDaemon::start();

    let run = daemon.ctl().args(&["-o", "json", "status"]).passes();
    let status = run.json();
    assert_eq!(status["state"], "running");
    assert_eq!(status["in_flight"], 0);
    assert_eq!(status["dispatcher_parallel"], 1);
}

#[test]
fn workings_is_empty_without_jobs() {
    let daemon = RunningDaemon::start();

    daemon
        .ctl()
        .args(&["workings"])
        .passes()
        .stdout_has("No jobs in flight");
}

#[test]
fn shutdown_drains_and_exits_cleanly() {
    let mut daemon = RunningDaemon::start();

    daemon
        .ctl()
        .args(&["shutdown", "--wait", "--timeout", "10"])
        .passes()
        .stdout_has("Drain requested")
        .stdout_has("sqsd stopped");

    assert_eq!(daemon.wait_exit(SPEC_WAIT_MAX_MS), Some(0));
}

#[test]
fn sigterm_drains_and_exits_cleanly() {
    let mut daemon = RunningDaemon::start();

    let sent = std::process::Command::new("kill")
        .args(["-TERM", &daemon.child.id().to_string()])
        .status()
        .unwrap();
    assert!(sent.success());

    assert_eq!(daemon.wait_exit(SPEC_WAIT_MAX_MS), Some(0));
}
