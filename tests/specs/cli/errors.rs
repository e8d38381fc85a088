//! sqsctl behavior when no daemon is listening

use crate::prelude::*;

fn nowhere() -> String {
    format!("127.0.0.1:{}", free_port())
}

#[test]
fn status_reports_not_running() {
    let addr = nowhere();
    cli()
        .args(&["--addr", &addr, "status"])
        .passes()
        .stdout_has(&format!("sqsd not running at {addr}"));
}

#[test]
fn status_json_reports_not_running() {
    let run = cli()
        .args(&["--addr", &nowhere(), "-o", "json", "status"])
        .passes();
    assert_eq!(run.json()["state"], "not_running");
}

#[test]
fn workings_fails_when_not_running() {
    cli()
        .args(&["--addr", &nowhere(), "workings"])
        .fails()
        .stderr_has("not running");
}

#[test]
fn ping_uses_sqsd_addr_env() {
    let addr = nowhere();
    cli()
        .env("SQSD_ADDR", &addr)
        .args(&["ping"])
        .fails()
        .stderr_has(&addr);
}

#[test]
fn unknown_command_fails() {
    cli().args(&["restart"]).fails().code(2);
}
