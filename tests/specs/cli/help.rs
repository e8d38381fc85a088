//! sqsctl help output specs

use crate::prelude::*;

#[test]
fn sqsctl_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn sqsctl_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("status")
        .stdout_has("workings")
        .stdout_has("shutdown")
        .stdout_has("ping");
}

#[test]
fn sqsctl_shutdown_help_shows_wait() {
    cli()
        .args(&["shutdown", "--help"])
        .passes()
        .stdout_has("--wait");
}

#[test]
fn sqsctl_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
