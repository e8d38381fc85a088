// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use yare::parameterized;

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    let debug = format!("{:?}", styles());
    assert_eq!(
        debug,
        format!("{:?}", clap::builder::styling::Styles::plain())
    );
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn status_produces_ansi_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let result = status("stopped");
    assert!(result.starts_with("\x1b[31m"));
    assert!(result.ends_with("\x1b[0m"));
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn no_color_wins_over_force() {
    std::env::set_var("COLOR", "1");
    std::env::set_var("NO_COLOR", "1");

    assert_eq!(status("running"), "running");
    std::env::remove_var("COLOR");
    std::env::remove_var("NO_COLOR");
}

#[parameterized(
    running = { "running", "\x1b[32m" },
    draining = { "draining", "\x1b[33m" },
    stopped = { "stopped", "\x1b[31m" },
    with_detail = { "draining (3 in flight)", "\x1b[33m" },
)]
fn status_colors(text: &str, code: &str) {
    let out = apply_status(text);
    assert!(out.starts_with(code), "{out:?}");
    assert!(out.contains(text));
}

#[test]
fn unknown_status_is_left_alone() {
    assert_eq!(apply_status("paused"), "paused");
}
