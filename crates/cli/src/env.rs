// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::time::Duration;

pub const DEFAULT_ADDR: &str = "127.0.0.1:6969";

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Monitoring address: SQSD_ADDR > 127.0.0.1:6969
pub fn daemon_addr() -> String {
    std::env::var("SQSD_ADDR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
}

/// Timeout for connecting and for each request/response
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("SQSCTL_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval for `shutdown --wait`
pub fn poll_interval() -> Duration {
    parse_duration_ms("SQSCTL_POLL_MS").unwrap_or(Duration::from_millis(200))
}

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
