// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

/// Config file path when `-c` is not given
pub const CONFIG_PATH: &str = "SQSD_CONFIG";

pub const QUEUE_URL: &str = "QUEUE_URL";
pub const INVOKER_URL: &str = "INVOKER_URL";
pub const REQUEST_CONTENT_TYPE: &str = "REQUEST_CONTENT_TYPE";
pub const INVOKER_TIMEOUT: &str = "DEFAULT_INVOKER_TIMEOUT_SECONDS";
pub const VISIBILITY_TIMEOUT: &str = "VISIBILITY_TIMEOUT_SECONDS";
pub const FETCHER_PARALLEL: &str = "FETCHER_PARALLEL_COUNT";
pub const INVOKER_PARALLEL: &str = "INVOKER_PARALLEL_COUNT";
pub const REMOVER_PARALLEL: &str = "REMOVER_PARALLEL_COUNT";
pub const MAX_MESSAGES: &str = "MAX_MESSAGES_PER_REQUEST";
pub const WAIT_TIME: &str = "WAIT_TIME_SECONDS";
pub const MONITORING_PORT: &str = "MONITORING_PORT";
pub const SQS_ENDPOINT_URL: &str = "SQS_ENDPOINT_URL";
pub const AWS_REGION: &str = "AWS_REGION";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const DRAIN_TIMEOUT: &str = "DRAIN_TIMEOUT_SECONDS";

/// Process environment lookup; blank values count as unset.
pub fn lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn config_path() -> Option<PathBuf> {
    lookup(CONFIG_PATH).map(PathBuf::from)
}
