// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline configuration and its startup validation.

use std::time::Duration;
use thiserror::Error;

/// Visibility must exceed the invoker timeout by at least this much, otherwise
/// the queue could redeliver a message that is still being processed.
pub const VISIBILITY_SAFETY_MARGIN: Duration = Duration::from_secs(10);

/// Longest visibility timeout the queue accepts (12 hours).
pub const MAX_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);

/// Largest batch a single receive may request.
pub const MAX_MESSAGES_PER_REQUEST: u32 = 10;

/// Longest long-poll wait a single receive may request.
pub const MAX_WAIT_TIME: Duration = Duration::from_secs(20);

pub const DEFAULT_INVOKER_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_FETCH_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_IDLE_SLEEP: Duration = Duration::from_secs(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} is not an http(s) URL: {value}")]
    NotHttpUrl { field: &'static str, value: String },

    #[error("{field} must be at least 1")]
    ZeroParallelism { field: &'static str },

    #[error("max_messages_per_request must be within 1..={max}, got {got}")]
    BatchSize { got: u32, max: u32 },

    #[error("wait_time must be at most {max:?}, got {got:?}")]
    WaitTime { got: Duration, max: Duration },

    #[error("invoker_timeout must be greater than zero")]
    ZeroInvokerTimeout,

    #[error("invoker_timeout {got:?} leaves no room for a visibility timeout (max {max:?})")]
    InvokerTimeoutTooLong { got: Duration, max: Duration },

    #[error(
        "visibility_timeout {visibility:?} must be at least invoker_timeout {invoker:?} + {margin:?}"
    )]
    VisibilityTooShort {
        visibility: Duration,
        invoker: Duration,
        margin: Duration,
    },

    #[error("visibility_timeout {got:?} exceeds the queue maximum {max:?}")]
    VisibilityTooLong { got: Duration, max: Duration },

    #[error("drain_poll_interval must be greater than zero")]
    ZeroDrainPoll,

    #[error("wait_time and idle_sleep are both zero; the queue would be polled in a busy loop")]
    BusyPoll,
}

/// Immutable settings the pipeline is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub queue_url: String,
    pub invoker_url: String,
    /// Content-Type sent with every invocation
    pub content_type: String,
    pub invoker_timeout: Duration,
    /// Set on every receive; see [`VISIBILITY_SAFETY_MARGIN`]
    pub visibility_timeout: Duration,
    pub fetcher_parallel: usize,
    pub dispatcher_parallel: usize,
    pub remover_parallel: usize,
    pub max_messages: u32,
    /// Long-poll wait per receive
    pub wait_time: Duration,
    /// Pause after a receive that returned nothing
    pub idle_sleep: Duration,
    /// Pause after a failed receive
    pub fetch_retry_delay: Duration,
    pub drain_poll_interval: Duration,
    /// Upper bound on draining; `None` waits for every in-flight job.
    pub drain_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Defaults for everything but the two endpoints.
    pub fn new(queue_url: impl Into<String>, invoker_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            invoker_url: invoker_url.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            invoker_timeout: DEFAULT_INVOKER_TIMEOUT,
            visibility_timeout: Self::derived_visibility(DEFAULT_INVOKER_TIMEOUT),
            fetcher_parallel: 1,
            dispatcher_parallel: 1,
            remover_parallel: 2,
            max_messages: 1,
            wait_time: MAX_WAIT_TIME,
            idle_sleep: DEFAULT_IDLE_SLEEP,
            fetch_retry_delay: DEFAULT_FETCH_RETRY_DELAY,
            drain_poll_interval: DEFAULT_DRAIN_POLL_INTERVAL,
            drain_timeout: None,
        }
    }

    /// Smallest visibility timeout that is safe for `invoker_timeout`.
    ///
    /// Saturates instead of overflowing; [`validate`](Self::validate) rejects
    /// any timeout this large.
    pub fn derived_visibility(invoker_timeout: Duration) -> Duration {
        invoker_timeout.saturating_add(VISIBILITY_SAFETY_MARGIN)
    }

    /// Set the invoker timeout and re-derive the visibility timeout from it.
    pub fn with_invoker_timeout(mut self, timeout: Duration) -> Self {
        self.invoker_timeout = timeout;
        self.visibility_timeout = Self::derived_visibility(timeout);
        self
    }

    /// Reject configurations the pipeline must never start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("queue_url", &self.queue_url)?;
        check_url("invoker_url", &self.invoker_url)?;

        for (field, value) in [
            ("fetcher_parallel", self.fetcher_parallel),
            ("dispatcher_parallel", self.dispatcher_parallel),
            ("remover_parallel", self.remover_parallel),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroParallelism { field });
            }
        }

        if self.max_messages == 0 || self.max_messages > MAX_MESSAGES_PER_REQUEST {
            return Err(ConfigError::BatchSize {
                got: self.max_messages,
                max: MAX_MESSAGES_PER_REQUEST,
            });
        }
        if self.wait_time > MAX_WAIT_TIME {
            return Err(ConfigError::WaitTime {
                got: self.wait_time,
                max: MAX_WAIT_TIME,
            });
        }
        if self.wait_time.is_zero() && self.idle_sleep.is_zero() {
            return Err(ConfigError::BusyPoll);
        }
        if self.invoker_timeout.is_zero() {
            return Err(ConfigError::ZeroInvokerTimeout);
        }
        let max_invoker = MAX_VISIBILITY_TIMEOUT.saturating_sub(VISIBILITY_SAFETY_MARGIN);
        if self.invoker_timeout > max_invoker {
            return Err(ConfigError::InvokerTimeoutTooLong {
                got: self.invoker_timeout,
                max: max_invoker,
            });
        }
        if self.visibility_timeout < Self::derived_visibility(self.invoker_timeout) {
            return Err(ConfigError::VisibilityTooShort {
                visibility: self.visibility_timeout,
                invoker: self.invoker_timeout,
                margin: VISIBILITY_SAFETY_MARGIN,
            });
        }
        if self.visibility_timeout > MAX_VISIBILITY_TIMEOUT {
            return Err(ConfigError::VisibilityTooLong {
                got: self.visibility_timeout,
                max: MAX_VISIBILITY_TIMEOUT,
            });
        }
        if self.drain_poll_interval.is_zero() {
            return Err(ConfigError::ZeroDrainPoll);
        }
        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing { field });
    }
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ConfigError::NotHttpUrl {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
