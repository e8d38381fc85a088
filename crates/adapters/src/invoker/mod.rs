// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invocation endpoint adapters

mod http;

pub use http::HttpInvoker;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInvoker, InvokeCall};

use async_trait::async_trait;
use sqsd_core::Job;
use std::time::Duration;
use thiserror::Error;

/// Errors from invoking a job
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("invocation timed out after {0:?}")]
    Timeout(Duration),

    #[error("invoker responded with status {0}")]
    Status(u16),

    #[error("invoker unreachable: {0}")]
    Transport(String),
}

impl InvokeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, InvokeError::Timeout(_))
    }
}

/// Endpoint that performs the work a job describes.
///
/// `Ok` means the job completed and its message may be deleted. Any error
/// leaves the message to reappear after its visibility timeout.
#[async_trait]
pub trait InvokerAdapter: Clone + Send + Sync + 'static {
    /// Deliver `job` and wait at most `timeout` for the outcome.
    async fn invoke(&self, job: &Job, timeout: Duration) -> Result<(), InvokeError>;
}
