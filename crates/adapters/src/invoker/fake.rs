// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake invoker for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{InvokeError, InvokerAdapter};
use async_trait::async_trait;
use parking_lot::Mutex;
use sqsd_core::{Job, JobId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeCall {
    pub job_id: JobId,
    pub payload: String,
}

#[derive(Default)]
struct FakeInvokerState {
    calls: Vec<InvokeCall>,
    /// Payload -> remaining failures
    failures: HashMap<String, usize>,
    delay: Duration,
}

/// Invoker double that succeeds unless told otherwise.
///
/// Records every call, can hold each call for a fixed delay, and tracks the
/// highest number of calls running at once.
#[derive(Clone, Default)]
pub struct FakeInvoker {
    inner: Arc<Mutex<FakeInvokerState>>,
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.inner.lock().delay = delay;
        self
    }

    /// Fail the next `times` invocations whose payload equals `payload`.
    pub fn fail_payload(&self, payload: &str, times: usize) {
        self.inner.lock().failures.insert(payload.to_string(), times);
    }

    pub fn calls(&self) -> Vec<InvokeCall> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }

    /// Number of invocations of `payload` so far.
    pub fn calls_for(&self, payload: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| c.payload == payload)
            .count()
    }

    /// Invocations currently waiting out their delay.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Highest concurrency observed.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvokerAdapter for FakeInvoker {
    async fn invoke(&self, job: &Job, timeout: Duration) -> Result<(), InvokeError> {
        let (delay, fail) = {
            let mut state = self.inner.lock();
            state.calls.push(InvokeCall {
                job_id: job.id.clone(),
                payload: job.payload.clone(),
            });
            let fail = match state.failures.get_mut(&job.payload) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    true
                }
                _ => false,
            };
            (state.delay, fail)
        };

        let now_running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now_running, Ordering::SeqCst);
        let outcome = if delay > timeout {
            tokio::time::sleep(timeout).await;
            Err(InvokeError::Timeout(timeout))
        } else {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if fail {
                Err(InvokeError::Status(500))
            } else {
                Ok(())
            }
        };
        self.running.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
