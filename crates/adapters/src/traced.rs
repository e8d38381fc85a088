// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::invoker::{InvokeError, InvokerAdapter};
use crate::queue::{QueueAdapter, QueueError, ReceiveRequest, ReceivedMessage};
use async_trait::async_trait;
use sqsd_core::{DeliveryHandle, Job};
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any QueueAdapter
#[derive(Clone)]
pub struct TracedQueue<Q> {
    inner: Q,
}

impl<Q> TracedQueue<Q> {
    pub fn new(inner: Q) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Q {
        &self.inner
    }
}

#[async_trait]
impl<Q: QueueAdapter> QueueAdapter for TracedQueue<Q> {
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, QueueError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.receive(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(messages) if messages.is_empty() => tracing::trace!(elapsed_ms, "empty"),
                Ok(messages) => tracing::debug!(count = messages.len(), elapsed_ms, "received"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "receive failed"),
            }
            result
        }
        .instrument(tracing::debug_span!(
            "queue.receive",
            max = request.max_messages,
            wait_secs = request.wait_time.as_secs()
        ))
        .await
    }

    async fn delete(&self, handle: &DeliveryHandle) -> Result<(), QueueError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.delete(handle).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::debug!(elapsed_ms, "deleted"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "delete failed"),
            }
            result
        }
        .instrument(tracing::info_span!("queue.delete", handle = handle.as_str()))
        .await
    }
}

/// Wrapper that adds tracing to any InvokerAdapter
#[derive(Clone)]
pub struct TracedInvoker<I> {
    inner: I,
}

impl<I> TracedInvoker<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

#[async_trait]
impl<I: InvokerAdapter> InvokerAdapter for TracedInvoker<I> {
    async fn invoke(&self, job: &Job, timeout: Duration) -> Result<(), InvokeError> {
        async {
            tracing::debug!(payload_len = job.payload.len(), "invoking");
            let start = std::time::Instant::now();
            let result = self.inner.invoke(job, timeout).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "invoked"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "invoke failed"),
            }
            result
        }
        .instrument(tracing::info_span!(
            "invoker.invoke",
            job_id = job.id.as_str(),
            timeout_ms = timeout.as_millis() as u64
        ))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
