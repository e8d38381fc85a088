// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue adapters

mod sqs;

pub use sqs::SqsQueue;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod memory;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryQueue;

use async_trait::async_trait;
use sqsd_core::{DeliveryHandle, JobId};
use std::time::Duration;
use thiserror::Error;

/// Errors from queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("queue returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed queue response: {0}")]
    Decode(String),

    #[error("unknown or expired delivery handle: {0}")]
    InvalidHandle(DeliveryHandle),
}

/// Parameters of a single receive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveRequest {
    pub max_messages: u32,
    /// Long-poll wait; zero returns immediately
    pub wait_time: Duration,
    /// How long received messages stay hidden from other receivers
    pub visibility_timeout: Duration,
}

/// A message as delivered by the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub id: JobId,
    pub handle: DeliveryHandle,
    pub body: String,
    /// How many times the queue has handed this message out, including now
    pub receive_count: u32,
}

/// At-least-once queue with visibility-timeout redelivery.
///
/// Implementations must be safe to share across the fetcher and remover pools.
#[async_trait]
pub trait QueueAdapter: Clone + Send + Sync + 'static {
    /// Receive up to `max_messages`, hiding them for `visibility_timeout`.
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, QueueError>;

    /// Delete the delivery identified by `handle`.
    async fn delete(&self, handle: &DeliveryHandle) -> Result<(), QueueError>;
}
