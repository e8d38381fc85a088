// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the queue and the invocation endpoint

pub mod invoker;
pub mod queue;
pub mod traced;

pub use invoker::{HttpInvoker, InvokeError, InvokerAdapter};
pub use queue::{QueueAdapter, QueueError, ReceiveRequest, ReceivedMessage, SqsQueue};
pub use traced::{TracedInvoker, TracedQueue};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use invoker::{FakeInvoker, InvokeCall};
#[cfg(any(test, feature = "test-support"))]
pub use queue::MemoryQueue;
