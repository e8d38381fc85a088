// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sqsd-core: shared types for the sqsd queue-to-HTTP bridge

pub mod clock;
pub mod config;
pub mod id;
pub mod inflight;
pub mod job;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ConfigError, PipelineConfig, MAX_MESSAGES_PER_REQUEST, MAX_VISIBILITY_TIMEOUT,
    MAX_WAIT_TIME, VISIBILITY_SAFETY_MARGIN,
};
pub use id::{IdGen, SequentialIdGen};
pub use inflight::{InFlightEntry, Snapshot};
pub use job::{DeliveryHandle, Job, JobId, WorkerId};
pub use time_fmt::{format_elapsed, format_elapsed_ms};
