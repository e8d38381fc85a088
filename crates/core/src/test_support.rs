// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test builders for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Clock, DeliveryHandle, InFlightEntry, Job, JobId, PipelineConfig, WorkerId};
use std::time::Duration;

pub const TEST_QUEUE_URL: &str = "http://queue.test/000000000000/jobs";
pub const TEST_INVOKER_URL: &str = "http://worker.test/run";

/// A job with id `msg-<payload>` and handle `rh-<payload>`.
pub fn job<C: Clock>(payload: &str, timeout: Duration, clock: &C) -> Job {
    Job::received(
        JobId::new(format!("msg-{payload}")),
        DeliveryHandle::new(format!("rh-{payload}")),
        payload.to_string(),
        timeout,
        clock,
    )
}

pub fn entry(job_id: &str, worker: &str, started_at_ms: u64) -> InFlightEntry {
    InFlightEntry::new(JobId::new(job_id), WorkerId::new(worker), started_at_ms)
}

/// Valid config tuned for fast tests: no long polling, short retry and drain poll.
pub fn fast_config(fetchers: usize, dispatchers: usize) -> PipelineConfig {
    let mut config = PipelineConfig::new(TEST_QUEUE_URL, TEST_INVOKER_URL)
        .with_invoker_timeout(Duration::from_secs(1));
    config.fetcher_parallel = fetchers;
    config.dispatcher_parallel = dispatchers;
    config.remover_parallel = 2;
    config.max_messages = 10;
    config.wait_time = Duration::ZERO;
    config.idle_sleep = Duration::from_millis(5);
    config.fetch_retry_delay = Duration::from_millis(5);
    config.drain_poll_interval = Duration::from_millis(10);
    config
}
