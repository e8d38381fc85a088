// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A unit of work received from the queue.

use crate::clock::Clock;
use std::time::{Duration, Instant};

crate::define_id! {
    /// Queue message identity. Stable across redeliveries of the same message.
    pub struct JobId;
}

crate::define_id! {
    /// Opaque token issued by the queue on receive; required to delete that
    /// specific delivery of a message. A redelivery carries a new handle.
    pub struct DeliveryHandle;
}

crate::define_id! {
    /// Identity of the dispatcher worker processing a job (e.g. `dispatcher-2`).
    pub struct WorkerId;
}

/// One received message, owned by exactly one dispatcher worker at a time.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub handle: DeliveryHandle,
    pub payload: String,
    /// Wall-clock receipt time
    pub received_at_ms: u64,
    /// Receipt instant plus the invoker timeout. Invocation must finish by
    /// then to stay inside the message's visibility window.
    pub deadline: Instant,
}

impl Job {
    /// Build a job received "now" according to `clock`.
    pub fn received<C: Clock>(
        id: JobId,
        handle: DeliveryHandle,
        payload: String,
        invoker_timeout: Duration,
        clock: &C,
    ) -> Self {
        Self {
            id,
            handle,
            payload,
            received_at_ms: clock.epoch_ms(),
            deadline: clock.now() + invoker_timeout,
        }
    }

    /// Time left before the deadline, zero once passed.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
