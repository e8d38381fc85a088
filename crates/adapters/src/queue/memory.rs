// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory queue with visibility-timeout semantics, for tests
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{QueueAdapter, QueueError, ReceiveRequest, ReceivedMessage};
use async_trait::async_trait;
use parking_lot::Mutex;
use sqsd_core::{Clock, DeliveryHandle, FakeClock, IdGen, JobId, SequentialIdGen};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Granularity of the simulated long poll.
const LONG_POLL_SLICE: Duration = Duration::from_millis(5);

#[derive(Debug)]
struct StoredMessage {
    id: JobId,
    body: String,
    visible_at: Instant,
    /// Handle of the most recent delivery; earlier handles are stale.
    handle: Option<DeliveryHandle>,
    receive_count: u32,
}

#[derive(Debug, Default)]
struct MemoryQueueState {
    messages: Vec<StoredMessage>,
    deleted: Vec<JobId>,
    deliveries: Vec<(JobId, u32)>,
    failing_receives: usize,
    failing_deletes: usize,
}

/// Queue double driven by a [`FakeClock`].
///
/// A received message is hidden until the clock passes its visibility
/// deadline; each delivery gets a fresh handle and only the newest handle
/// can delete it, as with SQS.
#[derive(Clone)]
pub struct MemoryQueue {
    clock: FakeClock,
    ids: SequentialIdGen,
    handles: SequentialIdGen,
    inner: Arc<Mutex<MemoryQueueState>>,
}

impl MemoryQueue {
    pub fn new(clock: FakeClock) -> Self {
        Self {
            clock,
            ids: SequentialIdGen::new("msg"),
            handles: SequentialIdGen::new("rh"),
            inner: Arc::new(Mutex::new(MemoryQueueState::default())),
        }
    }

    /// Enqueue a message, visible immediately.
    pub fn send(&self, body: impl Into<String>) -> JobId {
        let id = JobId::new(self.ids.next());
        self.inner.lock().messages.push(StoredMessage {
            id: id.clone(),
            body: body.into(),
            visible_at: self.clock.now(),
            handle: None,
            receive_count: 0,
        });
        id
    }

    /// Fail the next `n` receive calls with a transport error.
    pub fn fail_receives(&self, n: usize) {
        self.inner.lock().failing_receives = n;
    }

    /// Fail the next `n` delete calls with a transport error.
    pub fn fail_deletes(&self, n: usize) {
        self.inner.lock().failing_deletes = n;
    }

    /// Messages still in the queue, visible or not.
    pub fn len(&self) -> usize {
        self.inner.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Messages a receive would return right now.
    pub fn visible_len(&self) -> usize {
        let now = self.clock.now();
        self.inner
            .lock()
            .messages
            .iter()
            .filter(|m| m.visible_at <= now)
            .count()
    }

    /// Ids of deleted messages, in deletion order.
    pub fn deleted(&self) -> Vec<JobId> {
        self.inner.lock().deleted.clone()
    }

    /// Every delivery made so far as `(id, receive_count)`.
    pub fn deliveries(&self) -> Vec<(JobId, u32)> {
        self.inner.lock().deliveries.clone()
    }

    /// Number of times the message has been delivered.
    pub fn receive_count(&self, id: &str) -> u32 {
        self.inner
            .lock()
            .deliveries
            .iter()
            .filter(|(d, _)| d == id)
            .count() as u32
    }

    fn take_visible(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, QueueError> {
        let now = self.clock.now();
        let mut state = self.inner.lock();
        if state.failing_receives > 0 {
            state.failing_receives -= 1;
            return Err(QueueError::Transport("injected receive failure".to_string()));
        }

        let mut out = Vec::new();
        for message in state
            .messages
            .iter_mut()
            .filter(|m| m.visible_at <= now)
            .take(request.max_messages as usize)
        {
            let handle = DeliveryHandle::new(self.handles.next());
            message.visible_at = now + request.visibility_timeout;
            message.handle = Some(handle.clone());
            message.receive_count += 1;
            out.push(ReceivedMessage {
                id: message.id.clone(),
                handle,
                body: message.body.clone(),
                receive_count: message.receive_count,
            });
        }
        for m in &out {
            state.deliveries.push((m.id.clone(), m.receive_count));
        }
        Ok(out)
    }
}

#[async_trait]
impl QueueAdapter for MemoryQueue {
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, QueueError> {
        let started = tokio::time::Instant::now();
        loop {
            let messages = self.take_visible(request)?;
            if !messages.is_empty() || started.elapsed() >= request.wait_time {
                return Ok(messages);
            }
            tokio::time::sleep(LONG_POLL_SLICE.min(request.wait_time)).await;
        }
    }

    async fn delete(&self, handle: &DeliveryHandle) -> Result<(), QueueError> {
        let mut state = self.inner.lock();
        if state.failing_deletes > 0 {
            state.failing_deletes -= 1;
            return Err(QueueError::Transport("injected delete failure".to_string()));
        }
        let position = state
            .messages
            .iter()
            .position(|m| m.handle.as_ref() == Some(handle))
            .ok_or_else(|| QueueError::InvalidHandle(handle.clone()))?;
        let message = state.messages.remove(position);
        state.deleted.push(message.id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
