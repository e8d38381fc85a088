// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only query actor over the [`JobTracker`].
//!
//! The supervisor polls it while draining and the monitoring listener uses it
//! to answer status queries. Requests after [`Monitor::stop`] fail with
//! [`MonitorError::Stopped`].

use crate::tracker::JobTracker;
use sqsd_core::{Clock, Snapshot};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const MAILBOX_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("monitor has stopped")]
    Stopped,
}

enum MonitorRequest {
    Count(oneshot::Sender<usize>),
    Snapshot(oneshot::Sender<Snapshot>),
    Stop(oneshot::Sender<()>),
}

/// Cloneable handle to the monitor task.
#[derive(Clone)]
pub struct Monitor {
    tx: mpsc::Sender<MonitorRequest>,
}

impl Monitor {
    /// Spawn the monitor task on the current runtime.
    pub fn spawn<C: Clock>(tracker: JobTracker, clock: C) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(MAILBOX_CAPACITY);
        let task = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                match request {
                    MonitorRequest::Count(reply) => {
                        let _ = reply.send(tracker.count());
                    }
                    MonitorRequest::Snapshot(reply) => {
                        let _ = reply.send(tracker.snapshot(clock.epoch_ms()));
                    }
                    MonitorRequest::Stop(reply) => {
                        let _ = reply.send(());
                        break;
                    }
                }
            }
            tracing::debug!("monitor stopped");
        });
        (Self { tx }, task)
    }

    /// Number of jobs currently in flight.
    pub async fn count(&self) -> Result<usize, MonitorError> {
        self.ask(MonitorRequest::Count).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, MonitorError> {
        self.ask(MonitorRequest::Snapshot).await
    }

    /// Stop answering queries. Idempotent.
    pub async fn stop(&self) {
        let _ = self.ask(MonitorRequest::Stop).await;
    }

    async fn ask<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<T>) -> MonitorRequest,
    ) -> Result<T, MonitorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(request(reply_tx))
            .await
            .map_err(|_| MonitorError::Stopped)?;
        reply_rx.await.map_err(|_| MonitorError::Stopped)
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
