// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deletes acknowledged messages off the hot path.

use crate::stats::PipelineStats;
use sqsd_adapters::QueueAdapter;
use sqsd_core::DeliveryHandle;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Submission side of the remover pool, held by dispatcher workers.
#[derive(Clone)]
pub struct RemoverHandle {
    tx: mpsc::UnboundedSender<DeliveryHandle>,
}

impl RemoverHandle {
    /// Detached handle whose submissions land in the returned receiver.
    #[cfg(test)]
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<DeliveryHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a delete. Never blocks; returns false once the pool has stopped.
    pub fn submit(&self, handle: DeliveryHandle) -> bool {
        match self.tx.send(handle) {
            Ok(()) => true,
            Err(mpsc::error::SendError(handle)) => {
                tracing::warn!(handle = handle.as_str(), "remover stopped, delete dropped");
                false
            }
        }
    }
}

/// Fixed set of workers issuing deletes against the queue.
///
/// A failed delete is logged and counted, never retried; the message comes
/// back after its visibility timeout.
pub struct RemoverPool {
    handle: RemoverHandle,
    workers: Vec<JoinHandle<()>>,
}

impl RemoverPool {
    pub fn start<Q: QueueAdapter>(queue: Q, parallel: usize, stats: Arc<PipelineStats>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<DeliveryHandle>();
        let rx = Arc::new(Mutex::new(rx));
        let workers = (1..=parallel)
            .map(|n| {
                let queue = queue.clone();
                let rx = Arc::clone(&rx);
                let stats = Arc::clone(&stats);
                tokio::spawn(async move {
                    loop {
                        let next = rx.lock().await.recv().await;
                        let Some(handle) = next else { break };
                        match queue.delete(&handle).await {
                            Ok(()) => stats.record_deleted(),
                            Err(e) => {
                                stats.record_delete_failed();
                                tracing::warn!(
                                    worker = n,
                                    handle = handle.as_str(),
                                    error = %e,
                                    "delete failed, message will be redelivered"
                                );
                            }
                        }
                    }
                    tracing::debug!(worker = n, "remover worker exited");
                })
            })
            .collect();

        Self {
            handle: RemoverHandle { tx },
            workers,
        }
    }

    pub fn handle(&self) -> RemoverHandle {
        self.handle.clone()
    }

    /// Close the pool and wait for queued deletes to finish.
    ///
    /// Workers exit once every [`RemoverHandle`] is dropped and the queue
    /// of pending deletes is empty.
    pub async fn stop(self) {
        let Self { handle, workers } = self;
        drop(handle);
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "remover worker panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "remover_tests.rs"]
mod tests;
