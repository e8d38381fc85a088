// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher pool: register, invoke, hand off to the remover.

use crate::remover::RemoverHandle;
use crate::stats::PipelineStats;
use crate::tracker::JobTracker;
use sqsd_adapters::{InvokeError, InvokerAdapter};
use sqsd_core::{Clock, InFlightEntry, Job, WorkerId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

/// Sending side of the dispatcher intake, cloned into each fetcher.
///
/// Every job sent is counted in the backlog until a worker has registered
/// it with the tracker, so a job is always visible to the drain check
/// either as backlog or as in flight.
#[derive(Clone)]
pub struct DispatchIntake {
    tx: mpsc::Sender<Job>,
    backlog: Arc<AtomicUsize>,
}

impl DispatchIntake {
    /// Intake not attached to any workers, for driving fetchers directly.
    #[cfg(test)]
    pub(crate) fn channel(capacity: usize) -> (Self, mpsc::Receiver<Job>) {
        let (tx, rx) = mpsc::channel(capacity);
        let intake = Self {
            tx,
            backlog: Arc::new(AtomicUsize::new(0)),
        };
        (intake, rx)
    }

    /// Hand a job to the pool, waiting while the intake is full.
    ///
    /// Gives the job back if the dispatcher has shut down.
    pub async fn send(&self, job: Job) -> Result<(), Job> {
        self.backlog.fetch_add(1, Ordering::SeqCst);
        self.tx.send(job).await.map_err(|mpsc::error::SendError(job)| {
            self.backlog.fetch_sub(1, Ordering::SeqCst);
            job
        })
    }
}

/// M workers sharing one intake queue.
pub struct Dispatcher {
    intake: DispatchIntake,
    stop: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
}

struct Worker<I, C> {
    id: WorkerId,
    invoker: I,
    tracker: JobTracker,
    remover: RemoverHandle,
    clock: C,
    stats: Arc<PipelineStats>,
    backlog: Arc<AtomicUsize>,
}

impl Dispatcher {
    /// Spawn `parallel` workers. The intake holds at most `parallel` queued
    /// jobs, so fetchers feel back-pressure once every worker is busy.
    pub fn start<I: InvokerAdapter, C: Clock>(
        parallel: usize,
        invoker: I,
        tracker: JobTracker,
        remover: RemoverHandle,
        clock: C,
        stats: Arc<PipelineStats>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<Job>(parallel.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let backlog = Arc::new(AtomicUsize::new(0));
        let (stop, stop_rx) = watch::channel(false);

        let workers = (1..=parallel)
            .map(|n| {
                let worker = Worker {
                    id: WorkerId::new(format!("dispatcher-{n}")),
                    invoker: invoker.clone(),
                    tracker: tracker.clone(),
                    remover: remover.clone(),
                    clock: clock.clone(),
                    stats: Arc::clone(&stats),
                    backlog: Arc::clone(&backlog),
                };
                tokio::spawn(worker.run(Arc::clone(&rx), stop_rx.clone()))
            })
            .collect();

        Self {
            intake: DispatchIntake { tx, backlog },
            stop,
            workers,
        }
    }

    pub fn intake(&self) -> DispatchIntake {
        self.intake.clone()
    }

    /// Jobs accepted by the intake but not yet registered by a worker.
    pub fn backlog(&self) -> usize {
        self.intake.backlog.load(Ordering::SeqCst)
    }

    pub fn backlog_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.intake.backlog)
    }

    /// Stop picking up new jobs. Jobs already being invoked run to completion.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    /// Wait for every worker to exit. Call after [`Dispatcher::stop`].
    pub async fn join(self) {
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "dispatcher worker panicked");
            }
        }
    }

    /// Cancel every worker, including jobs mid-invocation.
    pub fn abort(self) {
        for worker in self.workers {
            worker.abort();
        }
    }
}

impl<I: InvokerAdapter, C: Clock> Worker<I, C> {
    async fn run(self, intake: Arc<Mutex<mpsc::Receiver<Job>>>, mut stop: watch::Receiver<bool>) {
        loop {
            if *stop.borrow() {
                break;
            }
            let next = {
                let mut rx = intake.lock().await;
                tokio::select! {
                    biased;
                    _ = stop.changed() => None,
                    job = rx.recv() => job,
                }
            };
            let Some(job) = next else { break };
            self.process(job).await;
        }
        tracing::debug!(worker = %self.id, "dispatcher worker exited");
    }

    async fn process(&self, job: Job) {
        let entry = InFlightEntry::new(job.id.clone(), self.id.clone(), self.clock.epoch_ms());
        let registered = self.tracker.register(entry);
        self.backlog.fetch_sub(1, Ordering::SeqCst);
        if let Err(e) = registered {
            tracing::warn!(worker = %self.id, job_id = %job.id, error = %e, "skipping duplicate delivery");
            return;
        }

        let timeout = job.remaining(self.clock.now());
        let outcome = if timeout.is_zero() {
            Err(InvokeError::Timeout(timeout))
        } else {
            self.invoker.invoke(&job, timeout).await
        };

        let succeeded = match outcome {
            Ok(()) => {
                self.remover.submit(job.handle.clone());
                tracing::debug!(worker = %self.id, job_id = %job.id, "job succeeded");
                true
            }
            Err(e) => {
                tracing::warn!(
                    worker = %self.id,
                    job_id = %job.id,
                    error = %e,
                    "job failed, leaving it for redelivery"
                );
                false
            }
        };

        if let Err(e) = self.tracker.unregister(&job.id) {
            tracing::error!(worker = %self.id, error = %e, "in-flight entry vanished");
        }
        if succeeded {
            self.stats.record_succeeded();
        } else {
            self.stats.record_failed();
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
