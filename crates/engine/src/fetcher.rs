// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fetcher pool: long-poll the queue and feed the dispatcher intake.

use crate::dispatcher::DispatchIntake;
use crate::stats::PipelineStats;
use sqsd_adapters::{QueueAdapter, ReceiveRequest};
use sqsd_core::{Clock, Job, PipelineConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Per-loop settings derived from [`PipelineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub parallel: usize,
    pub request: ReceiveRequest,
    /// Deadline budget stamped on each received job
    pub invoker_timeout: Duration,
    /// Pause after an empty receive
    pub idle_sleep: Duration,
    /// Pause after a failed receive
    pub retry_delay: Duration,
}

impl FetchSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            parallel: config.fetcher_parallel,
            request: ReceiveRequest {
                max_messages: config.max_messages,
                wait_time: config.wait_time,
                visibility_timeout: config.visibility_timeout,
            },
            invoker_timeout: config.invoker_timeout,
            idle_sleep: config.idle_sleep,
            retry_delay: config.fetch_retry_delay,
        }
    }
}

/// N independent receive loops.
pub struct FetcherPool {
    stop: watch::Sender<bool>,
    loops: Vec<JoinHandle<()>>,
}

impl FetcherPool {
    pub fn start<Q: QueueAdapter, C: Clock>(
        queue: Q,
        settings: FetchSettings,
        intake: DispatchIntake,
        clock: C,
        stats: Arc<PipelineStats>,
    ) -> Self {
        let (stop, stop_rx) = watch::channel(false);
        let loops = (1..=settings.parallel)
            .map(|n| {
                let fetch = FetchLoop {
                    n,
                    queue: queue.clone(),
                    settings,
                    intake: intake.clone(),
                    clock: clock.clone(),
                    stats: Arc::clone(&stats),
                };
                tokio::spawn(fetch.run(stop_rx.clone()))
            })
            .collect();
        Self { stop, loops }
    }

    /// Ask every loop to finish its current receive and exit.
    ///
    /// A receive already in progress is not cancelled; its messages are
    /// still forwarded.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    pub async fn join(self) {
        for handle in self.loops {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "fetch loop panicked");
            }
        }
    }
}

struct FetchLoop<Q, C> {
    n: usize,
    queue: Q,
    settings: FetchSettings,
    intake: DispatchIntake,
    clock: C,
    stats: Arc<PipelineStats>,
}

impl<Q: QueueAdapter, C: Clock> FetchLoop<Q, C> {
    async fn run(self, mut stop: watch::Receiver<bool>) {
        tracing::debug!(fetcher = self.n, "fetch loop started");
        while !*stop.borrow() {
            match self.queue.receive(&self.settings.request).await {
                Ok(messages) if messages.is_empty() => {
                    if !pause(self.settings.idle_sleep, &mut stop).await {
                        break;
                    }
                }
                Ok(messages) => {
                    self.stats.record_received(messages.len());
                    for message in messages {
                        let job = Job::received(
                            message.id,
                            message.handle,
                            message.body,
                            self.settings.invoker_timeout,
                            &self.clock,
                        );
                        if let Err(job) = self.intake.send(job).await {
                            tracing::warn!(
                                fetcher = self.n,
                                job_id = %job.id,
                                "dispatcher closed, message left for redelivery"
                            );
                            return;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(fetcher = self.n, error = %e, "receive failed, retrying");
                    if !pause(self.settings.retry_delay, &mut stop).await {
                        break;
                    }
                }
            }
        }
        tracing::debug!(fetcher = self.n, "fetch loop stopped");
    }
}

/// Sleep for `delay`, waking early if stop is requested. Returns false when
/// the pool handle is gone.
async fn pause(delay: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    if delay.is_zero() {
        tokio::task::yield_now().await;
        return true;
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        changed = stop.changed() => changed.is_ok(),
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
