// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline lifecycle: RUNNING → DRAINING → STOPPED.
//!
//! A termination request stops the fetchers, then the supervisor polls the
//! monitor until nothing is in flight or queued for dispatch. Only then are
//! the dispatcher, remover and monitor torn down. There is no way back to
//! RUNNING.

use crate::dispatcher::Dispatcher;
use crate::fetcher::{FetchSettings, FetcherPool};
use crate::monitor::{Monitor, MonitorError};
use crate::remover::RemoverPool;
use crate::stats::{PipelineStats, StatsSnapshot};
use crate::tracker::JobTracker;
use crate::EngineError;
use serde::{Deserialize, Serialize};
use sqsd_adapters::{InvokerAdapter, QueueAdapter};
use sqsd_core::{format_elapsed_ms, Clock, InFlightEntry, PipelineConfig, Snapshot};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Running,
    Draining,
    Stopped,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineState::Running => "running",
            PipelineState::Draining => "draining",
            PipelineState::Stopped => "stopped",
        })
    }
}

/// Issues termination requests. Every signal source shares one of these.
#[derive(Clone)]
pub struct ShutdownHandle {
    state: Arc<watch::Sender<PipelineState>>,
}

impl ShutdownHandle {
    /// Move RUNNING to DRAINING. Returns false if a drain was already
    /// requested, in which case nothing happens.
    pub fn request(&self) -> bool {
        let accepted = self.state.send_if_modified(|state| {
            if *state == PipelineState::Running {
                *state = PipelineState::Draining;
                true
            } else {
                false
            }
        });
        if accepted {
            tracing::info!("termination requested, draining");
        } else {
            tracing::debug!(state = %self.state(), "termination already requested");
        }
        accepted
    }

    pub fn state(&self) -> PipelineState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }
}

/// Operator-facing summary of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub state: PipelineState,
    pub in_flight: usize,
    pub dispatcher_parallel: usize,
    pub backlog: usize,
    pub uptime_secs: u64,
    pub totals: StatsSnapshot,
}

/// Read-only view of a running pipeline for the monitoring listener.
#[derive(Clone)]
pub struct PipelineProbe {
    shutdown: ShutdownHandle,
    monitor: Monitor,
    backlog: Arc<AtomicUsize>,
    stats: Arc<PipelineStats>,
    dispatcher_parallel: usize,
    started_at: Instant,
}

impl PipelineProbe {
    pub async fn status(&self) -> Result<PipelineStatus, MonitorError> {
        let backlog = self.backlog.load(Ordering::SeqCst);
        let in_flight = self.monitor.count().await?;
        Ok(PipelineStatus {
            state: self.shutdown.state(),
            in_flight,
            dispatcher_parallel: self.dispatcher_parallel,
            backlog,
            uptime_secs: self.started_at.elapsed().as_secs(),
            totals: self.stats.snapshot(),
        })
    }

    /// Jobs currently being invoked.
    pub async fn current_workings(&self) -> Result<Snapshot, MonitorError> {
        self.monitor.snapshot().await
    }

    pub fn shutdown(&self) -> &ShutdownHandle {
        &self.shutdown
    }
}

/// Outcome of a completed drain.
#[derive(Debug, Clone)]
pub struct DrainReport {
    pub elapsed: Duration,
    /// Monitor polls taken before the pipeline was idle
    pub polls: u32,
    /// Jobs still in flight when the drain deadline passed
    pub abandoned: Vec<InFlightEntry>,
    /// Jobs received but never dispatched when the drain deadline passed
    pub abandoned_backlog: usize,
    pub totals: StatsSnapshot,
}

/// Owns the worker pools and runs the shutdown protocol.
pub struct Supervisor {
    config: PipelineConfig,
    state: Arc<watch::Sender<PipelineState>>,
    fetchers: FetcherPool,
    dispatcher: Dispatcher,
    remover: RemoverPool,
    monitor: Monitor,
    monitor_task: JoinHandle<()>,
    stats: Arc<PipelineStats>,
    started_at: Instant,
}

impl Supervisor {
    /// Validate `config` and start every pool. Must run inside a tokio
    /// runtime. Nothing is spawned if validation fails.
    pub fn start<Q, I, C>(
        config: PipelineConfig,
        queue: Q,
        invoker: I,
        clock: C,
    ) -> Result<Self, EngineError>
    where
        Q: QueueAdapter,
        I: InvokerAdapter,
        C: Clock,
    {
        config.validate()?;

        let stats = Arc::new(PipelineStats::new());
        let tracker = JobTracker::new();
        let (monitor, monitor_task) = Monitor::spawn(tracker.clone(), clock.clone());
        let remover = RemoverPool::start(queue.clone(), config.remover_parallel, Arc::clone(&stats));
        let dispatcher = Dispatcher::start(
            config.dispatcher_parallel,
            invoker,
            tracker,
            remover.handle(),
            clock.clone(),
            Arc::clone(&stats),
        );
        let fetchers = FetcherPool::start(
            queue,
            FetchSettings::from_config(&config),
            dispatcher.intake(),
            clock,
            Arc::clone(&stats),
        );

        tracing::info!(
            fetchers = config.fetcher_parallel,
            dispatchers = config.dispatcher_parallel,
            removers = config.remover_parallel,
            invoker_timeout_ms = config.invoker_timeout.as_millis() as u64,
            visibility_timeout_secs = config.visibility_timeout.as_secs(),
            "pipeline running"
        );

        let (state, _) = watch::channel(PipelineState::Running);
        Ok(Self {
            config,
            state: Arc::new(state),
            fetchers,
            dispatcher,
            remover,
            monitor,
            monitor_task,
            stats,
            started_at: Instant::now(),
        })
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn probe(&self) -> PipelineProbe {
        PipelineProbe {
            shutdown: self.shutdown_handle(),
            monitor: self.monitor.clone(),
            backlog: self.dispatcher.backlog_counter(),
            stats: Arc::clone(&self.stats),
            dispatcher_parallel: self.config.dispatcher_parallel,
            started_at: self.started_at,
        }
    }

    /// Run until a termination request arrives, then drain and stop.
    pub async fn run(self) -> Result<DrainReport, EngineError> {
        let mut state_rx = self.state.subscribe();
        while *state_rx.borrow_and_update() == PipelineState::Running {
            state_rx
                .changed()
                .await
                .map_err(|_| EngineError::StateClosed)?;
        }
        self.drain().await
    }

    async fn drain(self) -> Result<DrainReport, EngineError> {
        let Self {
            config,
            state,
            fetchers,
            dispatcher,
            remover,
            monitor,
            monitor_task,
            stats,
            ..
        } = self;
        let started = tokio::time::Instant::now();
        // An unrepresentable deadline is as good as none.
        let deadline = config
            .drain_timeout
            .and_then(|limit| started.checked_add(limit));

        fetchers.stop();
        fetchers.join().await;
        tracing::info!("fetchers stopped, waiting for in-flight jobs");

        let mut polls = 0u32;
        let mut abandoned_backlog = 0;
        let abandoned = loop {
            // Backlog first: a job leaves the backlog only after it is in
            // the tracker, so this order never misses one in transit.
            let backlog = dispatcher.backlog();
            let in_flight = monitor.count().await?;
            polls += 1;
            if backlog == 0 && in_flight == 0 {
                break Vec::new();
            }
            if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                let snapshot = monitor.snapshot().await?;
                for entry in snapshot.entries() {
                    tracing::warn!(
                        job_id = %entry.job_id,
                        worker = %entry.worker,
                        started_at_ms = entry.started_at_ms,
                        "drain deadline passed, abandoning job"
                    );
                }
                if backlog > 0 {
                    tracing::warn!(
                        backlog,
                        "drain deadline passed, abandoning undispatched jobs"
                    );
                }
                abandoned_backlog = backlog;
                break snapshot.into_entries();
            }
            tracing::debug!(in_flight, backlog, "draining");
            tokio::time::sleep(config.drain_poll_interval).await;
        };

        state.send_replace(PipelineState::Stopped);
        if abandoned.is_empty() && abandoned_backlog == 0 {
            dispatcher.stop();
            dispatcher.join().await;
        } else {
            dispatcher.abort();
        }
        remover.stop().await;
        monitor.stop().await;
        if let Err(e) = monitor_task.await {
            tracing::error!(error = %e, "monitor task panicked");
        }

        let elapsed = started.elapsed();
        let totals = stats.snapshot();
        tracing::info!(
            drained_in = %format_elapsed_ms(elapsed.as_millis() as u64),
            polls,
            abandoned = abandoned.len(),
            abandoned_backlog,
            received = totals.received,
            succeeded = totals.succeeded,
            failed = totals.failed,
            deleted = totals.deleted,
            "pipeline stopped"
        );
        Ok(DrainReport {
            elapsed,
            polls,
            abandoned,
            abandoned_backlog,
            totals,
        })
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
