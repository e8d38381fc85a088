// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authoritative registry of in-flight jobs.

use parking_lot::Mutex;
use sqsd_core::{InFlightEntry, JobId, Snapshot};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("job {0} is already in flight")]
    AlreadyRegistered(JobId),
    #[error("job {0} is not in flight")]
    NotRegistered(JobId),
}

/// Shared set of [`InFlightEntry`], keyed by job id.
///
/// Each operation holds the lock only for the map update or copy; nothing
/// awaits while holding it.
#[derive(Debug, Clone, Default)]
pub struct JobTracker {
    inner: Arc<Mutex<HashMap<JobId, InFlightEntry>>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a worker has started on a job.
    ///
    /// Fails if the job is already in flight, which happens when the queue
    /// redelivers a message whose first delivery is still being processed.
    pub fn register(&self, entry: InFlightEntry) -> Result<(), TrackerError> {
        let mut jobs = self.inner.lock();
        if jobs.contains_key(&entry.job_id) {
            return Err(TrackerError::AlreadyRegistered(entry.job_id));
        }
        jobs.insert(entry.job_id.clone(), entry);
        Ok(())
    }

    pub fn unregister(&self, job_id: &JobId) -> Result<InFlightEntry, TrackerError> {
        self.inner
            .lock()
            .remove(job_id)
            .ok_or_else(|| TrackerError::NotRegistered(job_id.clone()))
    }

    /// Consistent copy of the current set.
    pub fn snapshot(&self, taken_at_ms: u64) -> Snapshot {
        let entries = self.inner.lock().values().cloned().collect();
        Snapshot::new(taken_at_ms, entries)
    }

    pub fn count(&self) -> usize {
        self.inner.lock().len()
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
