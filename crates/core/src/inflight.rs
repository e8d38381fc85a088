// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-flight job records and point-in-time snapshots of them.

use crate::job::{JobId, WorkerId};
use serde::{Deserialize, Serialize};

/// A job a dispatcher worker is currently between receipt and terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlightEntry {
    pub job_id: JobId,
    pub worker: WorkerId,
    pub started_at_ms: u64,
}

impl InFlightEntry {
    pub fn new(job_id: JobId, worker: WorkerId, started_at_ms: u64) -> Self {
        Self {
            job_id,
            worker,
            started_at_ms,
        }
    }

    /// Milliseconds since the entry was created, relative to `now_ms`.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }
}

/// Immutable copy of the in-flight set, ordered oldest first.
///
/// Owned by whoever asked for it; later tracker mutation never touches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub taken_at_ms: u64,
    entries: Vec<InFlightEntry>,
}

impl Snapshot {
    pub fn new(taken_at_ms: u64, mut entries: Vec<InFlightEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.started_at_ms
                .cmp(&b.started_at_ms)
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        Self {
            taken_at_ms,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[InFlightEntry] {
        &self.entries
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.entries.iter().any(|e| e.job_id == job_id)
    }

    pub fn into_entries(self) -> Vec<InFlightEntry> {
        self.entries
    }
}

#[cfg(test)]
#[path = "inflight_tests.rs"]
mod tests;
