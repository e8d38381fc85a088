// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitoring protocol between `sqsd` and its clients.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

use serde::{Deserialize, Serialize};
use sqsd_core::{InFlightEntry, Snapshot};
use sqsd_engine::PipelineStatus;

#[path = "protocol_wire.rs"]
mod wire;
pub use wire::{
    decode, encode, read_message, read_request, read_response, write_message, write_request,
    write_response, ProtocolError, DEFAULT_TIMEOUT, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Pipeline state, counters and totals
    Status,

    /// Jobs currently being invoked
    CurrentWorkings,

    /// Begin a graceful drain; same effect as SIGTERM
    Shutdown,
}

/// Response from the daemon to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    Status { status: PipelineStatus },

    Workings {
        taken_at_ms: u64,
        jobs: Vec<WorkingEntry>,
    },

    /// `accepted` is false if a drain was already under way
    ShuttingDown { accepted: bool },

    /// Error response
    Error { message: String },
}

/// One in-flight job as reported to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkingEntry {
    pub id: String,
    pub started_at_ms: u64,
    pub worker: String,
}

impl From<&InFlightEntry> for WorkingEntry {
    fn from(entry: &InFlightEntry) -> Self {
        Self {
            id: entry.job_id.to_string(),
            started_at_ms: entry.started_at_ms,
            worker: entry.worker.to_string(),
        }
    }
}

impl Response {
    pub fn workings(snapshot: &Snapshot) -> Self {
        Response::Workings {
            taken_at_ms: snapshot.taken_at_ms,
            jobs: snapshot.entries().iter().map(WorkingEntry::from).collect(),
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
