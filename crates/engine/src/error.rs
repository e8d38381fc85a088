// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the pipeline engine

use crate::MonitorError;
use sqsd_core::ConfigError;
use thiserror::Error;

/// Errors that stop the pipeline from starting or shutting down cleanly.
///
/// Per-job failures never surface here; workers log and absorb them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("monitor unavailable: {0}")]
    Monitor(#[from] MonitorError),
    #[error("pipeline state channel closed")]
    StateClosed,
}
