// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sqsd pipeline engine: fetch, dispatch, track, remove, drain

mod dispatcher;
mod error;
mod fetcher;
mod monitor;
mod remover;
mod stats;
mod supervisor;
mod tracker;

#[cfg(test)]
mod test_helpers;

pub use dispatcher::{DispatchIntake, Dispatcher};
pub use error::EngineError;
pub use fetcher::{FetchSettings, FetcherPool};
pub use monitor::{Monitor, MonitorError};
pub use remover::{RemoverHandle, RemoverPool};
pub use stats::{PipelineStats, StatsSnapshot};
pub use supervisor::{
    DrainReport, PipelineProbe, PipelineState, PipelineStatus, ShutdownHandle, Supervisor,
};
pub use tracker::{JobTracker, TrackerError};
