// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sqsctl shutdown`: request a graceful drain

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;

use crate::client::DaemonClient;
use crate::env::poll_interval;
use crate::output::{print_json, OutputFormat};

#[derive(Args, Debug)]
pub struct ShutdownArgs {
    /// Block until the daemon has finished draining and exited
    #[arg(long)]
    pub wait: bool,

    /// Give up waiting after this many seconds
    #[arg(long, default_value_t = 300, requires = "wait")]
    pub timeout: u64,
}

pub async fn handle(args: ShutdownArgs, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let accepted = client.shutdown().await?;
    if let OutputFormat::Text = format {
        if accepted {
            println!("Drain requested");
        } else {
            println!("Drain already in progress");
        }
    }

    let stopped = if args.wait {
        let stopped = wait_for_exit(client, Duration::from_secs(args.timeout), poll_interval()).await;
        if !stopped {
            bail!("sqsd still draining after {}s", args.timeout);
        }
        if let OutputFormat::Text = format {
            println!("sqsd stopped");
        }
        true
    } else {
        false
    };

    if let OutputFormat::Json = format {
        print_json(&serde_json::json!({ "accepted": accepted, "stopped": stopped }))?;
    }
    Ok(())
}

/// Poll until nothing answers at the client's address.
pub(crate) async fn wait_for_exit(client: &DaemonClient, timeout: Duration, interval: Duration) -> bool {
    let start = Instant::now();
    loop {
        match client.ping().await {
            Err(e) if e.is_not_running() => return true,
            _ if start.elapsed() >= timeout => return false,
            _ => tokio::time::sleep(interval).await,
        }
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
