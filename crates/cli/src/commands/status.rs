// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sqsctl status`

use anyhow::{anyhow, Result};
use sqsd_engine::PipelineStatus;

use crate::client::DaemonClient;
use crate::color;
use crate::output::{format_uptime, print_json, OutputFormat};

pub async fn handle(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let status = match client.status().await {
        Ok(status) => status,
        Err(e) if e.is_not_running() => {
            match format {
                OutputFormat::Text => println!("sqsd not running at {}", client.addr()),
                OutputFormat::Json => print_json(&serde_json::json!({ "state": "not_running" }))?,
            }
            return Ok(());
        }
        Err(e) => return Err(anyhow!("{}", e)),
    };
    let version = client
        .hello()
        .await
        .unwrap_or_else(|_| "unknown".to_string());

    match format {
        OutputFormat::Text => print!("{}", render(&status, &version)),
        OutputFormat::Json => print_json(&to_json(&status, &version))?,
    }
    Ok(())
}

pub(crate) fn render(status: &PipelineStatus, version: &str) -> String {
    let totals = &status.totals;
    let mut out = String::new();
    out.push_str(&format!(
        "Status: {}\n",
        color::status(&status.state.to_string())
    ));
    out.push_str(&format!("Version: {version}\n"));
    out.push_str(&format!("Uptime: {}\n", format_uptime(status.uptime_secs)));
    out.push_str(&format!(
        "In flight: {}/{} ({} waiting)\n",
        status.in_flight, status.dispatcher_parallel, status.backlog
    ));
    out.push_str(&format!(
        "Jobs: {} received, {} succeeded, {} failed\n",
        totals.received, totals.succeeded, totals.failed
    ));
    out.push_str(&format!("Deleted: {}", totals.deleted));
    if totals.delete_failed > 0 {
        out.push_str(&format!(" ({} failed)", totals.delete_failed));
    }
    out.push('\n');
    out
}

pub(crate) fn to_json(status: &PipelineStatus, version: &str) -> serde_json::Value {
    serde_json::json!({
        "state": status.state,
        "version": version,
        "uptime_secs": status.uptime_secs,
        "uptime": format_uptime(status.uptime_secs),
        "in_flight": status.in_flight,
        "dispatcher_parallel": status.dispatcher_parallel,
        "backlog": status.backlog,
        "totals": status.totals,
    })
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
