// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sqsctl - monitoring client for sqsd

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod color;
mod commands;
mod env;
mod output;
mod table;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use commands::{shutdown, status, workings};
use output::OutputFormat;

use crate::client::DaemonClient;

#[derive(Parser)]
#[command(
    name = "sqsctl",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Inspect and control a running sqsd",
    styles = color::styles(),
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    /// Monitoring address of the daemon [default: $SQSD_ADDR or 127.0.0.1:6969]
    #[arg(short = 'a', long = "addr", global = true)]
    addr: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pipeline state, in-flight count and totals
    Status,
    /// Jobs currently being invoked
    Workings,
    /// Start a graceful drain (same as SIGTERM)
    Shutdown(shutdown::ShutdownArgs),
    /// Check that the daemon answers
    Ping,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", format_error(&e));
        std::process::exit(1);
    }
}

/// Format an anyhow error, skipping the "Caused by" chain when the top-level
/// message already contains every cause.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let client = DaemonClient::new(cli.addr.unwrap_or_else(env::daemon_addr));
    match command {
        Commands::Status => status::handle(&client, format).await?,
        Commands::Workings => workings::handle(&client, format).await?,
        Commands::Shutdown(args) => shutdown::handle(args, &client, format).await?,
        Commands::Ping => {
            client.ping().await?;
            match format {
                OutputFormat::Text => println!("pong"),
                OutputFormat::Json => output::print_json(&serde_json::json!({ "ok": true }))?,
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
