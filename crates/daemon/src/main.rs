// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sqsd
//!
//! Pulls jobs from a queue, posts each one to an HTTP worker and deletes
//! the message once the worker accepts it.
//!
//! Architecture:
//! - Supervisor: owns the fetcher, dispatcher and remover pools and drains
//!   them on shutdown
//! - Listener Task: answers monitoring requests over TCP
//! - Signal Task: turns SIGTERM/SIGINT into a drain request

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod lifecycle;
mod listener;

use std::path::PathBuf;

use sqsd_daemon::protocol;
use sqsd_engine::ShutdownHandle;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

use crate::lifecycle::{DaemonConfig, LifecycleError, StartupResult};
use crate::listener::Listener;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Invocation, String> {
    let mut config = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(Invocation::Version),
            "--help" | "-h" | "help" => return Ok(Invocation::Help),
            "--config" | "-c" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return Err(format!("'{arg}' requires a path")),
            },
            _ => match arg.strip_prefix("--config=") {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return Err(format!("unexpected argument '{arg}'")),
            },
        }
    }
    Ok(Invocation::Run { config })
}

fn print_help() {
    println!("sqsd {VERSION}");
    println!("Queue worker daemon - pulls jobs from SQS and posts them to an HTTP worker");
    println!();
    println!("USAGE:");
    println!("    sqsd [--config PATH]");
    println!();
    println!("Settings come from the TOML config file (if any) and are overridden");
    println!("by environment variables such as QUEUE_URL and INVOKER_URL.");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config PATH    Config file (default: $SQSD_CONFIG)");
    println!("    -h, --help           Print help information");
    println!("    -V, --version        Print version information");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match parse_args(std::env::args().skip(1)) {
        Ok(Invocation::Version) => {
            println!("sqsd {VERSION}");
            return Ok(());
        }
        Ok(Invocation::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Invocation::Run { config }) => config.or_else(env::config_path),
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("Usage: sqsd [--config PATH | --help | --version]");
            std::process::exit(2);
        }
    };

    let config = match DaemonConfig::load(config_path.as_deref(), env::lookup) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sqsd: {e}");
            std::process::exit(1);
        }
    };

    let _log_guard = setup_logging(&config)?;
    info!(version = VERSION, "starting sqsd");

    let StartupResult {
        supervisor,
        listener: tcp_listener,
    } = match lifecycle::startup(&config).await {
        Ok(r) => r,
        Err(e) => {
            error!("failed to start: {}", e);
            eprintln!("sqsd: {e}");
            std::process::exit(1);
        }
    };

    spawn_signal_task(supervisor.shutdown_handle())?;
    let listener = tokio::spawn(Listener::new(tcp_listener, supervisor.probe()).run());

    let report = supervisor.run().await?;
    if report.abandoned.is_empty() && report.abandoned_backlog == 0 {
        info!(
            elapsed_ms = report.elapsed.as_millis() as u64,
            succeeded = report.totals.succeeded,
            failed = report.totals.failed,
            "sqsd stopped"
        );
    } else {
        warn!(
            abandoned = report.abandoned.len(),
            abandoned_backlog = report.abandoned_backlog,
            "sqsd stopped with jobs still in flight"
        );
    }

    if let Err(e) = listener.await {
        error!("listener task failed: {}", e);
    }
    Ok(())
}

/// Forward SIGTERM and SIGINT to the supervisor as drain requests.
fn spawn_signal_task(shutdown: ShutdownHandle) -> Result<(), LifecycleError> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
            };
            if shutdown.request() {
                info!("received {}, draining", name);
            } else {
                info!("received {}, drain already in progress", name);
            }
        }
    });
    Ok(())
}

fn setup_logging(
    config: &DaemonConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file_name = path
                .file_name()
                .ok_or_else(|| LifecycleError::LogPath(path.clone()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(config.log_file.is_none()))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
