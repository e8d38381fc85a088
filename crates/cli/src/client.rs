// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the sqsd monitoring port

use std::io::ErrorKind;
use std::time::Duration;

use serde::Serialize;
use sqsd_daemon::protocol::{self, ProtocolError};
use sqsd_daemon::{Request, Response, WorkingEntry};
use sqsd_engine::PipelineStatus;
use thiserror::Error;
use tokio::net::TcpStream;

use crate::env::timeout_ipc;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("sqsd is not running at {0}")]
    DaemonNotRunning(String),

    #[error("timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("daemon error: {0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True when nothing is listening at the address.
    pub fn is_not_running(&self) -> bool {
        matches!(self, ClientError::DaemonNotRunning(_))
    }
}

/// Jobs in flight as reported by the daemon.
#[derive(Debug, Serialize)]
pub struct Workings {
    pub taken_at_ms: u64,
    pub jobs: Vec<WorkingEntry>,
}

pub struct DaemonClient {
    addr: String,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: timeout_ipc(),
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// One request per connection, as the daemon expects.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| ClientError::ConnectTimeout(self.addr.clone()))?
            .map_err(|e| match e.kind() {
                ErrorKind::ConnectionRefused | ErrorKind::NotFound => {
                    ClientError::DaemonNotRunning(self.addr.clone())
                }
                _ => ClientError::Io(e),
            })?;
        let (mut reader, mut writer) = stream.into_split();

        protocol::write_request(&mut writer, request, self.timeout).await?;
        let response = protocol::read_response(&mut reader, self.timeout).await?;
        match response {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            response => Ok(response),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Daemon version string
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello {
            version: protocol::PROTOCOL_VERSION.to_string(),
        };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn status(&self) -> Result<PipelineStatus, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status { status } => Ok(status),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn workings(&self) -> Result<Workings, ClientError> {
        match self.send(&Request::CurrentWorkings).await? {
            Response::Workings { taken_at_ms, jobs } => Ok(Workings { taken_at_ms, jobs }),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Ask the daemon to drain. Returns false if a drain was already running.
    pub async fn shutdown(&self) -> Result<bool, ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::ShuttingDown { accepted } => Ok(accepted),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
