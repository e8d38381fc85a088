// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitoring listener.
//!
//! Accepts TCP connections and answers one request per connection from the
//! pipeline probe. Stops accepting once the pipeline reaches `Stopped`.

use sqsd_engine::{PipelineProbe, PipelineState};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

pub struct Listener {
    socket: TcpListener,
    probe: PipelineProbe,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl Listener {
    pub fn new(socket: TcpListener, probe: PipelineProbe) -> Self {
        Self { socket, probe }
    }

    /// Accept connections until the pipeline stops.
    pub async fn run(self) {
        let mut state = self.probe.shutdown().subscribe();
        loop {
            if *state.borrow_and_update() == PipelineState::Stopped {
                break;
            }
            tokio::select! {
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                accepted = self.socket.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let probe = self.probe.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, probe).await {
                                match e {
                                    ConnectionError::Protocol(
                                        protocol::ProtocolError::ConnectionClosed,
                                    ) => debug!(%peer, "client disconnected"),
                                    ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
                                        warn!(%peer, "connection timeout")
                                    }
                                    _ => error!(%peer, "connection error: {}", e),
                                }
                            }
                        });
                    }
                    Err(e) => error!("accept error: {}", e),
                },
            }
        }
        debug!("monitoring listener closed");
    }
}

async fn handle_connection(stream: TcpStream, probe: PipelineProbe) -> Result<(), ConnectionError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await?;
    if matches!(request, Request::Shutdown) {
        info!(request = ?request, "received request");
    } else {
        debug!(request = ?request, "received request");
    }

    let response = handle_request(request, &probe).await;
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

pub(crate) async fn handle_request(request: Request, probe: &PipelineProbe) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Status => match probe.status().await {
            Ok(status) => Response::Status { status },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::CurrentWorkings => match probe.current_workings().await {
            Ok(snapshot) => Response::workings(&snapshot),
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::Shutdown => {
            let accepted = probe.shutdown().request();
            if accepted {
                info!("drain requested by monitoring client");
            }
            Response::ShuttingDown { accepted }
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
