// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Amazon SQS JSON-protocol client.
//!
//! Speaks `AmazonSQS.ReceiveMessage` / `AmazonSQS.DeleteMessage` over plain
//! HTTP POST. Requests are not SigV4-signed, so this targets SQS-compatible
//! endpoints that accept unsigned calls (ElasticMQ, LocalStack, proxies that
//! sign on the way out).

use super::{QueueAdapter, QueueError, ReceiveRequest, ReceivedMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqsd_core::{DeliveryHandle, JobId};
use std::time::Duration;

const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
const TARGET_RECEIVE: &str = "AmazonSQS.ReceiveMessage";
const TARGET_DELETE: &str = "AmazonSQS.DeleteMessage";

/// Slack on top of the long-poll wait before the HTTP call itself times out.
const REQUEST_SLACK: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct SqsQueue {
    client: reqwest::Client,
    endpoint: String,
    queue_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ReceiveBody<'a> {
    queue_url: &'a str,
    max_number_of_messages: u32,
    wait_time_seconds: u64,
    visibility_timeout: u64,
    message_system_attribute_names: [&'static str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteBody<'a> {
    queue_url: &'a str,
    receipt_handle: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct ReceiveResponse {
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireMessage {
    message_id: String,
    receipt_handle: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    attributes: WireAttributes,
}

#[derive(Deserialize, Default)]
struct WireAttributes {
    #[serde(rename = "ApproximateReceiveCount")]
    approximate_receive_count: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireError {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(default, alias = "Message")]
    message: String,
}

impl SqsQueue {
    /// `endpoint` overrides where requests are sent; without it the origin of
    /// `queue_url` is used.
    pub fn new(queue_url: impl Into<String>, endpoint: Option<String>) -> Result<Self, QueueError> {
        let queue_url = queue_url.into();
        let endpoint = match endpoint.filter(|e| !e.trim().is_empty()) {
            Some(endpoint) => endpoint,
            None => origin_of(&queue_url)
                .ok_or_else(|| QueueError::Transport(format!("no origin in {queue_url}")))?,
        };
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| QueueError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            queue_url,
        })
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    async fn call<B: Serialize>(
        &self,
        target: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Vec<u8>, QueueError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Amz-Target", target)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err: WireError = serde_json::from_slice(&bytes).unwrap_or_default();
            let message = match (err.kind.is_empty(), err.message.is_empty()) {
                (true, true) => String::from_utf8_lossy(&bytes).into_owned(),
                (false, true) => err.kind,
                (true, false) => err.message,
                (false, false) => format!("{}: {}", err.kind, err.message),
            };
            return Err(QueueError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl QueueAdapter for SqsQueue {
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>, QueueError> {
        let body = ReceiveBody {
            queue_url: &self.queue_url,
            max_number_of_messages: request.max_messages,
            wait_time_seconds: whole_secs(request.wait_time),
            visibility_timeout: whole_secs(request.visibility_timeout),
            message_system_attribute_names: ["ApproximateReceiveCount"],
        };
        let raw = self
            .call(
                TARGET_RECEIVE,
                &body,
                request.wait_time.saturating_add(REQUEST_SLACK),
            )
            .await?;
        let parsed: ReceiveResponse = if raw.iter().all(u8::is_ascii_whitespace) {
            ReceiveResponse::default()
        } else {
            serde_json::from_slice(&raw).map_err(|e| QueueError::Decode(e.to_string()))?
        };

        Ok(parsed
            .messages
            .into_iter()
            .map(|m| ReceivedMessage {
                id: JobId::new(m.message_id),
                handle: DeliveryHandle::new(m.receipt_handle),
                body: m.body,
                receive_count: m
                    .attributes
                    .approximate_receive_count
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(1),
            })
            .collect())
    }

    async fn delete(&self, handle: &DeliveryHandle) -> Result<(), QueueError> {
        let body = DeleteBody {
            queue_url: &self.queue_url,
            receipt_handle: handle.as_str(),
        };
        match self.call(TARGET_DELETE, &body, REQUEST_SLACK).await {
            Ok(_) => Ok(()),
            Err(QueueError::Rejected { message, .. }) if message.contains("ReceiptHandleIsInvalid") => {
                Err(QueueError::InvalidHandle(handle.clone()))
            }
            Err(e) => Err(e),
        }
    }
}

/// `scheme://host[:port]` of an http(s) URL.
/// The API takes whole seconds; round up so a visibility timeout never
/// shrinks below what was asked for.
fn whole_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    if scheme != "http" && scheme != "https" {
        return None;
    }
    let authority = rest.split('/').next().filter(|a| !a.is_empty())?;
    Some(format!("{scheme}://{authority}"))
}

#[cfg(test)]
#[path = "sqs_tests.rs"]
mod tests;
