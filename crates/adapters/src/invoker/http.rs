// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP worker endpoint.
//!
//! Each job is POSTed as-is to the worker URL. Any 2xx response counts as
//! success; everything else, including a timeout, is a failure.

use super::{InvokeError, InvokerAdapter};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use sqsd_core::Job;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpInvoker {
    client: reqwest::Client,
    url: String,
    content_type: String,
}

impl HttpInvoker {
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InvokerAdapter for HttpInvoker {
    async fn invoke(&self, job: &Job, timeout: Duration) -> Result<(), InvokeError> {
        if timeout.is_zero() {
            return Err(InvokeError::Timeout(timeout));
        }
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, &self.content_type)
            .body(job.payload.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InvokeError::Timeout(timeout)
                } else {
                    InvokeError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(InvokeError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
