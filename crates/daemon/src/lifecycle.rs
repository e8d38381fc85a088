// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration and startup.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use sqsd_adapters::{HttpInvoker, QueueError, SqsQueue, TracedInvoker, TracedQueue};
use sqsd_core::config::DEFAULT_INVOKER_TIMEOUT;
use sqsd_core::{ConfigError, PipelineConfig, SystemClock};
use sqsd_engine::{EngineError, Supervisor};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::env;

pub const DEFAULT_MONITORING_HOST: &str = "0.0.0.0";
pub const DEFAULT_MONITORING_PORT: u16 = 6969;
pub const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors that prevent the daemon from starting
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("unknown log level {0:?} (expected trace, debug, info, warn or error)")]
    InvalidLogLevel(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("queue client: {0}")]
    Queue(#[from] QueueError),

    #[error("failed to bind monitoring listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("log file path has no file name: {}", .0.display())]
    LogPath(PathBuf),
}

/// On-disk configuration. Every key is optional; env vars override it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    queue_url: Option<String>,
    invoker_url: Option<String>,
    request_content_type: Option<String>,
    invoker_timeout_secs: Option<u64>,
    visibility_timeout_secs: Option<u64>,
    fetcher_parallel: Option<usize>,
    invoker_parallel: Option<usize>,
    remover_parallel: Option<usize>,
    max_messages_per_request: Option<u32>,
    wait_time_secs: Option<u64>,
    idle_sleep_ms: Option<u64>,
    fetch_retry_delay_ms: Option<u64>,
    drain_poll_interval_ms: Option<u64>,
    drain_timeout_secs: Option<u64>,
    monitoring_port: Option<u16>,
    monitoring_host: Option<String>,
    sqs_endpoint_url: Option<String>,
    aws_region: Option<String>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, LifecycleError> {
        let text = std::fs::read_to_string(path).map_err(|source| LifecycleError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| LifecycleError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<(), LifecycleError> {
        fn parsed<T: FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            name: &'static str,
        ) -> Result<Option<T>, LifecycleError> {
            lookup(name)
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| LifecycleError::InvalidEnv { name, value })
                })
                .transpose()
        }

        macro_rules! overlay {
            ($field:ident, $name:expr) => {
                if let Some(v) = parsed(lookup, $name)? {
                    self.$field = Some(v);
                }
            };
        }

        overlay!(queue_url, env::QUEUE_URL);
        overlay!(invoker_url, env::INVOKER_URL);
        overlay!(request_content_type, env::REQUEST_CONTENT_TYPE);
        overlay!(invoker_timeout_secs, env::INVOKER_TIMEOUT);
        overlay!(visibility_timeout_secs, env::VISIBILITY_TIMEOUT);
        overlay!(fetcher_parallel, env::FETCHER_PARALLEL);
        overlay!(invoker_parallel, env::INVOKER_PARALLEL);
        overlay!(remover_parallel, env::REMOVER_PARALLEL);
        overlay!(max_messages_per_request, env::MAX_MESSAGES);
        overlay!(wait_time_secs, env::WAIT_TIME);
        overlay!(monitoring_port, env::MONITORING_PORT);
        overlay!(sqs_endpoint_url, env::SQS_ENDPOINT_URL);
        overlay!(aws_region, env::AWS_REGION);
        overlay!(log_level, env::LOG_LEVEL);
        overlay!(drain_timeout_secs, env::DRAIN_TIMEOUT);
        Ok(())
    }
}

/// Daemon configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub pipeline: PipelineConfig,
    pub monitoring_host: String,
    pub monitoring_port: u16,
    /// Explicit SQS API endpoint; see [`DaemonConfig::queue_endpoint`]
    pub sqs_endpoint_url: Option<String>,
    pub aws_region: Option<String>,
    pub log_level: String,
    /// Log to this file instead of stdout
    pub log_file: Option<PathBuf>,
}

impl DaemonConfig {
    /// Load from an optional TOML file, overlay environment variables from
    /// `lookup`, fill defaults and validate.
    pub fn load(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, LifecycleError> {
        let mut file = match path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        file.apply_env(&lookup)?;
        Self::from_file(file)
    }

    fn from_file(file: FileConfig) -> Result<Self, LifecycleError> {
        let invoker_timeout = file
            .invoker_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_INVOKER_TIMEOUT);
        let mut pipeline = PipelineConfig::new(
            file.queue_url.unwrap_or_default(),
            file.invoker_url.unwrap_or_default(),
        )
        .with_invoker_timeout(invoker_timeout);

        if let Some(content_type) = file.request_content_type {
            pipeline.content_type = content_type;
        }
        if let Some(secs) = file.visibility_timeout_secs {
            pipeline.visibility_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = file.fetcher_parallel {
            pipeline.fetcher_parallel = n;
        }
        if let Some(n) = file.invoker_parallel {
            pipeline.dispatcher_parallel = n;
        }
        if let Some(n) = file.remover_parallel {
            pipeline.remover_parallel = n;
        }
        if let Some(n) = file.max_messages_per_request {
            pipeline.max_messages = n;
        }
        if let Some(secs) = file.wait_time_secs {
            pipeline.wait_time = Duration::from_secs(secs);
        }
        if let Some(ms) = file.idle_sleep_ms {
            pipeline.idle_sleep = Duration::from_millis(ms);
        }
        if let Some(ms) = file.fetch_retry_delay_ms {
            pipeline.fetch_retry_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.drain_poll_interval_ms {
            pipeline.drain_poll_interval = Duration::from_millis(ms);
        }
        pipeline.drain_timeout = file.drain_timeout_secs.map(Duration::from_secs);
        pipeline.validate()?;

        let log_level = file
            .log_level
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
            .to_ascii_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(LifecycleError::InvalidLogLevel(log_level));
        }

        Ok(Self {
            pipeline,
            monitoring_host: file
                .monitoring_host
                .unwrap_or_else(|| DEFAULT_MONITORING_HOST.to_string()),
            monitoring_port: file.monitoring_port.unwrap_or(DEFAULT_MONITORING_PORT),
            sqs_endpoint_url: file.sqs_endpoint_url,
            aws_region: file.aws_region,
            log_level,
            log_file: file.log_file,
        })
    }

    pub fn monitoring_addr(&self) -> String {
        format!("{}:{}", self.monitoring_host, self.monitoring_port)
    }

    /// Where SQS API calls go: the explicit endpoint, else the queue URL's
    /// own origin (`None`). The region only matters for queue URLs on the
    /// legacy global host, which does not serve the JSON API.
    pub fn queue_endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.sqs_endpoint_url {
            return Some(endpoint.clone());
        }
        match &self.aws_region {
            Some(region) if queue_host(&self.pipeline.queue_url) == LEGACY_SQS_HOST => {
                Some(format!("https://sqs.{region}.amazonaws.com"))
            }
            _ => None,
        }
    }
}

const LEGACY_SQS_HOST: &str = "queue.amazonaws.com";

fn queue_host(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let authority = rest.split('/').next().unwrap_or(rest);
    authority.split(':').next().unwrap_or(authority)
}

/// Everything `main` needs once startup succeeds.
pub struct StartupResult {
    pub supervisor: Supervisor,
    /// Monitoring listener, bound but not yet accepting
    pub listener: TcpListener,
}

/// Build the adapters, bind the monitoring port and start the pipeline.
///
/// The port is bound before any pool starts so a busy port fails fast.
pub async fn startup(config: &DaemonConfig) -> Result<StartupResult, LifecycleError> {
    let queue = TracedQueue::new(SqsQueue::new(
        config.pipeline.queue_url.clone(),
        config.queue_endpoint(),
    )?);
    let invoker = TracedInvoker::new(HttpInvoker::new(
        config.pipeline.invoker_url.clone(),
        config.pipeline.content_type.clone(),
    ));

    let addr = config.monitoring_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| LifecycleError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let supervisor = Supervisor::start(config.pipeline.clone(), queue, invoker, SystemClock)?;
    info!(
        queue_url = %config.pipeline.queue_url,
        invoker_url = %config.pipeline.invoker_url,
        monitoring = %listener.local_addr()?,
        "sqsd started"
    );

    Ok(StartupResult {
        supervisor,
        listener,
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
