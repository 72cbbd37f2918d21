//! Request Executor
//!
//! The single chokepoint between the entity model and the remote service.
//! Every query goes through [`RequestExecutor::execute`], which classifies
//! the response and keeps resubmitting until it gets a definitive answer:
//!
//! - A rate-limit error blocks the calling task for the advertised cool-down
//!   and resubmits. Only the calling task sleeps, never the process, and
//!   there is no retry ceiling.
//! - Any other error message is appended to the error sink and the query is
//!   resubmitted as well; a permanently malformed query therefore retries
//!   forever. Accepted trade-off, observable through the sink.
//! - Mutations are retried like reads. They may execute more than once
//!   remotely; callers needing exactly-once semantics dedupe by remote id.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use log::{debug, error, info, warn};
use serde_json::Value;
use url::Url;

use crate::common::errors::{Result, SyncError};
use crate::domain::remote::Remote;
use crate::infrastructure::web::transport::Transport;

const RATE_LIMIT_PATTERN: &str = "Complexity budget exhausted";
const RESET_PATTERN: &str = "reset in ";
const DEFAULT_COOL_DOWN: Duration = Duration::from_secs(5);

/// Injectable sleep so retry behavior is testable without real delays.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Append-only side channel for unrecognized remote error messages.
pub trait ErrorSink: Send + Sync {
    fn record(&self, message: &str);
}

/// Appends timestamped lines to a plain text file, one message per line.
pub struct FileErrorSink {
    path: PathBuf,
}

impl FileErrorSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ErrorSink for FileErrorSink {
    fn record(&self, message: &str) {
        let line = format!("{} {}\n", Local::now().to_rfc3339(), message);
        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = appended {
            error!("failed to append to error log {}: {}", self.path.display(), e);
        }
    }
}

/// Extract the advertised cool-down from a rate-limit message.
///
/// The service phrases it as `... reset in N seconds`; the first character
/// after the marker is taken, plus one second of margin (the service
/// sometimes advertises 0). Unparseable messages fall back to 5 seconds.
pub(crate) fn cool_down(message: &str) -> Duration {
    if let Some(tail) = message.split(RESET_PATTERN).nth(1) {
        if let Some(first) = tail.chars().next() {
            if let Some(digit) = first.to_digit(10) {
                return Duration::from_secs(u64::from(digit) + 1);
            }
        }
    }
    DEFAULT_COOL_DOWN
}

pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    api_url: Url,
    file_url: Url,
    echo_protocol: bool,
    error_sink: Arc<dyn ErrorSink>,
    sleeper: Arc<dyn Sleeper>,
}

impl RequestExecutor {
    pub fn new(
        transport: Arc<dyn Transport>,
        api_url: Url,
        file_url: Url,
        echo_protocol: bool,
        error_sink: Arc<dyn ErrorSink>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            transport,
            api_url,
            file_url,
            echo_protocol,
            error_sink,
            sleeper,
        }
    }

    pub async fn execute(&self, query: &str) -> Result<Value> {
        loop {
            self.echo_outgoing(query);
            let raw = self.transport.send(&self.api_url, query).await?;
            if let Some(data) = self.settle(&raw, query).await? {
                return Ok(data);
            }
        }
    }

    pub async fn execute_file(&self, query: &str, file_path: &Path) -> Result<Value> {
        loop {
            self.echo_outgoing(query);
            let raw = self
                .transport
                .send_file(&self.file_url, query, file_path)
                .await?;
            if let Some(data) = self.settle(&raw, query).await? {
                return Ok(data);
            }
        }
    }

    fn echo_outgoing(&self, query: &str) {
        if self.echo_protocol {
            info!("sending: {}", query);
        } else {
            debug!("sending: {}", query);
        }
    }

    /// Classify one response. `Ok(Some(data))` is a definitive answer,
    /// `Ok(None)` asks the caller to resubmit, `Err` is terminal.
    async fn settle(&self, raw: &str, query: &str) -> Result<Option<Value>> {
        let response: Value =
            serde_json::from_str(raw).map_err(|e| SyncError::MalformedResponse {
                detail: format!("response is not valid JSON: {}", e),
            })?;

        if let Some(errors) = response.get("errors").and_then(Value::as_array) {
            for error in errors {
                let Some(message) = error.get("message").and_then(Value::as_str) else {
                    continue;
                };
                if message.contains(RATE_LIMIT_PATTERN) {
                    let wait = cool_down(message);
                    warn!(
                        "complexity budget exhausted, backing off for {}s",
                        wait.as_secs()
                    );
                    self.sleeper.sleep(wait).await;
                    return Ok(None);
                }
                // Unrecognized error: keep it for later inspection, then
                // resubmit on the optimistic assumption it is transient.
                self.error_sink.record(message);
            }
            return Ok(None);
        }

        match response.get("data") {
            Some(data) if !data.is_null() => {
                if self.echo_protocol {
                    info!("received: {}", data);
                }
                Ok(Some(data.clone()))
            }
            _ => {
                error!("response carried neither errors nor data for query: {}", query);
                Err(SyncError::MissingData {
                    query: query.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl Remote for RequestExecutor {
    async fn execute(&self, query: &str) -> Result<Value> {
        RequestExecutor::execute(self, query).await
    }

    async fn execute_file(&self, query: &str, file_path: &Path) -> Result<Value> {
        RequestExecutor::execute_file(self, query, file_path).await
    }
}
