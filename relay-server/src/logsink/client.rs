//! Logging backend client: the `LogSink` seam and its HTTP implementation.
//!
//! The handler only ever sees `Arc<dyn LogSink>`, built once at startup.
//! The production implementation buffers entries per stream and delivers
//! a buffered batch on flush; tests substitute an in-memory sink.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

use super::types::{LogEntry, MonitoredResource, WriteEntry, WriteRequest};
use crate::config::Config;

/// Errors surfaced by a logging backend client.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("logging backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("logging backend rejected batch with status {0}")]
    Backend(StatusCode),

    #[error("invalid logging backend endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Append/flush interface to the logging backend.
///
/// Implementations must be safe to share across concurrent requests; the
/// handler never mutates the sink handle itself.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Buffer an entry under a named stream.
    async fn append(&self, stream: &str, entry: LogEntry) -> Result<(), SinkError>;

    /// Deliver all buffered entries for a stream.
    async fn flush(&self, stream: &str) -> Result<(), SinkError>;

    /// Deliver all buffered entries for every stream (shutdown drain).
    async fn flush_all(&self) -> Result<(), SinkError>;
}

/// HTTP client for the logging backend with per-stream buffering.
///
/// The sink maintains one entry buffer per stream name; `flush` drains the
/// buffer for a stream and POSTs it as a single batch to the backend's
/// write endpoint. A failed batch is dropped, not retried.
#[derive(Clone)]
pub struct HttpLogSink {
    inner: Arc<HttpLogSinkInner>,
}

struct HttpLogSinkInner {
    http: reqwest::Client,
    write_url: Url,
    project_id: String,
    api_token: Option<String>,
    buffers: Mutex<HashMap<String, Vec<LogEntry>>>,
}

impl HttpLogSink {
    /// Create a new sink from the application configuration.
    pub fn new(config: &Config) -> Result<Self, SinkError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let write_url = config.log_endpoint.join("v2/entries:write")?;

        Ok(Self {
            inner: Arc::new(HttpLogSinkInner {
                http,
                write_url,
                project_id: config.project_id.clone(),
                api_token: config.log_api_token.clone(),
                buffers: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// POST one batch of entries for a stream to the backend.
    async fn write_batch(&self, stream: &str, entries: Vec<LogEntry>) -> Result<(), SinkError> {
        let entry_count = entries.len();

        let body = WriteRequest {
            log_name: format!("projects/{}/logs/{}", self.inner.project_id, stream),
            resource: MonitoredResource::global(),
            entries: entries.into_iter().map(WriteEntry::from).collect(),
        };

        let mut request = self.inner.http.post(self.inner.write_url.clone()).json(&body);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Backend(status));
        }

        info!(
            stream = stream,
            entries = entry_count,
            status = status.as_u16(),
            "logsink_batch_written"
        );

        Ok(())
    }

    #[cfg(test)]
    async fn pending(&self, stream: &str) -> usize {
        self.inner
            .buffers
            .lock()
            .await
            .get(stream)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl LogSink for HttpLogSink {
    async fn append(&self, stream: &str, entry: LogEntry) -> Result<(), SinkError> {
        let mut buffers = self.inner.buffers.lock().await;
        buffers.entry(stream.to_string()).or_default().push(entry);
        Ok(())
    }

    async fn flush(&self, stream: &str) -> Result<(), SinkError> {
        let entries = {
            let mut buffers = self.inner.buffers.lock().await;
            buffers.remove(stream)
        };

        match entries {
            Some(entries) if !entries.is_empty() => self.write_batch(stream, entries).await,
            _ => Ok(()),
        }
    }

    async fn flush_all(&self) -> Result<(), SinkError> {
        let drained: Vec<(String, Vec<LogEntry>)> = {
            let mut buffers = self.inner.buffers.lock().await;
            buffers.drain().collect()
        };

        // Every stream gets a delivery attempt; one failing stream must
        // not abandon the rest of the drain.
        let mut first_error = None;
        for (stream, entries) in drained {
            if entries.is_empty() {
                continue;
            }
            if let Err(e) = self.write_batch(&stream, entries).await {
                warn!(stream = %stream, error = %e, "logsink_drain_batch_failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
