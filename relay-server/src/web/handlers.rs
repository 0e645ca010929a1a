//! Push endpoint handlers.
//!
//! The push handler does the whole job of this service:
//! 1. Decode the push envelope from the request body
//! 2. Decode the embedded JSON payload
//! 3. Route to a stream name and pick a severity
//! 4. Append the record to the logging backend and flush the stream
//!
//! Each request is independent; the only shared object is the sink handle.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::envelope::PushEnvelope;
use crate::error::RelayError;
use crate::logsink::{LogEntry, LogSink};
use crate::route::{severity_for, stream_name};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sink: Arc<dyn LogSink>,
}

impl AppState {
    pub fn new(config: Config, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config: Arc::new(config),
            sink,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Pub/Sub Push
// =============================================================================

/// Push delivery endpoint.
///
/// The push subscription treats any 2xx as an ack and anything else as a
/// redelivery request; this handler never retries on its own.
pub async fn pubsub_push(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, RelayError> {
    let envelope: PushEnvelope =
        serde_json::from_slice(&body).map_err(RelayError::BadEnvelope)?;

    info!(
        message_id = %envelope.message.id,
        subscription = %envelope.subscription,
        data_length = envelope.message.data.len(),
        "push_received"
    );

    let payload = envelope.decode_payload().map_err(RelayError::BadPayload)?;

    let stream = stream_name(&payload);
    let severity = severity_for(&stream);

    let entry = LogEntry {
        severity,
        payload: Value::Object(payload),
    };

    // Flush runs even when the append fails, so no entry for this stream
    // is left buffered past the request.
    let appended = state.sink.append(&stream, entry).await;
    let flushed = state.sink.flush(&stream).await;
    appended.and(flushed)?;

    info!(
        message_id = %envelope.message.id,
        stream = %stream,
        severity = ?severity,
        "push_forwarded"
    );

    Ok(StatusCode::OK)
}
