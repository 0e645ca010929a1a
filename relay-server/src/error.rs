//! Request-scoped error types and their HTTP status mapping.
//!
//! Every failure here is scoped to a single request: a malformed envelope
//! or payload answers 400, a backend write failure answers 500, and the
//! process keeps serving either way.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::logsink::SinkError;

/// Failures the push handler can produce.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Outer JSON body did not parse as a push envelope
    #[error("malformed push envelope: {0}")]
    BadEnvelope(#[source] serde_json::Error),

    /// Decoded message bytes did not parse as a JSON object
    #[error("malformed message payload: {0}")]
    BadPayload(#[source] serde_json::Error),

    /// Logging backend rejected or failed the write
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::BadEnvelope(e) => {
                warn!(error = %e, "envelope_decode_failed");
                StatusCode::BAD_REQUEST
            }
            RelayError::BadPayload(e) => {
                warn!(error = %e, "payload_decode_failed");
                StatusCode::BAD_REQUEST
            }
            RelayError::Sink(e) => {
                error!(error = %e, "logsink_write_failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        status.into_response()
    }
}
