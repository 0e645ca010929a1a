//! LogRelay - Pub/Sub push receiver for a structured logging backend.
//!
//! This library backs the `logrelay-server` binary: a thin web server that
//! receives push deliveries from a Pub/Sub subscription, decodes the
//! embedded event payload, and forwards it to a centralized logging
//! backend under a payload-derived stream name.
//!
//! ## Architecture
//!
//! ```text
//! Pub/Sub push → Web Server → decode envelope → route stream → LogSink
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod logsink;
pub mod route;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use envelope::{Payload, PushEnvelope, PushMessage};
pub use error::RelayError;
pub use logsink::{HttpLogSink, LogEntry, LogSink, Severity, SinkError};
pub use route::{severity_for, stream_name, DEFAULT_STREAM, STREAM_PREFIX};
pub use web::AppState;
