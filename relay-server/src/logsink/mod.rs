//! Logging backend client module.
//!
//! This module defines the seam between the request handler and the
//! logging backend:
//! - `LogSink`: the append/flush interface the handler depends on
//! - `HttpLogSink`: the production client speaking the backend's HTTP API
//! - entry and wire types shared by both

pub mod client;
pub mod types;

pub use client::{HttpLogSink, LogSink, SinkError};
pub use types::{LogEntry, Severity};
