//! Stream-name routing and severity selection.
//!
//! The payload's reserved `log_name` key picks the target stream; the
//! severity is a naming convention on the resulting stream name, not a
//! payload-declared field.

use serde_json::Value;

use crate::envelope::Payload;
use crate::logsink::Severity;

/// Reserved payload key that selects the target stream.
pub const LOG_NAME_KEY: &str = "log_name";

/// Prefix applied to payload-selected stream names.
pub const STREAM_PREFIX: &str = "demo_";

/// Stream used when the payload does not select one.
pub const DEFAULT_STREAM: &str = "demo_general_log";

/// Derive the target stream name from the payload.
///
/// A non-empty string under `log_name` is prefixed with `demo_`; anything
/// else (absent, empty, null, or a non-string value) routes to the default
/// stream.
pub fn stream_name(payload: &Payload) -> String {
    match payload.get(LOG_NAME_KEY).and_then(Value::as_str) {
        Some(name) if !name.is_empty() => format!("{}{}", STREAM_PREFIX, name),
        _ => DEFAULT_STREAM.to_string(),
    }
}

/// Select the severity for a stream name.
///
/// Streams whose name contains "error" (case-insensitive) log at Error.
pub fn severity_for(stream: &str) -> Severity {
    if stream.to_lowercase().contains("error") {
        Severity::Error
    } else {
        Severity::Info
    }
}
