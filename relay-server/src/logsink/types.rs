//! Log entry and wire types for the logging backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Error,
}

/// A single record destined for a named stream in the logging backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Record severity
    pub severity: Severity,
    /// Full decoded payload, forwarded verbatim
    pub payload: Value,
}

// =============================================================================
// Wire types (backend HTTP API, camelCase field names)
// =============================================================================

/// Request body for the backend's batch write endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    /// Fully qualified stream name, e.g. `projects/{id}/logs/{stream}`
    pub log_name: String,
    /// Resource the entries are attributed to
    pub resource: MonitoredResource,
    /// Entries to append, in order
    pub entries: Vec<WriteEntry>,
}

/// Resource descriptor attached to a write batch.
#[derive(Debug, Serialize)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl MonitoredResource {
    /// Resource descriptor for entries not tied to a specific resource.
    pub fn global() -> Self {
        Self {
            resource_type: "global".to_string(),
        }
    }
}

/// A single entry inside a write batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteEntry {
    pub severity: Severity,
    pub json_payload: Value,
}

impl From<LogEntry> for WriteEntry {
    fn from(entry: LogEntry) -> Self {
        Self {
            severity: entry.severity,
            json_payload: entry.payload,
        }
    }
}
