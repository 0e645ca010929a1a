//! Push envelope types for the Pub/Sub delivery wrapper.
//!
//! Push subscriptions POST a JSON envelope whose `message.data` field is a
//! base64-encoded byte sequence. The decoded bytes are expected to hold a
//! JSON object describing the event to be logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded inner payload: an open-ended JSON object.
pub type Payload = serde_json::Map<String, Value>;

/// Outer JSON wrapper delivered by the push subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope {
    /// The delivered message
    pub message: PushMessage,
    /// Subscription path, passed through without validation
    #[serde(default)]
    pub subscription: String,
}

/// A single delivered message inside the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Message body, base64-encoded on the wire
    #[serde(default, with = "base64_bytes")]
    pub data: Vec<u8>,
    /// Delivery identifier, passed through without validation
    #[serde(default)]
    pub id: String,
}

impl PushEnvelope {
    /// Parse the decoded message bytes as a JSON object.
    ///
    /// Fails when the bytes are empty, not JSON, or JSON but not an object.
    pub fn decode_payload(&self) -> Result<Payload, serde_json::Error> {
        serde_json::from_slice(&self.message.data)
    }
}

/// Serde adapter for base64 string <-> byte vector fields.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        STANDARD.decode(raw).map_err(serde::de::Error::custom)
    }
}
