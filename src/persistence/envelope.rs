//! Versioned document envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Wrapper around every stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub data: Value,
}

impl Envelope {
    pub fn wrap(data: Value) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            data,
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and check the format version
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let envelope: Envelope = serde_json::from_str(json)?;
        if envelope.version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: envelope.version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(envelope)
    }
}
