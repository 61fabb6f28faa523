//! Versioned wrapper around persisted state.

use super::error::PersistError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Version identifier for the envelope format
pub const ENVELOPE_VERSION: u32 = 1;

/// What actually lands in storage: the state plus enough metadata to
/// reject data written by an incompatible format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<S> {
    /// Envelope format version
    pub version: u32,

    /// Storage key the state was written under
    pub key: String,

    /// When the state was written
    pub saved_at: DateTime<Utc>,

    /// The persisted state
    pub state: S,
}

impl<S> Envelope<S> {
    pub fn new(key: impl Into<String>, state: S) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            key: key.into(),
            saved_at: Utc::now(),
            state,
        }
    }

    /// Reject envelopes from other format versions.
    pub fn validate(self) -> Result<Self, PersistError> {
        if self.version != ENVELOPE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: self.version,
                supported: ENVELOPE_VERSION,
            });
        }
        Ok(self)
    }
}

/// On-disk encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Codec {
    /// Human-readable JSON
    #[default]
    Json,
    /// Compact bincode
    Binary,
}

impl Codec {
    pub fn encode<S: Serialize>(&self, envelope: &Envelope<S>) -> Result<Vec<u8>, PersistError> {
        match self {
            Codec::Json => serde_json::to_vec(envelope)
                .map_err(|e| PersistError::SerializationFailed(e.to_string())),
            Codec::Binary => bincode::serialize(envelope)
                .map_err(|e| PersistError::SerializationFailed(e.to_string())),
        }
    }

    pub fn decode<S: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Envelope<S>, PersistError> {
        let envelope: Envelope<S> = match self {
            Codec::Json => serde_json::from_slice(bytes)
                .map_err(|e| PersistError::DeserializationFailed(e.to_string()))?,
            Codec::Binary => bincode::deserialize(bytes)
                .map_err(|e| PersistError::DeserializationFailed(e.to_string()))?,
        };
        envelope.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        theme: String,
        font_size: u8,
    }

    fn settings() -> Settings {
        Settings {
            theme: "dark".to_string(),
            font_size: 14,
        }
    }

    #[test]
    fn json_envelope_is_readable() {
        let bytes = Codec::Json
            .encode(&Envelope::new("settings", settings()))
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("\"version\":1"));
        assert!(text.contains("\"theme\":\"dark\""));
    }

    #[test]
    fn binary_envelope_decodes() {
        let bytes = Codec::Binary
            .encode(&Envelope::new("settings", settings()))
            .unwrap();
        let envelope: Envelope<Settings> = Codec::Binary.decode(&bytes).unwrap();

        assert_eq!(envelope.state, settings());
        assert_eq!(envelope.key, "settings");
    }

    #[test]
    fn future_version_is_rejected() {
        let mut envelope = Envelope::new("settings", settings());
        envelope.version = ENVELOPE_VERSION + 1;
        let bytes = Codec::Json.encode(&envelope).unwrap();

        let result: Result<Envelope<Settings>, _> = Codec::Json.decode(&bytes);

        assert!(matches!(
            result,
            Err(PersistError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn garbage_fails_to_decode() {
        let result: Result<Envelope<Settings>, _> = Codec::Json.decode(b"not json");
        assert!(matches!(result, Err(PersistError::DeserializationFailed(_))));
    }
}
