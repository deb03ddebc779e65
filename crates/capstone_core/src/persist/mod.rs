//! Versioned JSON persistence for dashboard state.
//!
//! # Responsibility
//! - Wrap every persisted value in a `{"version", "data"}` envelope.
//! - Migrate older payloads (including unversioned legacy values) on load.
//!
//! # Invariants
//! - Payloads newer than `PAYLOAD_VERSION` are rejected, never guessed at.
//! - Decoding never silently drops a malformed value.

use crate::repo::kv_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod envelope;

pub use envelope::{read_payload, write_payload, PayloadKind, PAYLOAD_VERSION};

pub type PersistResult<T> = Result<T, PersistError>;

#[derive(Debug)]
pub enum PersistError {
    /// Underlying key-value storage failed.
    Repo(RepoError),
    /// In-memory state could not be serialized.
    Encode {
        key: String,
        source: serde_json::Error,
    },
    /// Stored value is not valid JSON or does not match the expected shape.
    Decode {
        key: String,
        source: serde_json::Error,
    },
    /// Envelope is structurally broken (e.g. non-integer `version`).
    InvalidEnvelope { key: String, message: String },
    UnsupportedPayloadVersion {
        key: String,
        stored_version: u32,
        latest_supported: u32,
    },
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Decode { key, source } => write!(f, "failed to decode `{key}`: {source}"),
            Self::InvalidEnvelope { key, message } => {
                write!(f, "invalid envelope for `{key}`: {message}")
            }
            Self::UnsupportedPayloadVersion {
                key,
                stored_version,
                latest_supported,
            } => write!(
                f,
                "`{key}` payload version {stored_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
            Self::InvalidEnvelope { .. } | Self::UnsupportedPayloadVersion { .. } => None,
        }
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
