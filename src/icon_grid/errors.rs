use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the icon grid layout store.
///
/// Misuse of the public API (unknown ids, unknown target folders) is a
/// silent no-op by contract and never reaches this type; only environment
/// failures around the persisted setting do.
#[derive(Debug, Error)]
pub enum IconGridError {
    #[error("Persistence error during operation '{operation}' on {path:?}: {message}")]
    Persistence {
        operation: String,
        path: PathBuf,
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("Failed to serialize icon grid layout: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Failed to deserialize icon grid layout: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl IconGridError {
    pub fn persistence(
        operation: &str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        IconGridError::Persistence {
            operation: operation.to_string(),
            path: path.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }
}
