//! Seen-release store error types.

use thiserror::Error;

/// Errors that can occur while persisting the seen set.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while writing or replacing the state file.
    #[error("Failed to write state file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The seen set could not be serialized.
    #[error("Failed to serialize state file '{path}': {source}")]
    SerializeError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
