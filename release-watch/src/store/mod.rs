//! Seen-release persistence.
//!
//! The set of already-notified release identifiers is the only state that
//! survives a restart. It is stored as JSON:
//!
//! ```json
//! {
//!   "releases": ["1", "2"],
//!   "last_updated": "2024-05-01T12:00:00+00:00"
//! }
//! ```

mod error;

pub use error::StoreError;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Set of release identifiers that have been notified.
pub type SeenSet = BTreeSet<String>;

/// On-disk representation of the seen set.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    releases: SeenSet,
    #[serde(default)]
    last_updated: Option<String>,
}

/// File-backed store for the seen set.
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    /// Creates a store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the seen set.
    ///
    /// Fails open: a missing file yields an empty set, and an unreadable or
    /// corrupt one yields an empty set with a warning.
    #[must_use]
    pub fn load(&self) -> SeenSet {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet, starting empty");
                return SeenSet::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read state file, starting empty");
                return SeenSet::new();
            }
        };

        match serde_json::from_str::<StateFile>(&contents) {
            Ok(state) => state.releases,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse state file, starting empty");
                SeenSet::new()
            }
        }
    }

    /// Persists `seen`, replacing the previous contents atomically.
    ///
    /// The new document is written to a temporary file in the same directory
    /// and renamed over the target, so a crash mid-write leaves the old file
    /// intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written or replaced.
    pub fn persist(&self, seen: &SeenSet) -> Result<(), StoreError> {
        let io_error = |source: std::io::Error| StoreError::IoError {
            path: self.path.display().to_string(),
            source,
        };

        let state = StateFile {
            releases: seen.clone(),
            last_updated: Some(Utc::now().to_rfc3339()),
        };
        let json =
            serde_json::to_string_pretty(&state).map_err(|source| StoreError::SerializeError {
                path: self.path.display().to_string(),
                source,
            })?;

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(directory).map_err(io_error)?;

        let mut file = NamedTempFile::new_in(directory).map_err(io_error)?;
        file.write_all(json.as_bytes()).map_err(io_error)?;
        file.write_all(b"\n").map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(&self.path).map_err(|e| io_error(e.error))?;

        debug!(path = %self.path.display(), count = seen.len(), "Persisted seen releases");
        Ok(())
    }
}
