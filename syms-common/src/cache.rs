// syms-common/src/cache.rs
// Persisted record of the build whose symbols a directory holds.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{Result, SymsError};
use crate::model::BuildParameters;

pub const CACHE_MARKER_FILENAME: &str = ".cached_build_params";

/// The `.cached_build_params` file inside a symbols directory.
///
/// The marker is the only signal of cache validity: if it exists and equals
/// the current build parameters, the directory contents are trusted as-is.
#[derive(Debug, Clone)]
pub struct CacheMarker {
    path: PathBuf,
}

impl CacheMarker {
    pub fn for_directory(symbols_dir: &Path) -> Self {
        Self {
            path: symbols_dir.join(CACHE_MARKER_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted parameters. Missing, unreadable or malformed
    /// markers all read as `None`.
    pub fn read(&self) -> Option<BuildParameters> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("No readable cache marker at {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(params) => Some(params),
            Err(e) => {
                tracing::debug!(
                    "Ignoring malformed cache marker {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn matches(&self, current: &BuildParameters) -> bool {
        self.read().is_some_and(|cached| &cached == current)
    }

    /// Overwrites the marker with `params`. Plain write, no rename.
    pub fn write(&self, params: &BuildParameters) -> Result<()> {
        let data = serde_json::to_string(params)?;
        tracing::debug!("Writing cache marker {}: {}", self.path.display(), data);
        fs::write(&self.path, data).map_err(|e| {
            SymsError::Cache(format!(
                "Failed to write cache marker {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Returns true iff the marker at `marker_path` records exactly `current`.
pub fn is_cache_valid(marker_path: &Path, current: &BuildParameters) -> bool {
    CacheMarker {
        path: marker_path.to_path_buf(),
    }
    .matches(current)
}
