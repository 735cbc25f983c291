// syms-core/src/fetch.rs
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use syms_common::error::{Result, SymsError};
use syms_net::ArtifactStore;
use tracing::debug;

/// Tries an ordered list of candidate targets against the artifact store.
#[derive(Clone)]
pub struct ArtifactFetcher {
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactFetcher {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Empties `dest_dir`, then asks the store for `remote_file_name` under
    /// each candidate in turn until `dest_archive_path` exists.
    ///
    /// Every file previously in `dest_dir` is discarded before the first
    /// request, whatever the outcome. A miss under all candidates returns
    /// `Ok(())`; callers check for `dest_archive_path` themselves. Store
    /// errors are returned as-is without trying further candidates.
    pub fn fetch_if_needed(
        &self,
        build_id: &str,
        dest_dir: &Path,
        dest_archive_path: &Path,
        candidates: &[String],
        remote_file_name: &str,
        local_name_override: Option<&str>,
    ) -> Result<()> {
        recreate_directory(dest_dir)?;

        for candidate in candidates {
            debug!(
                "Requesting {} for build {} under {}",
                remote_file_name, build_id, candidate
            );
            self.store.fetch(
                build_id,
                candidate,
                remote_file_name,
                dest_dir,
                local_name_override,
            )?;
            if dest_archive_path.exists() {
                debug!(
                    "Fetched {} using candidate {}",
                    dest_archive_path.display(),
                    candidate
                );
                break;
            }
        }
        Ok(())
    }
}

fn recreate_directory(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => debug!("Removed existing directory {}", dir.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(SymsError::IoError(format!(
                "Failed to remove directory {}: {}",
                dir.display(),
                e
            )))
        }
    }
    fs::create_dir_all(dir).map_err(|e| {
        SymsError::IoError(format!(
            "Failed to create directory {}: {}",
            dir.display(),
            e
        ))
    })
}
