// syms-core/src/symbols/system.rs
use std::fs;
use std::path::Path;

use syms_common::cache::CacheMarker;
use syms_common::error::{Result, SymsError};
use syms_common::model::{BuildParameters, DownloadPolicy, RefreshOutcome};
use tracing::{debug, error, info};

use super::SymbolCacheManager;

pub(super) fn system_symbols_archive_filename(build_id: &str, target: &str) -> String {
    format!("{target}-symbols-{build_id}.zip")
}

impl SymbolCacheManager {
    fn qualified_build_type(&self, build_type: &str) -> String {
        match &self.release_configuration {
            Some(release) => format!("{release}-{build_type}"),
            None => build_type.to_string(),
        }
    }

    /// Artifact target carrying the symbols: `{target}-{type}`, with the
    /// sanitizer appended unless the name already mentions it.
    pub(super) fn system_symbols_candidate(&self, target: &str, build_type: &str) -> String {
        let mut candidate = format!("{target}-{build_type}");
        if let Some(tool) = &self.sanitizer_tool_name {
            if !candidate.contains(tool.as_str()) {
                candidate.push('_');
                candidate.push_str(tool);
            }
        }
        candidate
    }

    /// Downloads the system symbols archive for the device's build into
    /// `symbols_dir` unless the directory already holds that build.
    pub fn refresh_system_symbols(&self, symbols_dir: &Path) -> Result<RefreshOutcome> {
        if let DownloadPolicy::Disabled(reason) = &self.policy {
            debug!("Skipping system symbols download: {}", reason);
            return Ok(RefreshOutcome::Skipped(reason.clone()));
        }

        let Some(build_params) = self.settings.build_parameters() else {
            error!("Unable to determine build parameters.");
            return Ok(RefreshOutcome::ParametersUnavailable(
                "device build parameters unknown".to_string(),
            ));
        };

        let marker = CacheMarker::for_directory(symbols_dir);
        if marker.matches(&build_params) {
            debug!("System symbols cache valid for {}", build_params);
            return Ok(RefreshOutcome::AlreadyValid);
        }

        let BuildParameters {
            build_id,
            target,
            build_type,
        } = &build_params;
        if !build_params.is_complete() {
            error!("Null build parameters found, exiting.");
            return Ok(RefreshOutcome::ParametersUnavailable(format!(
                "incomplete build parameters: {build_params:?}"
            )));
        }
        let build_type = self.qualified_build_type(build_type);

        let archive_filename = system_symbols_archive_filename(build_id, target);
        let archive_path = symbols_dir.join(&archive_filename);
        let candidates = vec![self.system_symbols_candidate(target, &build_type)];

        info!("Fetching system symbols {} for {}", archive_filename, candidates[0]);
        self.fetcher.fetch_if_needed(
            build_id,
            symbols_dir,
            &archive_path,
            &candidates,
            &archive_filename,
            None,
        )?;
        if !archive_path.exists() {
            error!("Unable to locate symbols archive {}.", archive_path.display());
            return Ok(RefreshOutcome::FetchMissing(format!(
                "{} not found under {}",
                archive_filename, candidates[0]
            )));
        }

        self.archive.unpack(&archive_path, symbols_dir, true)?;
        fs::remove_file(&archive_path).map_err(|e| {
            SymsError::IoError(format!(
                "Failed to remove symbols archive {}: {}",
                archive_path.display(),
                e
            ))
        })?;

        marker.write(&build_params)?;
        Ok(RefreshOutcome::Updated)
    }
}
