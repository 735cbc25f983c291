// syms-core/src/symbols/repo_prop.rs
use std::path::Path;

use syms_common::cache::CacheMarker;
use syms_common::error::Result;
use syms_common::model::{BuildParameters, DownloadPolicy, RefreshOutcome, KERNEL_BUILD_TYPE};
use tracing::{debug, error};

use super::SymbolCacheManager;

const REPO_PROP_ARTIFACT: &str = "repo.prop";

pub fn repo_prop_archive_filename(build_id: &str, target: &str) -> String {
    format!("{target}-{build_id}-repo.prop")
}

impl SymbolCacheManager {
    /// Caches the `repo.prop` of the device's running kernel.
    ///
    /// Sanitizer and plain kernels of one build id share a `repo.prop`, but
    /// some kernel targets are published as `kernel` and others as
    /// `kernel_{target}`, so both spellings are tried.
    pub fn refresh_kernel_repo_properties(&self, symbols_dir: &Path) -> Result<RefreshOutcome> {
        if let DownloadPolicy::Disabled(reason) = &self.policy {
            debug!("Skipping kernel repo.prop download: {}", reason);
            return Ok(RefreshOutcome::Skipped(reason.clone()));
        }

        let build_id = self.settings.kernel_identity().build_id;
        let target = self.settings.kernel_target_name();
        let (Some(build_id), Some(target)) = (build_id, target) else {
            error!("Could not get kernel parameters, exiting.");
            return Ok(RefreshOutcome::ParametersUnavailable(
                "kernel build id or target name unknown".to_string(),
            ));
        };

        let candidates = match &self.sanitizer_tool_name {
            Some(tool) => vec![format!("kernel_{tool}"), format!("kernel_{tool}_{target}")],
            None => vec!["kernel".to_string(), format!("kernel_{target}")],
        };

        self.refresh_repo_properties(
            symbols_dir,
            &build_id,
            &target,
            &candidates,
            KERNEL_BUILD_TYPE,
        )
    }

    /// Caches `repo.prop` for `build_id`, keyed by `(build_id, cache_target,
    /// cache_type)`. A matching marker short-circuits without network access.
    pub fn refresh_repo_properties(
        &self,
        symbols_dir: &Path,
        build_id: &str,
        cache_target: &str,
        candidates: &[String],
        cache_type: &str,
    ) -> Result<RefreshOutcome> {
        let build_params = BuildParameters::new(build_id, cache_target, cache_type);
        let marker = CacheMarker::for_directory(symbols_dir);
        if marker.matches(&build_params) {
            debug!("repo.prop cache valid for {}", build_params);
            return Ok(RefreshOutcome::AlreadyValid);
        }

        let archive_filename = repo_prop_archive_filename(build_id, cache_target);
        let archive_path = symbols_dir.join(&archive_filename);
        self.fetcher.fetch_if_needed(
            build_id,
            symbols_dir,
            &archive_path,
            candidates,
            REPO_PROP_ARTIFACT,
            Some(&archive_filename),
        )?;
        if !archive_path.exists() {
            error!("Unable to locate repo.prop {}.", archive_path.display());
            return Ok(RefreshOutcome::FetchMissing(format!(
                "repo.prop for build {} not found under {}",
                build_id,
                candidates.join(", ")
            )));
        }

        marker.write(&build_params)?;
        Ok(RefreshOutcome::Updated)
    }
}
