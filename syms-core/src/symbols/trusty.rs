// syms-core/src/symbols/trusty.rs
use std::path::Path;

use syms_common::error::Result;
use syms_common::model::RefreshOutcome;
use tracing::{debug, error, warn};

use super::SymbolCacheManager;

const LK_ELF: &str = "lk.elf";

pub(super) fn trusty_archive_filename(target: &str, build_id: &str) -> String {
    format!("{target}-{build_id}.syms.zip")
}

impl SymbolCacheManager {
    /// Downloads the Trusty symbols archive and extracts the ELF of
    /// `app_name` as `{symbols_dir}/{app_name}.syms.elf`, along with `lk.elf`.
    ///
    /// Keyed only by the build id, so every call fetches again. Without an
    /// explicit `build_id` the latest build on the Trusty branch is used.
    pub fn refresh_trusty_symbols(
        &self,
        symbols_dir: &Path,
        app_name: &str,
        build_id: Option<&str>,
    ) -> Result<RefreshOutcome> {
        let device = self
            .settings
            .build_parameters()
            .map(|params| params.target)
            .unwrap_or_default();
        let target = self.trusty_targets.target_for(&device).to_string();
        if target.is_empty() {
            warn!("No Trusty build target known for device '{}'", device);
        }

        let build_id = match build_id.filter(|b| !b.is_empty()) {
            Some(bid) => bid.to_string(),
            None => {
                let info = self
                    .store
                    .latest_build_info(self.trusty_targets.branch(), &target)?;
                debug!(
                    "Using latest Trusty build {} from {}",
                    info.build_id,
                    self.trusty_targets.branch()
                );
                info.build_id
            }
        };

        let archive_filename = trusty_archive_filename(&target, &build_id);
        let archive_path = symbols_dir.join(&archive_filename);
        self.fetcher.fetch_if_needed(
            &build_id,
            symbols_dir,
            &archive_path,
            &[target.clone()],
            &archive_filename,
            None,
        )?;
        if !archive_path.exists() {
            error!("Unable to locate Trusty symbols {}.", archive_path.display());
            return Ok(RefreshOutcome::FetchMissing(format!(
                "{archive_filename} not found under '{target}'"
            )));
        }

        let app_elf = format!("{app_name}.syms.elf");
        for entry in self.archive.entry_names(&archive_path)? {
            if entry.contains(&app_elf) {
                self.archive
                    .extract_entry(&archive_path, &entry, &symbols_dir.join(&app_elf))?;
            }
            if entry == LK_ELF {
                self.archive
                    .extract_entry(&archive_path, &entry, &symbols_dir.join(LK_ELF))?;
            }
        }
        Ok(RefreshOutcome::Updated)
    }
}
