use std::path::Path;

use syms_common::error::Result;
use syms_common::model::BuildInfo;

/// Remote store of build artifacts, addressed by build id and target.
pub trait ArtifactStore {
    /// Downloads `remote_file_name` produced by `target` in build `build_id`
    /// into `dest_dir`, named `dest_name_override` when given.
    ///
    /// An artifact the store does not have is not an error: nothing is
    /// written and `Ok(())` is returned. Callers detect the miss by checking
    /// for the expected file.
    fn fetch(
        &self,
        build_id: &str,
        target: &str,
        remote_file_name: &str,
        dest_dir: &Path,
        dest_name_override: Option<&str>,
    ) -> Result<()>;

    /// Latest known build for `target` on `branch`.
    fn latest_build_info(&self, branch: &str, target: &str) -> Result<BuildInfo>;
}
