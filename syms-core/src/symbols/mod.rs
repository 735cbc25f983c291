// syms-core/src/symbols/mod.rs
//! Cache validation and refresh for symbol directories.
//!
//! Every refresh follows the same shape: compute the expected artifact
//! name(s), compare the directory's cache marker with the current build
//! parameters, fetch when they differ, install the artifact and only then
//! advance the marker. A marker is never written for an artifact that is not
//! on disk.

use std::sync::Arc;

use syms_common::config::Config;
use syms_common::model::{DownloadPolicy, TrustyTargets};
use syms_net::ArtifactStore;

use crate::archive::ArchiveCodec;
use crate::device::DeviceSettings;
use crate::fetch::ArtifactFetcher;

mod repo_prop;
mod system;
mod trusty;

pub use repo_prop::repo_prop_archive_filename;

pub struct SymbolCacheManager {
    policy: DownloadPolicy,
    sanitizer_tool_name: Option<String>,
    release_configuration: Option<String>,
    trusty_targets: TrustyTargets,
    fetcher: ArtifactFetcher,
    store: Arc<dyn ArtifactStore>,
    settings: Arc<dyn DeviceSettings>,
    archive: Arc<dyn ArchiveCodec>,
}

impl SymbolCacheManager {
    pub fn new(
        policy: DownloadPolicy,
        store: Arc<dyn ArtifactStore>,
        settings: Arc<dyn DeviceSettings>,
        archive: Arc<dyn ArchiveCodec>,
    ) -> Self {
        Self {
            policy,
            sanitizer_tool_name: None,
            release_configuration: None,
            trusty_targets: TrustyTargets::default(),
            fetcher: ArtifactFetcher::new(Arc::clone(&store)),
            store,
            settings,
            archive,
        }
    }

    pub fn from_config(
        config: &Config,
        policy: DownloadPolicy,
        store: Arc<dyn ArtifactStore>,
        settings: Arc<dyn DeviceSettings>,
        archive: Arc<dyn ArchiveCodec>,
    ) -> Self {
        Self::new(policy, store, settings, archive)
            .with_sanitizer(config.sanitizer_tool_name.clone())
            .with_release_configuration(config.release_configuration.clone())
            .with_trusty_targets(config.trusty_targets.clone())
    }

    pub fn with_sanitizer(mut self, tool_name: Option<String>) -> Self {
        self.sanitizer_tool_name = tool_name.filter(|s| !s.is_empty());
        self
    }

    pub fn with_release_configuration(mut self, release: Option<String>) -> Self {
        self.release_configuration = release.filter(|s| !s.is_empty());
        self
    }

    pub fn with_trusty_targets(mut self, targets: TrustyTargets) -> Self {
        self.trusty_targets = targets;
        self
    }
}

#[cfg(test)]
mod tests;
