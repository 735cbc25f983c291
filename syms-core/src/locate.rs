// syms-core/src/locate.rs
// Maps on-device binary paths to local files usable for symbolization.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use syms_common::config::{Config, Platform};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::device::{pull_file, DeviceChannel};
use crate::symbols::SymbolCacheManager;

const DELETED_MARKER: &str = "(deleted)";

/// Finds `binary_subpath` under `root`: the exact relative location first,
/// then any file whose path ends with it, then any file with the same name.
pub fn find_binary_path(root: &Path, binary_subpath: &str) -> Option<PathBuf> {
    if !root.is_dir() {
        return None;
    }
    let relative = Path::new(binary_subpath.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        return None;
    }

    let direct = root.join(relative);
    if direct.is_file() {
        return Some(direct);
    }

    let files = || {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
    };

    if let Some(entry) = files().find(|e| e.path().ends_with(relative)) {
        return Some(entry.into_path());
    }

    let file_name = relative.file_name()?;
    files()
        .find(|e| e.file_name() == file_name)
        .map(|e| e.into_path())
}

pub struct BinaryLocator {
    platform: Platform,
    build_dir: PathBuf,
    symbols_dir: PathBuf,
    manager: Arc<SymbolCacheManager>,
    device: Arc<dyn DeviceChannel>,
}

impl BinaryLocator {
    pub fn new(
        platform: Platform,
        build_dir: PathBuf,
        symbols_dir: PathBuf,
        manager: Arc<SymbolCacheManager>,
        device: Arc<dyn DeviceChannel>,
    ) -> Self {
        Self {
            platform,
            build_dir,
            symbols_dir,
            manager,
            device,
        }
    }

    pub fn from_config(
        config: &Config,
        manager: Arc<SymbolCacheManager>,
        device: Arc<dyn DeviceChannel>,
    ) -> Self {
        Self::new(
            config.platform,
            config.build_dir.clone(),
            config.symbols_dir.clone(),
            manager,
            device,
        )
    }

    /// Local copy of `binary_path`, or `None` when no strategy finds one.
    pub fn resolve(&self, binary_path: &str) -> Option<PathBuf> {
        // Entries like [stack:1234] or stale mappings are not binaries.
        if self.platform.is_android()
            && (!binary_path.starts_with('/') || binary_path.contains(DELETED_MARKER))
        {
            return None;
        }

        if let Some(local) = find_binary_path(&self.build_dir, binary_path) {
            debug!("Found {} in build directory: {}", binary_path, local.display());
            return Some(local);
        }

        if self.platform.is_android() {
            if let Some(local) = self.resolve_from_symbols_or_device(binary_path) {
                return Some(local);
            }
        }

        error!("Unable to find library {} for symbolization.", binary_path);
        None
    }

    fn resolve_from_symbols_or_device(&self, binary_path: &str) -> Option<PathBuf> {
        match self.manager.refresh_system_symbols(&self.symbols_dir) {
            Ok(outcome) => debug!("System symbols refresh: {}", outcome),
            Err(e) => warn!("System symbols refresh failed: {}", e),
        }
        if let Some(local) = find_binary_path(&self.symbols_dir, binary_path) {
            return Some(local);
        }

        let file_name = Path::new(binary_path).file_name()?;
        let local = self.symbols_dir.join(file_name);
        if let Err(e) = fs::create_dir_all(&self.symbols_dir) {
            warn!(
                "Failed to create symbols directory {}: {}",
                self.symbols_dir.display(),
                e
            );
        }
        if let Err(e) = pull_file(self.device.as_ref(), binary_path, &local) {
            warn!("Pulling {} from device failed: {}", binary_path, e);
        }
        local.exists().then_some(local)
    }
}
