// syms-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::Result;
use crate::model::TrustyTargets;

const DEFAULT_CACHE_SUBDIR: &str = "syms";

/// Platform family the symbolized target runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Host,
}

impl Platform {
    fn from_os_name(name: &str) -> Self {
        if name.to_ascii_uppercase().contains("ANDROID") {
            Platform::Android
        } else {
            Platform::Host
        }
    }

    pub fn is_android(&self) -> bool {
        matches!(self, Platform::Android)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbols_dir: PathBuf,
    pub kernel_symbols_dir: PathBuf,
    pub trusty_symbols_dir: PathBuf,
    pub build_dir: PathBuf,
    pub platform: Platform,
    pub local_development: bool,
    pub sanitizer_tool_name: Option<String>,
    pub release_configuration: Option<String>,
    pub artifact_base_url: Option<String>,
    pub android_serial: Option<String>,
    pub trusty_targets: TrustyTargets,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading syms configuration from environment");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup. `load` uses the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let default_root = dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join(DEFAULT_CACHE_SUBDIR);

        let symbols_dir = value("SYMBOLS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                debug!("SYMBOLS_DIR not set, using default under {}", default_root.display());
                default_root.join("symbols")
            });
        // Siblings, never nested: a system refresh recreates `symbols_dir`.
        let kernel_symbols_dir = value("KERNEL_SYMBOLS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| sibling_dir(&symbols_dir, "kernel", &default_root));
        let trusty_symbols_dir = value("TRUSTY_SYMBOLS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| sibling_dir(&symbols_dir, "trusty", &default_root));
        let build_dir = value("BUILD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_root.join("build"));

        let platform = value("OS_OVERRIDE")
            .map(|name| Platform::from_os_name(&name))
            .unwrap_or(Platform::Android);

        let local_development = value("LOCAL_DEVELOPMENT").is_some_and(|v| is_truthy(&v));

        let trusty_targets = match value("TRUSTY_BRANCH") {
            Some(branch) => TrustyTargets::default().with_branch(branch),
            None => TrustyTargets::default(),
        };

        let config = Self {
            symbols_dir,
            kernel_symbols_dir,
            trusty_symbols_dir,
            build_dir,
            platform,
            local_development,
            sanitizer_tool_name: value("SANITIZER_TOOL_NAME"),
            release_configuration: value("RELEASE_CONFIGURATION"),
            artifact_base_url: value("SYMS_ARTIFACT_URL"),
            android_serial: value("ANDROID_SERIAL"),
            trusty_targets,
        };
        debug!(
            "Configuration loaded: symbols_dir={}, build_dir={}, platform={:?}",
            config.symbols_dir.display(),
            config.build_dir.display(),
            config.platform
        );
        Ok(config)
    }

    pub fn symbols_dir(&self) -> &Path {
        &self.symbols_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Directory used for kernel `repo.prop` caches.
    pub fn kernel_symbols_dir(&self) -> &Path {
        &self.kernel_symbols_dir
    }

    /// Directory used for Trusty application ELF files.
    pub fn trusty_symbols_dir(&self) -> &Path {
        &self.trusty_symbols_dir
    }
}

/// `/x/symbols` -> `/x/symbols-{suffix}`.
fn sibling_dir(symbols_dir: &Path, suffix: &str, fallback_root: &Path) -> PathBuf {
    match symbols_dir.file_name() {
        Some(name) => {
            symbols_dir.with_file_name(format!("{}-{}", name.to_string_lossy(), suffix))
        }
        None => fallback_root.join(suffix),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
