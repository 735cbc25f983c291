// syms-common/src/model/build_params.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// Build type recorded for kernel `repo.prop` caches.
pub const KERNEL_BUILD_TYPE: &str = "kernel";

/// Identifies exactly which build's symbols a symbols directory holds.
///
/// Serialized with the field name `type` for the build type so the marker
/// reads the same as the device-side build fingerprint vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildParameters {
    pub build_id: String,
    pub target: String,
    #[serde(rename = "type")]
    pub build_type: String,
}

impl BuildParameters {
    pub fn new(
        build_id: impl Into<String>,
        target: impl Into<String>,
        build_type: impl Into<String>,
    ) -> Self {
        Self {
            build_id: build_id.into(),
            target: target.into(),
            build_type: build_type.into(),
        }
    }

    /// Synthetic parameters used to key a kernel `repo.prop` cache.
    pub fn kernel(build_id: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(build_id, target, KERNEL_BUILD_TYPE)
    }

    /// True when none of the fields are empty.
    pub fn is_complete(&self) -> bool {
        !self.build_id.is_empty() && !self.target.is_empty() && !self.build_type.is_empty()
    }
}

impl fmt::Display for BuildParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.target, self.build_type, self.build_id)
    }
}

/// Latest build information reported by the artifact store for a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    #[serde(rename = "bid")]
    pub build_id: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}
