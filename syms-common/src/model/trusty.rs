// syms-common/src/model/trusty.rs
use std::collections::HashMap;

pub const DEFAULT_TRUSTY_BRANCH: &str = "polygon-trusty-whitechapel-master";

/// Maps device names to the build target that carries their Trusty symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustyTargets {
    branch: String,
    targets: HashMap<String, String>,
}

impl TrustyTargets {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            targets: HashMap::new(),
        }
    }

    pub fn with_device(mut self, device: impl Into<String>, target: impl Into<String>) -> Self {
        self.targets.insert(device.into(), target.into());
        self
    }

    /// Same device table, queried on `branch`.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Build target for `device`, or an empty string for unknown devices.
    pub fn target_for(&self, device: &str) -> &str {
        self.targets.get(device).map(String::as_str).unwrap_or("")
    }
}

impl Default for TrustyTargets {
    fn default() -> Self {
        let mut table = Self::new(DEFAULT_TRUSTY_BRANCH);
        for device in ["cheetah", "panther"] {
            table = table.with_device(device, "cloudripper-fuzz-test-debug");
        }
        for device in ["oriole", "raven", "bluejay"] {
            table = table.with_device(device, "slider-fuzz-test-debug");
        }
        table
    }
}
