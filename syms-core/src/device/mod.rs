// syms-core/src/device/mod.rs
// Device communication and build metadata discovery.

use std::path::Path;

use syms_common::error::Result;
use syms_common::model::BuildParameters;

pub mod adb;
pub mod props;

pub use adb::Adb;
pub use props::KernelIdentity;

/// Command channel to the attached device.
pub trait DeviceChannel {
    /// Runs a device-bridge command (`pull`, `shell ...`) and returns stdout.
    fn run_command(&self, args: &[&str]) -> Result<String>;
}

/// Build metadata of the attached device.
pub trait DeviceSettings {
    fn is_first_party_device(&self) -> bool;

    /// Parameters of the running system build, if they can be determined.
    fn build_parameters(&self) -> Option<BuildParameters>;

    fn kernel_identity(&self) -> KernelIdentity;

    fn kernel_target_name(&self) -> Option<String>;
}

/// Copies `remote_path` off the device to `local_path`.
pub fn pull_file(device: &dyn DeviceChannel, remote_path: &str, local_path: &Path) -> Result<()> {
    let local = local_path.to_string_lossy();
    device.run_command(&["pull", remote_path, local.as_ref()])?;
    Ok(())
}
