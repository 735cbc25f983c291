// syms-core/src/device/adb.rs
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use syms_common::config::Config;
use syms_common::error::{Result, SymsError};
use syms_common::model::BuildParameters;
use tracing::{debug, warn};

use super::props::{
    is_first_party_brand, kernel_target_from_product, parse_build_fingerprint,
    parse_kernel_release, KernelIdentity,
};
use super::{DeviceChannel, DeviceSettings};

/// Android Debug Bridge client for a single device.
#[derive(Debug, Clone)]
pub struct Adb {
    adb_path: PathBuf,
    serial: Option<String>,
}

fn adb_path() -> PathBuf {
    if let Ok(path) = env::var("ADB_PATH") {
        return PathBuf::from(path);
    }
    if let Ok(sdk_root) = env::var("ANDROID_SDK_ROOT").or_else(|_| env::var("ANDROID_HOME")) {
        let candidate = PathBuf::from(&sdk_root).join("platform-tools").join("adb");
        if candidate.exists() {
            return candidate;
        }
    }
    PathBuf::from("adb")
}

fn format_command_output(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    if !stdout.is_empty() {
        out.push_str("stdout: ");
        out.push_str(stdout);
    }
    if !stderr.is_empty() {
        if !out.is_empty() {
            out.push_str("; ");
        }
        out.push_str("stderr: ");
        out.push_str(stderr);
    }
    out
}

impl Adb {
    pub fn new(adb_path: PathBuf, serial: Option<String>) -> Self {
        Self { adb_path, serial }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(adb_path(), config.android_serial.clone())
    }

    fn output(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.adb_path);
        if let Some(serial) = &self.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        debug!("Running {} {:?}", self.adb_path.display(), args);

        let output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SymsError::Device(format!(
                    "adb not found at {} (set ADB_PATH or ANDROID_SDK_ROOT)",
                    self.adb_path.display()
                ))
            } else {
                SymsError::CommandExecError(format!("adb {}: {}", args.join(" "), e))
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(SymsError::CommandExecError(format!(
                "adb {} failed with exit {}: {}",
                args.join(" "),
                output.status.code().unwrap_or(-1),
                format_command_output(&stdout, &stderr)
            )))
        }
    }

    pub fn get_prop(&self, name: &str) -> Result<String> {
        Ok(self.output(&["shell", "getprop", name])?.trim().to_string())
    }

    fn prop_or_log(&self, name: &str) -> Option<String> {
        match self.get_prop(name) {
            Ok(value) if !value.is_empty() => Some(value),
            Ok(_) => {
                debug!("Device property {} is empty", name);
                None
            }
            Err(e) => {
                warn!("Failed to read device property {}: {}", name, e);
                None
            }
        }
    }
}

impl DeviceChannel for Adb {
    fn run_command(&self, args: &[&str]) -> Result<String> {
        self.output(args)
    }
}

impl DeviceSettings for Adb {
    fn is_first_party_device(&self) -> bool {
        self.prop_or_log("ro.product.brand")
            .is_some_and(|brand| is_first_party_brand(&brand))
    }

    fn build_parameters(&self) -> Option<BuildParameters> {
        let fingerprint = self.prop_or_log("ro.build.fingerprint")?;
        let params = parse_build_fingerprint(&fingerprint);
        if params.is_none() {
            warn!("Unrecognized build fingerprint: {}", fingerprint);
        }
        params
    }

    fn kernel_identity(&self) -> KernelIdentity {
        match self.output(&["shell", "uname", "-r"]) {
            Ok(release) => parse_kernel_release(&release),
            Err(e) => {
                warn!("Failed to read kernel release: {}", e);
                KernelIdentity::default()
            }
        }
    }

    fn kernel_target_name(&self) -> Option<String> {
        self.prop_or_log("ro.product.name")
            .and_then(|product| kernel_target_from_product(&product))
    }
}
