// In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;

use syms_common::error::{Result, SymsError};
use syms_common::model::{BuildInfo, BuildParameters};
use syms_net::ArtifactStore;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::device::{DeviceChannel, DeviceSettings, KernelIdentity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub build_id: String,
    pub target: String,
    pub remote_file_name: String,
    pub dest_name_override: Option<String>,
}

/// Artifact store keyed by (target, remote file name) that records requests.
#[derive(Default)]
pub struct FakeStore {
    artifacts: HashMap<(String, String), Vec<u8>>,
    failing_targets: Vec<String>,
    latest_build_id: Option<String>,
    calls: Mutex<Vec<FetchCall>>,
    latest_calls: Mutex<Vec<(String, String)>>,
}

impl FakeStore {
    pub fn with_artifact(mut self, target: &str, remote_file_name: &str, data: &[u8]) -> Self {
        self.artifacts.insert(
            (target.to_string(), remote_file_name.to_string()),
            data.to_vec(),
        );
        self
    }

    pub fn failing_on(mut self, target: &str) -> Self {
        self.failing_targets.push(target.to_string());
        self
    }

    pub fn with_latest_build(mut self, build_id: &str) -> Self {
        self.latest_build_id = Some(build_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested_targets(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.target).collect()
    }

    pub fn latest_calls(&self) -> Vec<(String, String)> {
        self.latest_calls.lock().unwrap().clone()
    }
}

impl ArtifactStore for FakeStore {
    fn fetch(
        &self,
        build_id: &str,
        target: &str,
        remote_file_name: &str,
        dest_dir: &Path,
        dest_name_override: Option<&str>,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(FetchCall {
            build_id: build_id.to_string(),
            target: target.to_string(),
            remote_file_name: remote_file_name.to_string(),
            dest_name_override: dest_name_override.map(str::to_string),
        });
        if self.failing_targets.iter().any(|t| t == target) {
            return Err(SymsError::HttpError(format!("simulated failure for {target}")));
        }
        if let Some(data) = self
            .artifacts
            .get(&(target.to_string(), remote_file_name.to_string()))
        {
            let name = dest_name_override.unwrap_or(remote_file_name);
            fs::write(dest_dir.join(name), data)?;
        }
        Ok(())
    }

    fn latest_build_info(&self, branch: &str, target: &str) -> Result<BuildInfo> {
        self.latest_calls
            .lock()
            .unwrap()
            .push((branch.to_string(), target.to_string()));
        let build_id = self
            .latest_build_id
            .clone()
            .ok_or_else(|| SymsError::Generic("no latest build".into()))?;
        Ok(BuildInfo {
            build_id,
            branch: Some(branch.to_string()),
            target: Some(target.to_string()),
        })
    }
}

/// Scripted device. Pulls succeed for paths registered with `with_file`.
#[derive(Default)]
pub struct FakeDevice {
    pub first_party: bool,
    pub params: Option<BuildParameters>,
    pub kernel: KernelIdentity,
    pub kernel_name: Option<String>,
    pub files: HashMap<String, Vec<u8>>,
    pub commands: Mutex<Vec<Vec<String>>>,
    pub settings_queries: Mutex<usize>,
}

impl FakeDevice {
    pub fn first_party(params: BuildParameters) -> Self {
        Self {
            first_party: true,
            params: Some(params),
            ..Self::default()
        }
    }

    pub fn with_kernel(mut self, build_id: &str, name: &str) -> Self {
        self.kernel = KernelIdentity {
            hash: Some("abcdef0123".to_string()),
            build_id: Some(build_id.to_string()),
        };
        self.kernel_name = Some(name.to_string());
        self
    }

    pub fn with_file(mut self, remote_path: &str, data: &[u8]) -> Self {
        self.files.insert(remote_path.to_string(), data.to_vec());
        self
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }

    pub fn settings_queries(&self) -> usize {
        *self.settings_queries.lock().unwrap()
    }

    fn note_query(&self) {
        *self.settings_queries.lock().unwrap() += 1;
    }
}

impl DeviceChannel for FakeDevice {
    fn run_command(&self, args: &[&str]) -> Result<String> {
        self.commands
            .lock()
            .unwrap()
            .push(args.iter().map(|s| s.to_string()).collect());
        if let ["pull", remote, local] = args {
            match self.files.get(*remote) {
                Some(data) => {
                    fs::write(local, data)?;
                    return Ok(format!("{remote}: 1 file pulled"));
                }
                None => {
                    return Err(SymsError::CommandExecError(format!(
                        "remote object '{remote}' does not exist"
                    )))
                }
            }
        }
        Ok(String::new())
    }
}

impl DeviceSettings for FakeDevice {
    fn is_first_party_device(&self) -> bool {
        self.note_query();
        self.first_party
    }

    fn build_parameters(&self) -> Option<BuildParameters> {
        self.note_query();
        self.params.clone()
    }

    fn kernel_identity(&self) -> KernelIdentity {
        self.note_query();
        self.kernel.clone()
    }

    fn kernel_target_name(&self) -> Option<String> {
        self.note_query();
        self.kernel_name.clone()
    }
}

pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    fs::write(path, zip_bytes(entries)).unwrap();
}
