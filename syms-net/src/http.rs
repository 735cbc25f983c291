use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use syms_common::config::Config;
use syms_common::error::{Result, SymsError};
use syms_common::model::BuildInfo;
use tracing::{debug, error};
use url::Url;

use crate::store::ArtifactStore;
use crate::validation::validate_url;

const DOWNLOAD_TIMEOUT_SECS: u64 = 600;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "syms symbol fetcher (Rust)";

/// Artifact store served over plain HTTP(S) GETs.
///
/// Layout below the base URL:
/// `{build_id}/{target}/{file_name}` for artifacts and
/// `branches/{branch}/{target}/latest.json` for latest build info.
#[derive(Debug, Clone)]
pub struct HttpArtifactStore {
    base_url: Url,
    client: Client,
}

impl HttpArtifactStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = validate_url(base_url)?;
        Ok(Self {
            base_url,
            client: build_http_client()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let base = config.artifact_base_url.as_deref().ok_or_else(|| {
            SymsError::Config("SYMS_ARTIFACT_URL is not set; no artifact store available".into())
        })?;
        Self::new(base)
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SymsError::ValidationError(format!(
                    "Artifact store URL cannot be a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn artifact_url(&self, build_id: &str, target: &str, file_name: &str) -> Result<Url> {
        self.url_with_segments(&[build_id, target, file_name])
    }

    pub fn latest_build_url(&self, branch: &str, target: &str) -> Result<Url> {
        self.url_with_segments(&["branches", branch, target, "latest.json"])
    }
}

impl ArtifactStore for HttpArtifactStore {
    fn fetch(
        &self,
        build_id: &str,
        target: &str,
        remote_file_name: &str,
        dest_dir: &Path,
        dest_name_override: Option<&str>,
    ) -> Result<()> {
        let url = self.artifact_url(build_id, target, remote_file_name)?;
        let final_path = dest_dir.join(dest_name_override.unwrap_or(remote_file_name));
        debug!("Fetching {} to {}", url, final_path.display());

        let response = self.client.get(url.clone()).send().map_err(|e| {
            debug!("HTTP request failed for {url}: {e}");
            SymsError::HttpError(format!("HTTP request failed for {url}: {e}"))
        })?;
        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, url);

        if status == StatusCode::NOT_FOUND {
            debug!("Artifact {} not present for target {}", remote_file_name, target);
            return Ok(());
        }
        if !status.is_success() {
            error!("HTTP error {} for URL {}", status, url);
            return Err(SymsError::DownloadError(
                remote_file_name.to_string(),
                url.to_string(),
                format!("HTTP status {status}"),
            ));
        }

        write_via_temp_file(response, &final_path)
    }

    fn latest_build_info(&self, branch: &str, target: &str) -> Result<BuildInfo> {
        let url = self.latest_build_url(branch, target)?;
        debug!("Querying latest build info: {}", url);
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SymsError::DownloadError(
                "latest.json".to_string(),
                url.to_string(),
                format!("HTTP status {status}"),
            ));
        }
        let info: BuildInfo = response.json()?;
        debug!("Latest build for {}/{}: {}", branch, target, info.build_id);
        Ok(info)
    }
}

fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SymsError::HttpError(format!("Failed to build HTTP client: {e}")))
}

fn temp_path_for(final_path: &Path) -> PathBuf {
    let temp_filename = format!(
        ".{}.download",
        final_path.file_name().unwrap_or_default().to_string_lossy()
    );
    final_path.with_file_name(temp_filename)
}

// The expected file only appears once the transfer is complete.
fn write_via_temp_file(mut response: reqwest::blocking::Response, final_path: &Path) -> Result<()> {
    let temp_path = temp_path_for(final_path);
    let mut temp_file = File::create(&temp_path).map_err(|e| {
        SymsError::IoError(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;
    if let Err(e) = response.copy_to(&mut temp_file) {
        drop(temp_file);
        let _ = fs::remove_file(&temp_path);
        return Err(SymsError::HttpError(format!(
            "Failed to read response body for {}: {}",
            final_path.display(),
            e
        )));
    }
    drop(temp_file);

    fs::rename(&temp_path, final_path).map_err(|e| {
        SymsError::IoError(format!(
            "Failed to move temp file {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        ))
    })?;
    debug!("Downloaded artifact to {}", final_path.display());
    Ok(())
}
