use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SymsError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("HttpError: {0}")]
    HttpError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Cache Error: {0}")]
    Cache(String),

    #[error("Archive Error: {0}")]
    Archive(String),

    #[error("Device Error: {0}")]
    Device(String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for SymsError {
    fn from(err: std::io::Error) -> Self {
        SymsError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for SymsError {
    fn from(err: reqwest::Error) -> Self {
        SymsError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for SymsError {
    fn from(err: serde_json::Error) -> Self {
        SymsError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, SymsError>;
