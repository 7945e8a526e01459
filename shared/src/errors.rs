/// Unified error types for Daybook.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while downloading the configured page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} environment variable is not set.")]
    MissingSetting(&'static str),

    #[error("HTTP status {status} for url '{url}'")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot create folder {}: {source}", .path.display())]
    CreateFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised while reading the destination folder.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} environment variable is not set.")]
    MissingSetting(&'static str),

    #[error("Folder {} does not exist.", .0.display())]
    FolderMissing(PathBuf),

    #[error("File {0} not found.")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether the request never reached the point of touching the disk.
    pub fn is_upstream(&self) -> bool {
        matches!(self, FetchError::Status { .. } | FetchError::Http(_))
    }
}
