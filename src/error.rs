use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while retrieving the image archive metadata. Aborts the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch the latest images: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to fetch the latest images: server answered {0}")]
    Status(StatusCode),
    #[error("failed to decode the image archive response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("the given path ('{}') is not a valid directory: {source}", path.display())]
pub struct InvalidDirectoryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failure of a single image download. Never aborts sibling downloads.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("cannot derive a download target from '{0}'")]
    Unresolvable(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to download image from {url}: server answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("download interrupted")]
    Interrupted,
}

/// Errors that stop a run before any download is attempted.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    InvalidDirectory(#[from] InvalidDirectoryError),
    #[error("interrupted before any download started")]
    Interrupted,
}
