//! Download the latest Bing "image of the day" wallpapers that are not yet
//! present in a local directory.

pub mod archive;
pub mod config;
pub mod download;
pub mod error;
pub mod local;
pub mod pipeline;
pub mod resolve;

pub use archive::{ImageDescriptor, fetch_descriptors};
pub use config::Config;
pub use error::{DownloadError, Error, FetchError, InvalidDirectoryError};
pub use pipeline::{Summary, run};
