mod async_download;
pub mod utils;

pub use async_download::{Downloaded, download_file_async};
