use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::FetchError;

/// One "image of the day" entry as returned by the archive.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDescriptor {
    #[serde(rename = "startdate")]
    pub start_date: String,
    #[serde(rename = "fullstartdate")]
    pub full_start_date: String,
    #[serde(rename = "enddate")]
    pub end_date: String,
    /// Relative path and query of the image, e.g.
    /// `/th?id=OHR.Foo_EN-US123_1920x1080.jpg&rf=LaDigue_1920x1080.jpg&pid=hp`.
    pub url: String,
    #[serde(rename = "urlbase")]
    pub url_base: String,
    pub copyright: String,
    #[serde(rename = "copyrightlink", alias = "copyrightLink")]
    pub copyright_link: String,
    pub title: Option<String>,
    pub quiz: String,
    #[serde(rename = "wp")]
    pub is_wallpaper: bool,
    #[serde(rename = "hsh")]
    pub hash: String,
    #[serde(rename = "drk")]
    pub darkness: f64,
    pub top: f64,
    #[serde(rename = "bot")]
    pub bottom: f64,
    #[serde(rename = "hs")]
    pub alternate_hashes: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveResponse {
    pub images: Vec<ImageDescriptor>,
}

/// Get the latest image descriptors, going back [`crate::config::WINDOW_SIZE`] days.
pub async fn fetch_descriptors(
    client: &reqwest::Client,
    config: &Config,
) -> Result<Vec<ImageDescriptor>, FetchError> {
    let url = config.archive_url();
    debug!("Fetching image archive from {}", url);

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }
    let body = response.bytes().await?;
    let archive: ArchiveResponse = serde_json::from_slice(&body)?;

    info!(
        "Found {} image(s) for locale '{}'",
        archive.images.len(),
        config.locale
    );
    Ok(archive.images)
}
