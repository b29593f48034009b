use std::path::PathBuf;

use url::Url;

/// Host serving both the archive metadata and the images.
pub const DEFAULT_HOST: &str = "https://www.bing.com";

/// Path of the archive metadata endpoint, relative to the host.
pub const ARCHIVE_PATH: &str = "/HPImageArchive.aspx";

/// Number of most recent entries requested from the archive.
pub const WINDOW_SIZE: usize = 8;

pub const DEFAULT_RESOLUTION: &str = "1920x1080";

pub const DEFAULT_LOCALE: &str = "auto";

/// Everything a run needs, passed explicitly into each stage.
#[derive(Debug, Clone)]
pub struct Config {
    /// Existing directory the images are saved into.
    pub output_dir: PathBuf,
    /// Resolution variant to request, e.g. `1920x1080`.
    pub resolution: String,
    /// Market code sent as `mk`, e.g. `en-US` or `auto`.
    pub locale: String,
    /// Base URL for the archive endpoint and relative image URLs.
    pub host: Url,
    /// Draw a spinner per download.
    pub show_progress: bool,
}

impl Config {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            resolution: DEFAULT_RESOLUTION.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            host: Url::parse(DEFAULT_HOST).expect("default host is a valid URL"),
            show_progress: false,
        }
    }

    /// Full URL of the metadata request for the configured locale.
    pub fn archive_url(&self) -> Url {
        let mut url = self.host.clone();
        url.set_path(ARCHIVE_PATH);
        url.query_pairs_mut()
            .clear()
            .append_pair("format", "js")
            .append_pair("idx", "0")
            .append_pair("n", &WINDOW_SIZE.to_string())
            .append_pair("mk", &self.locale);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_carries_window_and_locale() {
        let mut config = Config::new("/tmp");
        config.locale = "hu-HU".to_string();
        assert_eq!(
            config.archive_url().as_str(),
            "https://www.bing.com/HPImageArchive.aspx?format=js&idx=0&n=8&mk=hu-HU"
        );
    }

    #[test]
    fn defaults() {
        let config = Config::new("out");
        assert_eq!(config.resolution, "1920x1080");
        assert_eq!(config.locale, "auto");
        assert!(!config.show_progress);
    }
}
