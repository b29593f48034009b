use std::path::PathBuf;

use url::Url;

use crate::config::Config;
use crate::error::DownloadError;

/// Where one image comes from and where it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub source_url: Url,
    pub target_path: PathBuf,
}

/// Replace the resolution between the last `_` and the last `.` of an image name.
///
/// `Altschlossfelsen_ROW14949645878_1366x768.jpg` with `1920x1080` becomes
/// `Altschlossfelsen_ROW14949645878_1920x1080.jpg`.
pub fn swap_resolution(name: &str, resolution: &str) -> Option<String> {
    let dot = name.rfind('.')?;
    let underscore = name[..dot].rfind('_')?;
    Some(format!(
        "{}{}{}",
        &name[..=underscore],
        resolution,
        &name[dot..]
    ))
}

/// Rewrite a relative image URL to the configured resolution and pick its
/// local file name.
///
/// The file name is the `id` query value when there is one, otherwise the
/// last path segment.
pub fn resolve(config: &Config, relative_url: &str) -> Result<ResolvedDownload, DownloadError> {
    let unresolvable = || DownloadError::Unresolvable(relative_url.to_string());
    let mut url = config.host.join(relative_url).map_err(|_| unresolvable())?;

    let path = url.path().to_string();
    if let Some((parent, last)) = path.rsplit_once('/') {
        if let Some(swapped) = swap_resolution(last, &config.resolution) {
            url.set_path(&format!("{}/{}", parent, swapped));
        }
    }

    let mut changed = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| match swap_resolution(&value, &config.resolution) {
            Some(swapped) => {
                changed |= swapped != value;
                (key.into_owned(), swapped)
            }
            None => (key.into_owned(), value.into_owned()),
        })
        .collect();
    if changed {
        url.query_pairs_mut().clear().extend_pairs(&pairs);
    }

    let file_name = pairs
        .iter()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.clone())
        .or_else(|| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        })
        .ok_or_else(unresolvable)?;

    if !is_valid_file_name(&file_name) {
        return Err(unresolvable());
    }

    Ok(ResolvedDownload {
        target_path: config.output_dir.join(&file_name),
        source_url: url,
    })
}

fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("/srv/wallpapers")
    }

    #[test]
    fn swaps_only_the_resolution() {
        assert_eq!(
            swap_resolution("Foo_ROW123_1366x768.jpg", "1920x1080").as_deref(),
            Some("Foo_ROW123_1920x1080.jpg")
        );
        assert_eq!(swap_resolution("hp", "1920x1080"), None);
        assert_eq!(swap_resolution("OHR.Foo", "1920x1080"), None);
    }

    #[test]
    fn rewrites_path_style_url() {
        let resolved = resolve(&config(), "/az/hprichbg/rb/Foo_ROW123_1366x768.jpg").unwrap();
        assert_eq!(
            resolved.source_url.as_str(),
            "https://www.bing.com/az/hprichbg/rb/Foo_ROW123_1920x1080.jpg"
        );
        assert_eq!(
            resolved.target_path,
            PathBuf::from("/srv/wallpapers/Foo_ROW123_1920x1080.jpg")
        );
    }

    #[test]
    fn rewrites_query_style_url() {
        let mut config = config();
        config.resolution = "UHD".to_string();
        let resolved = resolve(
            &config,
            "/th?id=OHR.LaDigue_EN-US2231_1920x1080.jpg&rf=LaDigue_1920x1080.jpg&pid=hp",
        )
        .unwrap();
        assert_eq!(
            resolved.source_url.as_str(),
            "https://www.bing.com/th?id=OHR.LaDigue_EN-US2231_UHD.jpg&rf=LaDigue_UHD.jpg&pid=hp"
        );
        assert_eq!(
            resolved.target_path,
            PathBuf::from("/srv/wallpapers/OHR.LaDigue_EN-US2231_UHD.jpg")
        );
    }

    #[test]
    fn same_resolution_keeps_url() {
        let relative = "/th?id=OHR.LaDigue_EN-US2231_1920x1080.jpg&pid=hp";
        let resolved = resolve(&config(), relative).unwrap();
        assert_eq!(
            resolved.source_url.as_str(),
            format!("https://www.bing.com{}", relative)
        );
    }

    #[test]
    fn rejects_urls_without_a_name() {
        assert!(matches!(
            resolve(&config(), "/"),
            Err(DownloadError::Unresolvable(_))
        ));
        assert!(matches!(
            resolve(&config(), "/th?id=..&pid=hp"),
            Err(DownloadError::Unresolvable(_))
        ));
        assert!(matches!(
            resolve(&config(), "/th?id=a%2Fb_1_2.jpg"),
            Err(DownloadError::Unresolvable(_))
        ));
    }
}
