use std::io;
use std::path::Path;

use log::debug;

use crate::archive::ImageDescriptor;
use crate::download::utils::is_partial_file;
use crate::error::InvalidDirectoryError;

/// List the names of the entries in `dir`.
///
/// The directory must already exist; it is never created here.
pub async fn scan_directory(dir: &Path) -> Result<Vec<String>, InvalidDirectoryError> {
    let invalid = |source: io::Error| InvalidDirectoryError {
        path: dir.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(dir).await.map_err(invalid)?;
    if !metadata.is_dir() {
        return Err(invalid(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }

    let mut entries = tokio::fs::read_dir(dir).await.map_err(invalid)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(invalid)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_partial_file(&name) {
            continue;
        }
        names.push(name);
    }
    debug!("{} existing file(s) in {}", names.len(), dir.display());
    Ok(names)
}

/// The part of a file name between the last `/` and the last `_`.
///
/// `Foo_ROW123_1920x1080.jpg` gives `Foo_ROW123`.
pub fn file_token(name: &str) -> Option<&str> {
    let start = name.rfind('/').map_or(0, |i| i + 1);
    let end = name.rfind('_')?;
    if end <= start {
        return None;
    }
    Some(&name[start..end])
}

/// Drop every descriptor whose URL contains the token of an existing file.
pub fn filter_missing(
    descriptors: Vec<ImageDescriptor>,
    local_names: &[String],
) -> Vec<ImageDescriptor> {
    let tokens: Vec<&str> = local_names
        .iter()
        .filter_map(|name| file_token(name))
        .collect();

    descriptors
        .into_iter()
        .filter(|descriptor| {
            match tokens.iter().find(|token| descriptor.url.contains(**token)) {
                Some(token) => {
                    debug!("Skipping {}, already have '{}'", descriptor.url, token);
                    false
                }
                None => true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(url: &str) -> ImageDescriptor {
        ImageDescriptor {
            url: url.to_string(),
            ..Default::default()
        }
    }

    fn three() -> Vec<ImageDescriptor> {
        vec![
            descriptor("/th?id=OHR.Altschlossfelsen_EN-US1494_1920x1080.jpg&pid=hp"),
            descriptor("/th?id=OHR.LaDigue_EN-US2231_1920x1080.jpg&pid=hp"),
            descriptor("/th?id=OHR.Matterhorn_EN-US9012_1920x1080.jpg&pid=hp"),
        ]
    }

    #[test]
    fn token_of_plain_name() {
        assert_eq!(
            file_token("OHR.LaDigue_EN-US2231_1920x1080.jpg"),
            Some("OHR.LaDigue_EN-US2231")
        );
        assert_eq!(file_token("a/b/Foo_ROW1_1366x768.jpg"), Some("Foo_ROW1"));
    }

    #[test]
    fn token_needs_an_underscore() {
        assert_eq!(file_token("wallpaper.jpg"), None);
        assert_eq!(file_token("_1920x1080.jpg"), None);
        assert_eq!(file_token("dir/_x.jpg"), None);
    }

    #[test]
    fn empty_directory_passes_everything() {
        assert_eq!(filter_missing(three(), &[]), three());
    }

    #[test]
    fn matching_file_excludes_its_descriptor() {
        let local = vec!["OHR.LaDigue_EN-US2231_1366x768.jpg".to_string()];
        let result = filter_missing(three(), &local);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|d| !d.url.contains("LaDigue")));
    }

    #[test]
    fn unrelated_files_change_nothing() {
        let local = vec![
            "notes.txt".to_string(),
            "Something_Else_1920x1080.jpg".to_string(),
        ];
        assert_eq!(filter_missing(three(), &local), three());
    }

    #[test]
    fn filtering_is_idempotent() {
        let local = vec![
            "OHR.Matterhorn_EN-US9012_1920x1080.jpg".to_string(),
            "OHR.Altschlossfelsen_EN-US1494_800x600.jpg".to_string(),
        ];
        let once = filter_missing(three(), &local);
        let twice = filter_missing(once.clone(), &local);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[tokio::test]
    async fn scan_lists_entries_and_skips_partials() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Foo_ROW1_1920x1080.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join(".Bar_ROW2_1920x1080.jpg.part"), b"x").unwrap();

        let names = scan_directory(dir.path()).await.unwrap();
        assert_eq!(names, vec!["Foo_ROW1_1920x1080.jpg".to_string()]);
    }

    #[tokio::test]
    async fn scan_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = scan_directory(&missing).await.unwrap_err();
        assert_eq!(err.path, missing);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn scan_rejects_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("image.jpg");
        std::fs::write(&file, b"x").unwrap();
        let err = scan_directory(&file).await.unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::NotADirectory);
        assert!(err.to_string().contains("not a directory"));
    }
}
