use indicatif::{HumanBytes, HumanDuration, ProgressBar};
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::{Arc, atomic::AtomicBool};
use tokio::time::{Duration, Instant};

use crate::download::utils;
use crate::error::DownloadError;
use crate::resolve::ResolvedDownload;

/// A file that was fully written and moved into place.
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: [u8; 32],
    pub elapsed: Duration,
}

/// Stream `resolved.source_url` into `resolved.target_path`.
///
/// Bytes go to a hidden `.part` sibling first, which is renamed onto the
/// target once the stream is complete and synced. The partial file is removed
/// on every failure.
pub async fn download_file_async(
    client: &reqwest::Client,
    resolved: &ResolvedDownload,
    bar: ProgressBar,
    interrupted: Arc<AtomicBool>,
) -> Result<Downloaded, DownloadError> {
    let start_time = Instant::now();
    let partial = utils::build_partial_path(&resolved.target_path);
    bar.set_message(format!("Downloading {}", resolved.source_url));

    let result = match stream_to_file(client, resolved, &partial, &bar, &interrupted).await {
        Ok(_) if interrupted.load(Ordering::SeqCst) => Err(DownloadError::Interrupted),
        Ok((bytes, sha256)) => tokio::fs::rename(&partial, &resolved.target_path)
            .await
            .map(|_| (bytes, sha256))
            .map_err(|source| io_error(&resolved.target_path, source)),
        Err(err) => Err(err),
    };

    match result {
        Ok((bytes, sha256)) => {
            bar.finish_with_message(format!(
                "Saved {}: {} in {}.",
                resolved.target_path.display(),
                HumanBytes(bytes),
                HumanDuration(start_time.elapsed())
            ));
            Ok(Downloaded {
                path: resolved.target_path.clone(),
                bytes,
                sha256,
                elapsed: start_time.elapsed(),
            })
        }
        Err(err) => {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!("Could not remove {}: {}", partial.display(), cleanup);
                }
            }
            bar.abandon_with_message(format!("Failed {}: {}", resolved.source_url, err));
            Err(err)
        }
    }
}

async fn stream_to_file(
    client: &reqwest::Client,
    resolved: &ResolvedDownload,
    partial: &Path,
    bar: &ProgressBar,
    interrupted: &AtomicBool,
) -> Result<(u64, [u8; 32]), DownloadError> {
    use futures::StreamExt;
    use tokio::fs::OpenOptions;
    use tokio::io::AsyncWriteExt;
    use tokio::time::interval;

    let start_time = Instant::now();
    let interrupt = utils::wait_for_interrupt(interrupted);
    tokio::pin!(interrupt);

    let response = tokio::select! {
        biased;
        _ = &mut interrupt => return Err(DownloadError::Interrupted),
        response = client.get(resolved.source_url.clone()).send() => response?,
    };
    if !response.status().is_success() {
        return Err(DownloadError::Status {
            url: resolved.source_url.to_string(),
            status: response.status(),
        });
    }
    let content_length = response.content_length();
    debug!(
        "Streaming {} into {}",
        resolved.source_url,
        partial.display()
    );

    let mut dest = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(partial)
        .await
        .map_err(|source| io_error(partial, source))?;

    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();
    let mut progress_interval = interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            biased;
            _ = &mut interrupt => return Err(DownloadError::Interrupted),
            chunk_option = stream.next() => {
                match chunk_option {
                    Some(chunk_result) => {
                        let chunk = chunk_result?;
                        hasher.update(&chunk);
                        dest.write_all(&chunk)
                            .await
                            .map_err(|source| io_error(partial, source))?;
                        downloaded += chunk.len() as u64;
                    }
                    None => break,
                }
            }
            _ = progress_interval.tick() => {
                let speed = downloaded / start_time.elapsed().as_secs().max(1);
                let message = match content_length {
                    Some(len) => format!(
                        "{}: {}/{}, speed: {}/s.",
                        resolved.target_path.display(),
                        HumanBytes(downloaded),
                        HumanBytes(len),
                        HumanBytes(speed),
                    ),
                    None => format!(
                        "{}: {}, speed: {}/s.",
                        resolved.target_path.display(),
                        HumanBytes(downloaded),
                        HumanBytes(speed),
                    ),
                };
                bar.set_message(message);
            }
        }
    }
    dest.flush()
        .await
        .map_err(|source| io_error(partial, source))?;
    dest.sync_all()
        .await
        .map_err(|source| io_error(partial, source))?;

    Ok((downloaded, hasher.finalize().into()))
}

fn io_error(path: &Path, source: io::Error) -> DownloadError {
    DownloadError::Io {
        path: path.to_path_buf(),
        source,
    }
}
