use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use indicatif::{HumanDuration, MultiProgress, ProgressBar};
use log::{error, info};

use crate::archive::fetch_descriptors;
use crate::config::Config;
use crate::download::utils::wait_for_interrupt;
use crate::download::{Downloaded, download_file_async};
use crate::error::{DownloadError, Error};
use crate::local::{filter_missing, scan_directory};
use crate::resolve::resolve;

/// Outcome of every download dispatched by one run.
#[derive(Debug, Default)]
pub struct Summary {
    pub downloaded: Vec<Downloaded>,
    /// Source URL (or the unresolvable relative URL) and why it failed.
    pub failed: Vec<(String, DownloadError)>,
}

impl Summary {
    pub fn is_up_to_date(&self) -> bool {
        self.downloaded.is_empty() && self.failed.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetch the archive, skip what is already on disk, download the rest.
///
/// Returns only once every dispatched download has finished. Setting
/// `interrupted` before the downloads start aborts the run with
/// [`Error::Interrupted`]; afterwards it fails each download still in flight.
pub async fn run(config: &Config, interrupted: Arc<AtomicBool>) -> Result<Summary, Error> {
    let client = reqwest::Client::new();

    let descriptors = tokio::select! {
        biased;
        _ = wait_for_interrupt(&interrupted) => return Err(Error::Interrupted),
        descriptors = fetch_descriptors(&client, config) => descriptors?,
    };
    let local_names = scan_directory(&config.output_dir).await?;
    let missing = filter_missing(descriptors, &local_names);

    let mut summary = Summary::default();
    if missing.is_empty() {
        info!("You are up to date!");
        return Ok(summary);
    }
    info!("{} new image(s) to download", missing.len());

    let progress = if config.show_progress {
        MultiProgress::new()
    } else {
        MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden())
    };

    let mut downloads = Vec::with_capacity(missing.len());
    for descriptor in &missing {
        match resolve(config, &descriptor.url) {
            Ok(resolved) => downloads.push(resolved),
            Err(err) => {
                error!("{}", err);
                summary.failed.push((descriptor.url.clone(), err));
            }
        }
    }

    if interrupted.load(Ordering::SeqCst) {
        return Err(Error::Interrupted);
    }

    let tasks = downloads.iter().map(|resolved| {
        let bar = progress.add(ProgressBar::new_spinner());
        if config.show_progress {
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
        }
        let interrupted = interrupted.clone();
        let client = &client;
        async move {
            let result = download_file_async(client, resolved, bar, interrupted).await;
            (resolved, result)
        }
    });

    for (resolved, result) in join_all(tasks).await {
        match result {
            Ok(downloaded) => {
                info!(
                    "{} in {} (SHA256: {})",
                    downloaded.path.display(),
                    HumanDuration(downloaded.elapsed),
                    hex::encode(downloaded.sha256)
                );
                summary.downloaded.push(downloaded);
            }
            Err(err) => {
                error!("{}: {}", resolved.source_url, err);
                summary.failed.push((resolved.source_url.to_string(), err));
            }
        }
    }

    Ok(summary)
}
