use bing_wallpaper::config::{Config, DEFAULT_HOST, DEFAULT_LOCALE, DEFAULT_RESOLUTION};
use bing_wallpaper::{Summary, run};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use url::Url;

/// Grab the latest daily Bing wallpapers.
#[derive(clap::Parser)]
#[command(version, about, long_about=None)]
pub struct Cli {
    /// Output path
    #[arg(short, long)]
    output: PathBuf,

    /// Image resolution
    #[arg(short, long, default_value = DEFAULT_RESOLUTION)]
    resolution: String,

    /// Localization
    #[arg(short, long, default_value = DEFAULT_LOCALE)]
    locale: String,

    /// Archive and image host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: Url,

    /// Don't draw progress spinners
    #[arg(short, long)]
    quiet: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            output_dir: std::path::absolute(&self.output).unwrap_or_else(|_| self.output.clone()),
            resolution: self.resolution.clone(),
            locale: self.locale.clone(),
            host: self.host.clone(),
            show_progress: !self.quiet,
        }
    }

    /// Run the whole fetch/filter/download pipeline and report what happened.
    pub async fn execute(self) -> anyhow::Result<Summary> {
        let config = self.config();
        let interrupted = Arc::new(AtomicBool::new(false));
        let interrupted_clone = interrupted.clone();
        // First signal winds the run down, a second one exits immediately.
        ctrlc::set_handler(move || {
            if interrupted_clone.swap(true, Ordering::SeqCst) {
                eprintln!("Interrupted twice, exiting.");
                std::process::exit(130);
            }
            log::warn!("Interrupted, cancelling downloads...");
        })?;

        let summary = run(&config, interrupted).await?;
        if !summary.is_up_to_date() {
            let failed = if summary.failed.is_empty() {
                "0 failed".normal()
            } else {
                format!("{} failed", summary.failed.len()).as_str().red()
            };
            log::info!(
                "{}, {}.",
                format!("{} downloaded", summary.downloaded.len())
                    .as_str()
                    .green(),
                failed
            );
        }
        Ok(summary)
    }
}
