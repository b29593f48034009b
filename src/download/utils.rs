use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::{Duration, interval};

const PARTIAL_SUFFIX: &str = ".part";

/// Hidden sibling the download is streamed into before being renamed.
pub fn build_partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tmp.bin".to_string());
    target.with_file_name(format!(".{}{}", name, PARTIAL_SUFFIX))
}

pub fn is_partial_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

/// Resolves once `interrupted` is set, polling every 500ms.
///
/// Meant to be raced against network I/O in a `tokio::select!`.
pub async fn wait_for_interrupt(interrupted: &AtomicBool) {
    let mut interrupt_interval = interval(Duration::from_millis(500));
    loop {
        interrupt_interval.tick().await;
        if interrupted.load(Ordering::SeqCst) {
            return;
        }
    }
}
