use std::path::PathBuf;

use url::Url;

use super::download::{DownloadProgress, Downloader};
use crate::error::Error;

/// Result of an upgrade download: the package path or the cause of failure.
pub type DownloadOutcome = std::result::Result<PathBuf, Error>;

/// Lifecycle of an upgrade, as seen by whoever presents it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpgradePhase {
    #[default]
    Idle,
    Preparing,
    DeletingStaleFiles,
    Downloading,
    Completed,
    PromptingInstall,
}

/// Everything an [`UpgradeTask`] reports, in emission order.
///
/// A run always starts with `Phase(Preparing)` and ends with exactly one `Finished`.
#[derive(Debug)]
pub enum UpgradeEvent {
    Phase(UpgradePhase),
    Progress(DownloadProgress),
    Finished(DownloadOutcome),
}

/// Deletes stale packages, then downloads the new one.
pub struct UpgradeTask {
    downloader: Downloader,
    url: Url,
}

impl UpgradeTask {
    pub fn new(downloader: Downloader, url: Url) -> Self {
        Self { downloader, url }
    }

    /// Run to completion, handing every event to `emit`.
    pub async fn run<F>(self, mut emit: F)
    where
        F: FnMut(UpgradeEvent),
    {
        emit(UpgradeEvent::Phase(UpgradePhase::Preparing));

        let outcome = self.execute(&mut emit).await;
        if let Err(e) = &outcome {
            log::error!("Unable to upgrade app: {e}");
        }

        emit(UpgradeEvent::Finished(outcome));
    }

    async fn execute<F>(&self, emit: &mut F) -> DownloadOutcome
    where
        F: FnMut(UpgradeEvent),
    {
        let cache = self.downloader.cache();
        cache.prepare()?;

        emit(UpgradeEvent::Phase(UpgradePhase::DeletingStaleFiles));
        let deleted = cache.delete_stale();
        log::debug!("Removed {deleted} stale installer(s) from {}", cache.dir().display());

        emit(UpgradeEvent::Phase(UpgradePhase::Downloading));
        self.downloader.download(&self.url, |progress| emit(UpgradeEvent::Progress(progress))).await
    }
}
