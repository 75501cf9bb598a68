use futures::channel::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use url::Url;

use crate::error::Result;
use crate::state::Session;
use crate::updater::{
    Downloader, InstallRequest, Installer, UpdateChecker, UpdateInfo, UpgradeEvent, UpgradeTask,
};

use super::AppCommands;

impl AppCommands {
    /// Start the session's update check in the background.
    ///
    /// Returns `None` when this session already ran (or is running) its check.
    /// Must be called from within a tokio runtime.
    pub fn check_for_updates(
        session: &Session,
        checker: UpdateChecker,
    ) -> Option<JoinHandle<UpdateInfo>> {
        if !session.claim_update_check() {
            log::debug!("Update check already ran in this session");
            return None;
        }

        Some(tokio::spawn(async move { checker.check().await }))
    }

    /// Download the package at `url` in the background.
    ///
    /// Events arrive in emission order and the stream ends after `Finished`.
    pub fn download_update(downloader: Downloader, url: Url) -> UnboundedReceiver<UpgradeEvent> {
        let (tx, rx) = mpsc::unbounded::<UpgradeEvent>();

        tokio::spawn(async move {
            UpgradeTask::new(downloader, url)
                .run(|event| {
                    // Receiver gone means nobody is presenting the upgrade anymore
                    let _ = tx.unbounded_send(event);
                })
                .await;
        });

        rx
    }

    /// Hand the package to the installer.
    pub fn install_update(installer: &dyn Installer, request: &InstallRequest) -> Result<()> {
        installer.launch(request).inspect_err(|e| log::error!("Install failed: {e}"))
    }
}
