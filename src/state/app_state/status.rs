//! Status message updates derived from events.

use crate::state::StatusMessage;
use crate::state::events::AppEvent;

use super::AppState;

impl AppState {
    pub(crate) fn update_status_from_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::UpdateAvailable { version } => {
                self.set_status_message(Some(StatusMessage::info(format!(
                    "Update available: v{version}"
                ))));
            }
            AppEvent::UpgradeStarted => {
                self.set_status_message(Some(StatusMessage::info("Downloading update...")));
            }
            AppEvent::UpgradeFailed { error } => {
                self.set_status_message(Some(StatusMessage::error(format!(
                    "Update failed: {error}"
                ))));
            }
            AppEvent::ReadyToInstall { .. } => {
                self.set_status_message(Some(StatusMessage::info("Update downloaded")));
            }
            AppEvent::InstallFailed { error } => {
                self.set_status_message(Some(StatusMessage::error(format!(
                    "Install failed: {error}"
                ))));
            }
            AppEvent::UpdatePostponed => {
                self.set_status_message(None);
            }
            _ => {}
        }
    }
}
