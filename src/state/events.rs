//! Application events for front-end reactivity

use std::path::PathBuf;

use crate::state::workspace::Screen;

/// Events emitted by the screen controller, drained by the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // Navigation
    ScreenShown(Screen),
    ScreenPopped(Screen),
    MinimizedToHome,

    // Update check
    UpdateAvailable { version: String },
    UpdatePostponed,

    // Upgrade
    UpgradeStarted,
    ProgressDismissed,
    UpgradeFailed { error: String },
    ReadyToInstall { path: PathBuf },
    InstallerLaunched,
    InstallFailed { error: String },
}
