//! The screen controller: visible screens, dialogs and update mediation.

use std::sync::Arc;

use url::Url;

use super::dialogs::{ClipboardItem, Dialog};
use super::navigation::{BackAction, ChannelRef, Navigation};
use crate::error::Result;
use crate::state::workspace::{MAIN_SCREEN_KEY, SEARCH_SCREEN_KEY};
use crate::state::{AppEvent, AppSettings, AppState, SavedState, Screen, Session, UpdateStatus};
use crate::updater::{InstallRequest, UpdateInfo, UpgradeEvent, UpgradePhase};

pub struct ScreenController {
    session: Arc<Session>,
    state: AppState,
    /// Back stack; `Main` is always at the bottom.
    screens: Vec<Screen>,
    /// Open dialogs; the last one is on top.
    dialogs: Vec<Dialog>,
    upgrade_phase: UpgradePhase,
    upgrade_version: String,
}

impl ScreenController {
    /// Cold start when `saved` is `None`, warm start otherwise.
    pub fn new(session: Arc<Session>, settings: AppSettings, saved: Option<SavedState>) -> Self {
        let mut screens = vec![Screen::Main];

        if let Some(saved) = &saved {
            if let Some(screen @ Screen::SearchResults { .. }) = saved.get(SEARCH_SCREEN_KEY) {
                screens.push(screen.clone());
            }
            log::debug!("Restored {} saved screen(s)", saved.screens.len());
        }

        Self {
            session,
            state: AppState::new(settings),
            screens,
            dialogs: Vec::new(),
            upgrade_phase: UpgradePhase::Idle,
            upgrade_version: String::new(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn visible_screen(&self) -> &Screen {
        self.screens.last().unwrap_or(&Screen::Main)
    }

    /// The dialog on top.
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialogs.last()
    }

    pub fn dialogs(&self) -> &[Dialog] {
        &self.dialogs
    }

    pub fn upgrade_phase(&self) -> UpgradePhase {
        self.upgrade_phase
    }

    /// Drain events for the front-end.
    pub fn take_events(&mut self) -> Vec<AppEvent> {
        self.state.take_events()
    }

    /// Screens to restore on the next warm start.
    ///
    /// Search results are only saved while they are visible.
    pub fn save_state(&self) -> SavedState {
        let mut saved = SavedState::default();
        saved.put(MAIN_SCREEN_KEY, Screen::Main);
        if let screen @ Screen::SearchResults { .. } = self.visible_screen() {
            saved.put(SEARCH_SCREEN_KEY, screen.clone());
        }
        saved
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn on_search_submitted(&mut self, query: impl Into<String>) {
        let screen = Screen::SearchResults { query: query.into() };
        self.screens.push(screen.clone());
        self.state.emit(AppEvent::ScreenShown(screen));
    }

    pub fn on_channel_selected(&self, channel: ChannelRef) -> Navigation {
        log::debug!("Opening channel {}", channel.id());
        Navigation::OpenChannelBrowser(channel)
    }

    pub fn on_open_preferences(&self) -> Navigation {
        Navigation::OpenPreferences
    }

    /// Back on the main screen minimizes the app instead of discarding it.
    pub fn on_back_pressed(&mut self) -> BackAction {
        if self.screens.len() > 1
            && let Some(screen) = self.screens.pop()
        {
            self.state.emit(AppEvent::ScreenPopped(screen.clone()));
            return BackAction::Pop(screen);
        }

        self.state.emit(AppEvent::MinimizedToHome);
        BackAction::MinimizeToHome
    }

    /// The "up" action: back, but only away from the main screen.
    pub fn on_home_selected(&mut self) -> Option<BackAction> {
        if *self.visible_screen() == Screen::Main {
            None
        } else {
            Some(self.on_back_pressed())
        }
    }

    // =========================================================================
    // Enter video URL
    // =========================================================================

    /// Show the video URL dialog, pre-filled from the clipboard when it holds text.
    ///
    /// Returns `None` while a non-cancelable dialog (the download) is showing.
    pub fn open_enter_video_url(&mut self, clipboard: Option<&ClipboardItem>) -> Option<&Dialog> {
        if self.dialogs.iter().any(|d| !d.is_cancelable()) {
            log::debug!("Video URL dialog refused while a download is running");
            return None;
        }

        self.remove_dialog(|d| matches!(d, Dialog::EnterVideoUrl { .. }));
        let prefill = clipboard.and_then(ClipboardItem::as_plain_text).unwrap_or_default();
        self.dialogs.push(Dialog::EnterVideoUrl { prefill: prefill.to_string() });
        self.dialogs.last()
    }

    pub fn on_video_url_cleared(&mut self) {
        for dialog in &mut self.dialogs {
            if let Dialog::EnterVideoUrl { prefill } = dialog {
                prefill.clear();
            }
        }
    }

    /// Play the entered URL. Blank input just closes the dialog.
    pub fn on_video_url_entered(&mut self, text: &str) -> Option<Navigation> {
        self.remove_dialog(|d| matches!(d, Dialog::EnterVideoUrl { .. }));

        let url = text.trim();
        if url.is_empty() { None } else { Some(Navigation::PlayVideo(url.to_string())) }
    }

    /// Close a cancelable dialog. The download dialog cannot be dismissed.
    pub fn dismiss_dialog(&mut self) -> Option<Dialog> {
        match self.dialogs.last() {
            Some(dialog) if dialog.is_cancelable() => self.dialogs.pop(),
            _ => None,
        }
    }

    /// Remove the topmost dialog matching `pred`, wherever it sits in the stack.
    fn remove_dialog(&mut self, pred: impl Fn(&Dialog) -> bool) -> Option<Dialog> {
        let index = self.dialogs.iter().rposition(pred)?;
        Some(self.dialogs.remove(index))
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Whether a startup check should be started for this controller.
    pub fn should_check_for_updates(&self) -> bool {
        self.state.settings.updater.check_on_startup && !self.session.update_check_ran()
    }

    pub fn on_update_check_started(&mut self) {
        self.state.update_status = UpdateStatus::Checking;
    }

    /// Offer the update when the check found one.
    pub fn on_update_check_finished(&mut self, info: UpdateInfo) -> Option<&Dialog> {
        let (Some(version), Some(download_url)) = (info.latest_version, info.download_url) else {
            self.state.update_status = UpdateStatus::Idle;
            return None;
        };

        let version = version.to_string();
        self.state.update_status =
            UpdateStatus::Available { version: version.clone(), download_url: download_url.clone() };
        self.state.emit(AppEvent::UpdateAvailable { version: version.clone() });
        // Stacks above whatever the user already has open
        self.dialogs.push(Dialog::UpdateAvailable { version, download_url });
        self.dialogs.last()
    }

    /// "Update" chosen: returns the URL to hand to the downloader.
    pub fn on_update_confirmed(&mut self) -> Option<Url> {
        let Some(Dialog::UpdateAvailable { version, download_url }) =
            self.remove_dialog(|d| matches!(d, Dialog::UpdateAvailable { .. }))
        else {
            log::debug!("Update confirmed without an update dialog");
            return None;
        };

        self.upgrade_version = version.clone();
        self.state.update_status = UpdateStatus::Downloading { version, progress_pct: None };
        Some(download_url)
    }

    /// "Later" chosen. The next offer comes with the next session.
    pub fn on_update_postponed(&mut self) {
        if self.remove_dialog(|d| matches!(d, Dialog::UpdateAvailable { .. })).is_some() {
            self.state.emit(AppEvent::UpdatePostponed);
        }
    }

    /// Apply one upgrade event. Returns the install request once the package is ready.
    pub fn on_upgrade_event(&mut self, event: UpgradeEvent) -> Option<InstallRequest> {
        match event {
            UpgradeEvent::Phase(UpgradePhase::Preparing) => {
                self.upgrade_phase = UpgradePhase::Preparing;
                self.remove_dialog(|d| matches!(d, Dialog::DownloadProgress { .. }));
                self.dialogs.push(Dialog::DownloadProgress { percent: None });
                self.state.emit(AppEvent::UpgradeStarted);
                None
            }
            UpgradeEvent::Phase(phase) => {
                self.upgrade_phase = phase;
                None
            }
            UpgradeEvent::Progress(progress) => {
                let pct = progress.percent();
                for dialog in &mut self.dialogs {
                    if let Dialog::DownloadProgress { percent } = dialog {
                        *percent = pct;
                    }
                }
                self.state.update_status = UpdateStatus::Downloading {
                    version: self.upgrade_version.clone(),
                    progress_pct: pct,
                };
                None
            }
            UpgradeEvent::Finished(outcome) => {
                self.upgrade_phase = UpgradePhase::Completed;
                self.dismiss_progress();

                let request = outcome.and_then(|path| InstallRequest::for_package(&path));
                match request {
                    Ok(request) => {
                        self.upgrade_phase = UpgradePhase::PromptingInstall;
                        self.state.update_status = UpdateStatus::ReadyToInstall {
                            version: self.upgrade_version.clone(),
                            path: request.path.clone(),
                        };
                        self.state.emit(AppEvent::ReadyToInstall { path: request.path.clone() });
                        Some(request)
                    }
                    Err(e) => {
                        self.state.update_status = UpdateStatus::Failed(e.to_string());
                        self.state.emit(AppEvent::UpgradeFailed { error: e.to_string() });
                        None
                    }
                }
            }
        }
    }

    /// Record whether the installer could be launched.
    pub fn on_install_result(&mut self, result: Result<()>) {
        match result {
            Ok(()) => self.state.emit(AppEvent::InstallerLaunched),
            Err(e) => {
                self.state.update_status = UpdateStatus::Failed(e.to_string());
                self.state.emit(AppEvent::InstallFailed { error: e.to_string() });
            }
        }
    }

    fn dismiss_progress(&mut self) {
        if self.remove_dialog(|d| matches!(d, Dialog::DownloadProgress { .. })).is_some() {
            self.state.emit(AppEvent::ProgressDismissed);
        }
    }
}
