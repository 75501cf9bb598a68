//! Mutable state owned by a screen controller.

mod status;
pub mod updater;

use crate::state::events::AppEvent;
use crate::state::settings::AppSettings;
use crate::state::status::StatusMessage;

use self::updater::UpdateStatus;

pub struct AppState {
    pub settings: AppSettings,
    pub update_status: UpdateStatus,
    status_message: Option<StatusMessage>,
    events: Vec<AppEvent>,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            update_status: UpdateStatus::Idle,
            status_message: None,
            events: Vec::new(),
        }
    }

    pub fn status_message(&self) -> Option<&StatusMessage> {
        self.status_message.as_ref()
    }

    pub fn set_status_message(&mut self, message: Option<StatusMessage>) {
        self.status_message = message;
    }

    /// Record an event for the front-end and derive the status message from it.
    pub fn emit(&mut self, event: AppEvent) {
        self.update_status_from_event(&event);
        self.events.push(event);
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::status::StatusLevel;

    #[test]
    fn failure_events_set_error_message() {
        let mut state = AppState::new(AppSettings::default());
        state.emit(AppEvent::UpgradeFailed { error: "connection reset".into() });

        let message = state.status_message().unwrap();
        assert_eq!(message.level, StatusLevel::Error);
        assert!(message.text.contains("connection reset"));
        assert_eq!(state.take_events().len(), 1);
        assert!(state.take_events().is_empty());
    }
}
