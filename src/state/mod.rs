// Application state management

pub mod app_state;
pub mod commands;
pub mod config;
pub mod events;
pub mod session;
pub mod settings;
pub mod status;
pub mod workspace;

pub use app_state::AppState;
pub use app_state::updater::UpdateStatus;
pub use commands::AppCommands;
pub use config::ConfigManager;
pub use events::AppEvent;
pub use session::Session;
pub use settings::{AppSettings, UpdaterSettings};
pub use status::{StatusLevel, StatusMessage};
pub use workspace::{SavedState, Screen};
