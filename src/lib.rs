pub mod app;
pub mod error;
pub mod state;
pub mod updater;
