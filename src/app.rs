//! Screen controller and the values it hands to front-ends.

pub mod controller;
pub mod dialogs;
pub mod navigation;

pub use controller::ScreenController;
pub use dialogs::{ClipboardItem, Dialog};
pub use navigation::{BackAction, Channel, ChannelRef, Navigation};
