use serde::{Deserialize, Serialize};

/// A YouTube channel as already loaded by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub subscriber_count: Option<u64>,
}

/// A channel to browse: either already in memory, or only its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelRef {
    Loaded(Channel),
    Id(String),
}

impl ChannelRef {
    pub fn id(&self) -> &str {
        match self {
            ChannelRef::Loaded(channel) => &channel.id,
            ChannelRef::Id(id) => id,
        }
    }
}

/// Requests to open something outside the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    OpenChannelBrowser(ChannelRef),
    PlayVideo(String),
    OpenPreferences,
}

/// What the front-end should do when back is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackAction {
    /// Send the app to the background, keeping all state.
    MinimizeToHome,
    /// The given screen was popped; show the one below it.
    Pop(crate::state::Screen),
}
