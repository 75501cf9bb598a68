//! Screens and the state saved across controller re-creation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity key of the main content screen.
pub const MAIN_SCREEN_KEY: &str = "main";
/// Identity key of the search results screen.
pub const SEARCH_SCREEN_KEY: &str = "search";

/// Content screens hosted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// The main video grid.
    Main,
    SearchResults { query: String },
}

/// Screens saved by identity key, restored on a warm start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub screens: BTreeMap<String, Screen>,
}

impl SavedState {
    pub fn get(&self, key: &str) -> Option<&Screen> {
        self.screens.get(key)
    }

    pub fn put(&mut self, key: &str, screen: Screen) {
        self.screens.insert(key.to_string(), screen);
    }
}
