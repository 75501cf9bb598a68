//! Application settings with persistence.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Latest published release of the app.
pub const DEFAULT_MANIFEST_URL: &str = "https://api.github.com/repos/ram-on/SkyTube/releases/latest";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub updater: UpdaterSettings,
}

/// Self-update settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdaterSettings {
    #[serde(default = "default_true")]
    pub check_on_startup: bool,
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,
    /// Where installer packages are downloaded. Defaults to the user cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Command used to open a package, e.g. `adb install`. Defaults to the desktop opener.
    #[serde(default)]
    pub installer_command: Option<String>,
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self {
            check_on_startup: true,
            manifest_url: default_manifest_url(),
            cache_dir: None,
            installer_command: None,
            worker_threads: default_worker_threads(),
        }
    }
}

impl UpdaterSettings {
    /// Resolved installer cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir().unwrap_or_else(std::env::temp_dir).join("skytube").join("updates")
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_manifest_url() -> String {
    DEFAULT_MANIFEST_URL.to_string()
}

fn default_worker_threads() -> usize {
    2
}
