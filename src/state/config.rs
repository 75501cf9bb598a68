// Configuration management for persistent state

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::settings::AppSettings;
use crate::state::workspace::SavedState;

#[cfg(debug_assertions)]
const APP_NAME: &str = "skytube-dev";

#[cfg(not(debug_assertions))]
const APP_NAME: &str = "skytube";

/// Manages persistent configuration files
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager, initializing the config directory if needed
    pub fn new() -> Result<Self> {
        Self::with_config_dir(Self::get_config_dir()?)
    }

    /// Use `config_dir` instead of the platform default
    pub fn with_config_dir(config_dir: PathBuf) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the platform-specific config directory
    fn get_config_dir() -> Result<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME)).context("Could not determine config directory")
    }

    /// Get path to a specific config file
    fn file_path(&self, filename: &str) -> PathBuf {
        self.config_dir.join(filename)
    }

    /// Load data from a JSON file
    fn load_json<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.file_path(filename);

        if !path.exists() {
            return Ok(None);
        }

        let data =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", filename))?;

        let value: T = serde_json::from_str(&data)
            .with_context(|| format!("Failed to deserialize {}", filename))?;

        Ok(Some(value))
    }

    /// Save data to a JSON file (atomic via temp + rename).
    fn save_json<T: Serialize + ?Sized>(&self, filename: &str, data: &T) -> Result<()> {
        let path = self.file_path(filename);

        let json = serde_json::to_string_pretty(data)
            .with_context(|| format!("Failed to serialize {}", filename))?;

        atomic_write(&path, json.as_bytes())
            .with_context(|| format!("Failed to write {}", filename))?;

        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    const SETTINGS_FILE: &'static str = "settings.json";

    /// Load application settings from disk
    pub fn load_settings(&self) -> Result<AppSettings> {
        Ok(self.load_json(Self::SETTINGS_FILE)?.unwrap_or_default())
    }

    /// Save application settings to disk
    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.save_json(Self::SETTINGS_FILE, settings)
    }

    // =========================================================================
    // Workspace
    // =========================================================================

    const WORKSPACE_FILE: &'static str = "workspace.json";

    /// Load the screens saved by the last controller, if any
    pub fn load_workspace(&self) -> Result<Option<SavedState>> {
        self.load_json(Self::WORKSPACE_FILE)
    }

    /// Save the controller's screens to disk
    pub fn save_workspace(&self, workspace: &SavedState) -> Result<()> {
        self.save_json(Self::WORKSPACE_FILE, workspace)
    }
}

/// Write `data` to `path` atomically: write to a sibling temp file first, then
/// rename. Readers see either the old content or the new content.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(path);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
