//! User settings, read from `~/.config/todo-txt-tui/settings.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TodoError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stamp completion dates on completion and creation dates on add.
    pub enable_completion_and_creation_dates: bool,

    /// Show tasks tagged `h:1`.
    pub display_hidden_tasks_by_default: bool,

    /// Hide tasks whose `t:` date is still in the future.
    pub hide_tasks_with_threshold_dates: bool,

    /// Seconds between checks of the task file for external changes.
    pub sync_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_completion_and_creation_dates: true,
            display_hidden_tasks_by_default: false,
            hide_tasks_with_threshold_dates: true,
            sync_interval_secs: 2,
        }
    }
}

/// Default settings location.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("todo-txt-tui").join("settings.toml"))
}

impl Settings {
    /// Load settings from `path`, or from the default location. A missing
    /// file means defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_settings_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Settings::default()),
            },
        };
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| TodoError::FileUnreadable {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| TodoError::Config { path, message })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }
}
