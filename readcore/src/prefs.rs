//! Persisted theme preferences
//!
//! Stored as two independent entries, `is_dark_mode` and `follow_system`,
//! in the app's `settings.json`. A missing entry falls back to its own
//! default without touching the other one.

use crate::storage::{config_dir, read_json, write_json, Result, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreferences {
    /// Manual dark mode choice; ignored for display while following the system
    #[serde(rename = "is_dark_mode", default)]
    pub dark_mode: bool,
    #[serde(default = "default_follow_system")]
    pub follow_system: bool,
}

fn default_follow_system() -> bool {
    true
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            follow_system: default_follow_system(),
        }
    }
}

impl ThemePreferences {
    pub fn config_path(app_name: &str) -> PathBuf {
        config_dir(app_name).join("settings.json")
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        match read_json::<Self>(path) {
            Ok(prefs) => {
                debug!(
                    dark_mode = prefs.dark_mode,
                    follow_system = prefs.follow_system,
                    "loaded theme preferences"
                );
                prefs
            }
            Err(StorageError::NotFound(_)) => {
                debug!(path = %path.display(), "no theme preferences yet, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), "failed to read theme preferences: {}", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!(
            dark_mode = self.dark_mode,
            follow_system = self.follow_system,
            "saving theme preferences"
        );
        write_json(path, self)
    }

    /// The theme actually applied: the host's when following the system,
    /// the stored choice otherwise.
    pub fn effective_theme(&self, system_is_dark: bool) -> bool {
        if self.follow_system {
            system_is_dark
        } else {
            self.dark_mode
        }
    }
}
