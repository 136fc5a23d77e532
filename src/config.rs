//! Persisted display preference
//!
//! One key/value pair: the theme choice, stored as JSON at
//! `~/.config/atlas-studio/config.json`. Read once at startup, written on
//! toggle. Absence means the default; write failures are logged, never
//! fatal.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn toggled(self) -> Self {
        match self {
            ThemeChoice::Dark => ThemeChoice::Light,
            ThemeChoice::Light => ThemeChoice::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeChoice,
}

impl Preferences {
    fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("atlas-studio").join("config.json"))
    }

    /// Load preferences from the default location.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load preferences from `path`; missing or unreadable files fall back
    /// to the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no preference file at {:?}", path);
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(prefs) => {
                    log::info!("loaded preferences from {:?}", path);
                    prefs
                }
                Err(e) => {
                    log::warn!("failed to parse {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("failed to read {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save preferences to the default location.
    pub fn save(&self) {
        if let Some(path) = Self::default_path() {
            if let Err(e) = self.save_to(&path) {
                log::warn!("failed to save preferences: {}", e);
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
