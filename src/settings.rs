//! User-facing settings and their on-disk persistence.
//!
//! Settings are a single JSON record merged field by field over
//! defaults, so records written by older builds keep loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Color theme for the whole UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Dark,
    Light,
}

impl ThemeChoice {
    /// Flip between dark and light.
    pub fn toggled(self) -> Self {
        match self {
            ThemeChoice::Dark => ThemeChoice::Light,
            ThemeChoice::Light => ThemeChoice::Dark,
        }
    }
}

/// Base font size for the transcript and controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    /// Scale factor applied to the default text styles.
    pub fn scale(self) -> f32 {
        match self {
            FontSize::Small => 0.875,
            FontSize::Medium => 1.0,
            FontSize::Large => 1.125,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Medium => "Medium",
            FontSize::Large => "Large",
        }
    }
}

/// The persisted settings record.
///
/// Every field carries its own default so a partial or older record
/// merges cleanly; unknown fields are ignored on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_theme")]
    pub theme: ThemeChoice,

    #[serde(default = "default_font_size")]
    pub font_size: FontSize,

    #[serde(default = "default_true")]
    pub animations: bool,

    #[serde(default = "default_true")]
    pub sound_effects: bool,
}

fn default_theme() -> ThemeChoice {
    ThemeChoice::Dark
}

fn default_font_size() -> FontSize {
    FontSize::Medium
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size: default_font_size(),
            animations: true,
            sound_effects: true,
        }
    }
}

/// Loads and saves the settings record at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store under the user config dir: `{config_dir}/chatter/settings.json`.
    pub fn new() -> Self {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("chatter");
        path.push("settings.json");
        Self { path }
    }

    /// Store at an explicit path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load from disk. A missing or unparseable record falls back to
    /// defaults without surfacing an error.
    pub fn load(&self) -> Settings {
        match fs::read_to_string(&self.path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Ignoring corrupt settings file {:?}: {}", self.path, e);
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        }
    }

    /// Persist synchronously, creating parent directories as needed.
    pub fn save(&self, settings: &Settings) -> crate::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(settings)
            .map_err(|e| crate::ChatterError::ConfigError(e.to_string()))?;
        fs::write(&self.path, data)?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
