//! Settings persistence using TOML
//!
//! Stored in ~/.config/blockfall/settings.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub game: GameSettings,
    pub keys: KeySettings,
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Ticks (and redraws) per second
    pub frame_rate: u32,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Gameplay settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Fixed RNG seed for a reproducible piece sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// App-level keys. Piece controls are fixed: a/s rotate, j/k shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    pub quit: char,
    pub new_game: char,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            quit: 'q',
            new_game: 'n',
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_toml(contents: &str) -> Self {
        match toml::from_str(contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Malformed settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from file, writing defaults on first run
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(_) => {
                let settings = Self::default();
                if let Err(e) = settings.save() {
                    tracing::warn!("Could not write default settings: {}", e);
                }
                settings
            }
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }
}

impl DisplaySettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", " ."),
            "round" => ("()", " ."),
            _ => ("██", "  "), // "solid" or default
        }
    }

    /// Frame rate clamped to something a terminal can keep up with
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate.clamp(1, 240)
    }
}
