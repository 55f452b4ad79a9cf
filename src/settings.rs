//! Game settings and preferences
//!
//! Stored as JSON next to the executable (or wherever the host points).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Key;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read or write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Logical key to host key name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings(BTreeMap<Key, String>);

impl Default for KeyBindings {
    fn default() -> Self {
        let names = ["Left", "Right", "Up", "Space", "LCtrl", "P"];
        Self(
            Key::ALL
                .iter()
                .zip(names)
                .map(|(k, n)| (*k, n.to_string()))
                .collect(),
        )
    }
}

impl KeyBindings {
    pub fn name(&self, key: Key) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn bind(&mut self, key: Key, name: impl Into<String>) {
        self.0.insert(key, name.into());
    }

    /// Logical key bound to a host key name
    pub fn lookup(&self, name: &str) -> Option<Key> {
        self.0
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(k, _)| *k)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Display ===
    /// Upper bound on ticks per second
    pub frame_rate_cap: u32,
    /// Draw platform and door collision boxes
    pub show_platform_outlines: bool,

    // === Input ===
    pub key_bindings: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            frame_rate_cap: 60,
            show_platform_outlines: false,

            key_bindings: KeyBindings::default(),
        }
    }
}

impl Settings {
    /// Clamp out-of-range values loaded from disk
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        if self.frame_rate_cap == 0 {
            log::warn!("frame_rate_cap of 0 replaced by default");
            self.frame_rate_cap = Settings::default().frame_rate_cap;
        }
        self
    }

    /// Milliseconds per tick at the frame rate cap
    pub fn frame_budget_ms(&self) -> u64 {
        1000 / u64::from(self.frame_rate_cap.max(1))
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({})", err);
                Self::default()
            }
        }
    }
}
