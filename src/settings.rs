//! Game settings and preferences
//!
//! Persisted separately from the high score: a JSON file in the platform
//! config directory on native, LocalStorage in the browser.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;

/// Allowed tick period range (ms)
pub const MIN_TICK_MS: u64 = 4;
pub const MAX_TICK_MS: u64 = 100;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation tick period (ms)
    pub tick_ms: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    /// Fixed RNG seed; random per session if unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Tick period, clamped to a sane range
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS))
    }

    /// Effective SFX gain (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Parse settings JSON; unknown fields are ignored, missing ones default
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Settings {
    /// Settings file path (`<config dir>/melodash/settings.json`)
    pub fn path() -> crate::error::Result<std::path::PathBuf> {
        let dir = dirs::config_dir().ok_or(crate::error::StorageError::NoDataDir)?;
        Ok(dir.join("melodash").join("settings.json"))
    }

    /// Load settings from a file, defaults if missing or unreadable
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt settings file: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load from the default location
    pub fn load() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::path()?)
    }
}

#[cfg(target_arch = "wasm32")]
impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "melodash_settings";

    /// Load settings from LocalStorage
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage
    pub fn save(&self) -> crate::error::Result<()> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| crate::error::StorageError::Unavailable("no LocalStorage".into()))?;
        storage
            .set_item(Self::STORAGE_KEY, &self.to_json()?)
            .map_err(|e| crate::error::StorageError::Unavailable(format!("{:?}", e)))?;
        log::info!("Settings saved");
        Ok(())
    }
}
