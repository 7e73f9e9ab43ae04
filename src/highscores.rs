//! High score persistence
//!
//! A single number: the best score ever reached. Stored as JSON in a file on
//! native targets and in LocalStorage in the browser.

use crate::error::Result;
use crate::sim::Score;

/// Durable storage for the high score
pub trait HighScoreStore {
    /// Stored value, `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<f64>>;
    fn save(&mut self, score: f64) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// In-memory store (tests, or when no durable storage is available)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: f64) -> Self {
        Self { value: Some(value) }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<f64>> {
        Ok(self.value)
    }

    fn save(&mut self, score: f64) -> Result<()> {
        self.value = Some(score);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}

/// High-water mark backed by a store
///
/// Writes only ever go up. Store failures are logged and otherwise ignored,
/// so the game keeps working without storage.
pub struct HighScore {
    best: Score,
    store: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}

impl HighScore {
    /// Read the stored value (0 if absent or unreadable)
    pub fn load(store: Box<dyn HighScoreStore>) -> Self {
        let best = match store.load() {
            Ok(Some(value)) => {
                log::info!("Loaded high score {}", value);
                Score::from_f64(value)
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Score::ZERO
            }
            Err(e) => {
                log::warn!("Failed to load high score: {}", e);
                Score::ZERO
            }
        };
        Self { best, store }
    }

    pub fn best(&self) -> Score {
        self.best
    }

    /// Record a finished round. Returns true if it set a new high score.
    pub fn submit(&mut self, score: Score) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match self.store.save(score.as_f64()) {
            Ok(()) => log::info!("High score saved ({})", score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
        true
    }

    /// Forget the stored high score
    pub fn clear(&mut self) {
        self.best = Score::ZERO;
        match self.store.clear() {
            Ok(()) => log::info!("High score cleared"),
            Err(e) => log::warn!("Failed to clear high score: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::HighScoreStore;
    use crate::error::{Result, StorageError};

    /// JSON file store (`<data dir>/melodash/highscore.json`)
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        const FILE_NAME: &'static str = "highscore.json";

        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Store in the platform data directory
        pub fn in_data_dir() -> Result<Self> {
            let dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
            Ok(Self::new(dir.join("melodash").join(Self::FILE_NAME)))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl HighScoreStore for FileStore {
        fn load(&self) -> Result<Option<f64>> {
            match fs::read_to_string(&self.path) {
                Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&mut self, score: f64) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            // Write then rename so a crash never leaves a torn file
            let tmp = self.path.with_extension("json.tmp");
            fs::write(&tmp, serde_json::to_string(&score)?)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::HighScoreStore;
    use crate::error::{Result, StorageError};

    /// Browser LocalStorage store
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        const STORAGE_KEY: &'static str = "melodash_high_score";

        fn storage() -> Result<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| StorageError::Unavailable("no LocalStorage".to_string()))
        }
    }

    impl HighScoreStore for LocalStorageStore {
        fn load(&self) -> Result<Option<f64>> {
            let storage = Self::storage()?;
            match storage.get_item(Self::STORAGE_KEY) {
                Ok(Some(json)) => Ok(Some(serde_json::from_str(&json)?)),
                Ok(None) => Ok(None),
                Err(e) => Err(StorageError::Unavailable(format!("{:?}", e))),
            }
        }

        fn save(&mut self, score: f64) -> Result<()> {
            let json = serde_json::to_string(&score)?;
            Self::storage()?
                .set_item(Self::STORAGE_KEY, &json)
                .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
        }

        fn clear(&mut self) -> Result<()> {
            Self::storage()?
                .remove_item(Self::STORAGE_KEY)
                .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
        }
    }
}
