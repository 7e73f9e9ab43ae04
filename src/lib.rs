//! MeloDash - A four-lane falling-tile rhythm game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiles, scoring, difficulty, game state)
//! - `lanes`: Fixed lane registry (key bindings, labels, notes)
//! - `clock`: Fixed-period tick scheduler
//! - `session`: Single-owner game session wiring the simulation to collaborators
//! - `highscores`: High score persistence
//! - `audio`: Audio signal sinks
//! - `settings`: Player preferences

pub mod audio;
pub mod autoplay;
pub mod clock;
#[cfg(not(target_arch = "wasm32"))]
pub mod driver;
pub mod error;
pub mod highscores;
pub mod lanes;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use audio::{AudioSink, LogAudio, NullAudio, SoundEffect};
pub use clock::SimClock;
pub use error::StorageError;
pub use highscores::{HighScore, HighScoreStore, MemoryStore};
pub use lanes::{LANES, Lane};
pub use session::{Command, Session};
pub use settings::Settings;
pub use snapshot::GameSnapshot;

/// Game configuration constants
///
/// Positions are percentages of the playfield height, not pixels.
pub mod consts {
    /// Nominal simulation tick period (ms)
    pub const TICK_MS: u64 = 16;

    /// Number of input lanes
    pub const LANE_COUNT: usize = 4;

    /// Spawn position, just above the visible playfield
    pub const SPAWN_POSITION: f32 = -10.0;
    /// Hit window (inclusive)
    pub const HIT_WINDOW_START: f32 = 60.0;
    pub const HIT_WINDOW_END: f32 = 75.0;
    /// A falling tile past this line ends the round
    pub const MISS_THRESHOLD: f32 = 90.0;
    /// Tiles past this line are dropped from the live set
    pub const GARBAGE_THRESHOLD: f32 = 110.0;

    /// Score points per difficulty plateau
    pub const SCORE_PER_LEVEL: u64 = 10;
    /// Difficulty / speed gained per plateau
    pub const DIFFICULTY_STEP: f32 = 0.2;
    pub const SPEED_STEP: f32 = 0.2;
    /// Fall speed at score 0 (percent per tick)
    pub const BASE_TILE_SPEED: f32 = 0.5;

    /// Spawn interval bounds (ms)
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 2000.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 800.0;
    pub const SPAWN_INTERVAL_PER_DIFFICULTY_MS: f32 = 200.0;

    /// Combo hits per bonus step
    pub const COMBO_BONUS_EVERY: u32 = 5;
    /// Combo hits per "success" audio cue
    pub const COMBO_MILESTONE_EVERY: u32 = 10;

    /// Key that restarts from Paused or GameOver
    pub const RESTART_KEY: &str = " ";
    /// Key that toggles pause (presentation shortcut)
    pub const PAUSE_KEY: &str = "Escape";
}
