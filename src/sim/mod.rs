//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod input;
pub mod policy;
pub mod spawn;
pub mod state;
pub mod tick;

pub use input::{KeyOutcome, key_down, key_up};
pub use spawn::TileGenerator;
pub use state::{GameEvent, GamePhase, GameState, Score, Tile};
pub use tick::{advance_tiles, tick};
