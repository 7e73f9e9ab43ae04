//! Read-only view of a session for presentation
//!
//! Produced after every tick or input; renderers never touch `GameState`.

use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;
use crate::sim::{GamePhase, GameState, Score, Tile};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub tiles: Vec<Tile>,
    pub score: f64,
    pub combo: u32,
    pub difficulty: f32,
    pub tile_speed: f32,
    pub pressed: [bool; LANE_COUNT],
    pub high_score: f64,
    /// The finished round beat the previous high score
    pub new_high_score: bool,
    pub time_ticks: u64,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, high_score: Score, new_high_score: bool) -> Self {
        Self {
            phase: state.phase,
            tiles: state.tiles.clone(),
            score: state.score.as_f64(),
            combo: state.combo,
            difficulty: state.difficulty,
            tile_speed: state.tile_speed,
            pressed: state.pressed,
            high_score: high_score.as_f64(),
            new_high_score,
            time_ticks: state.time_ticks,
        }
    }

    /// Tiles still waiting to be hit
    pub fn falling_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_falling())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
