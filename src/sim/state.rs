//! Game state and core simulation types
//!
//! Everything the round depends on lives here. Presentation reads it through
//! [`crate::snapshot::GameSnapshot`].

use serde::{Deserialize, Serialize};

use super::policy;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// A tile was missed, round over
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not_started",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Score in fixed-point tenths
///
/// Increments are multiples of 0.1, so tenths keep plateau boundaries exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Score(u64);

impl Score {
    pub const ZERO: Score = Score(0);

    pub const fn from_tenths(tenths: u64) -> Self {
        Score(tenths)
    }

    /// Convert a stored real-valued score, rounding to the nearest tenth.
    /// Negative and non-finite values map to zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Score((value * 10.0).round() as u64)
        } else {
            Score::ZERO
        }
    }

    pub const fn tenths(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }

    /// Whole points, as shown on the HUD
    pub const fn whole(self) -> u64 {
        self.0 / 10
    }

    /// Difficulty plateau index: `floor(score / 10)`
    pub const fn level(self) -> u64 {
        self.0 / (SCORE_PER_LEVEL * 10)
    }

    pub const fn saturating_add(self, other: Score) -> Score {
        Score(self.0.saturating_add(other.0))
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// A falling tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u64,
    pub lane: usize,
    /// Vertical progress, percent of playfield height
    pub position: f32,
    pub hit: bool,
    pub missed: bool,
}

impl Tile {
    pub fn new(id: u64, lane: usize) -> Self {
        Self {
            id,
            lane,
            position: SPAWN_POSITION,
            hit: false,
            missed: false,
        }
    }

    /// Neither hit nor missed
    pub fn is_falling(&self) -> bool {
        !self.hit && !self.missed
    }

    /// Inside the inclusive hit window
    pub fn in_hit_window(&self) -> bool {
        (HIT_WINDOW_START..=HIT_WINDOW_END).contains(&self.position)
    }

    /// Falling and inside the hit window
    pub fn is_hittable(&self) -> bool {
        self.is_falling() && self.in_hit_window()
    }
}

/// Something that happened during a tick or input, consumed by collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    TileSpawned { id: u64, lane: usize },
    /// A press landed on a tile
    NoteHit { id: u64, lane: usize, combo: u32, points: Score },
    /// Combo reached a multiple of the milestone step
    ComboMilestone { combo: u32 },
    /// A press found no tile; combo reset
    ComboBroken { lane: usize, combo: u32 },
    TileMissed { id: u64, lane: usize },
    GameOver { score: Score },
}

/// Complete game state for one round
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Live tiles, in spawn order
    pub tiles: Vec<Tile>,
    pub score: Score,
    /// Consecutive successful hits
    pub combo: u32,
    /// Derived from score each tick
    pub difficulty: f32,
    /// Percent of playfield per tick, derived from score each tick
    pub tile_speed: f32,
    /// Simulated time of the last spawn (ms)
    pub last_spawn_ms: u64,
    /// Simulation tick counter (only advances while running)
    pub time_ticks: u64,
    /// Nominal tick period (ms)
    pub tick_ms: u64,
    pub phase: GamePhase,
    /// Per-lane pressed flags, for display and edge detection
    pub pressed: [bool; LANE_COUNT],
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

impl GameState {
    /// Fresh state with the given nominal tick period
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tiles: Vec::new(),
            score: Score::ZERO,
            combo: 0,
            difficulty: policy::difficulty(Score::ZERO),
            tile_speed: policy::tile_speed(Score::ZERO),
            last_spawn_ms: 0,
            time_ticks: 0,
            tick_ms,
            phase: GamePhase::NotStarted,
            pressed: [false; LANE_COUNT],
            events: Vec::new(),
        }
    }

    /// Simulated time (ms)
    pub fn now_ms(&self) -> u64 {
        self.time_ticks * self.tick_ms
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// `NotStarted -> Running`. Returns false if not in `NotStarted`.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        self.phase = GamePhase::Running;
        self.last_spawn_ms = self.now_ms();
        self.events.push(GameEvent::Started);
        true
    }

    /// `Running <-> Paused`. Returns false in any other phase.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.events.push(GameEvent::Resumed);
                true
            }
            GamePhase::NotStarted | GamePhase::GameOver => false,
        }
    }

    /// Replace the whole state with a fresh one (keeps the tick period)
    pub fn restart(&mut self) {
        *self = Self::new(self.tick_ms);
    }

    /// Index of the earliest-spawned hittable tile in a lane
    pub fn hittable_tile(&self, lane: usize) -> Option<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.lane == lane && t.is_hittable())
            .min_by_key(|(_, t)| t.id)
            .map(|(i, _)| i)
    }
}
