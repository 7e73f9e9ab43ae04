//! Input resolver
//!
//! Maps key edges to lanes and judges presses against the live tiles.

use super::policy;
use super::state::{GameEvent, GamePhase, GameState, Score};
use crate::consts::{PAUSE_KEY, RESTART_KEY};
use crate::lanes;

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// Nothing happened (wrong phase, unbound key)
    Ignored,
    /// Key was already held; repeats are not judged
    Repeat,
    /// Press landed on a tile
    Hit {
        tile_id: u64,
        lane: usize,
        combo: u32,
        points: Score,
    },
    /// Press found no tile in the window; combo reset
    Miss { lane: usize },
    /// Restart key from Paused or GameOver
    Restarted,
    PauseToggled,
}

/// Handle a key-down edge
pub fn key_down(state: &mut GameState, key: &str) -> KeyOutcome {
    if key == RESTART_KEY && matches!(state.phase, GamePhase::Paused | GamePhase::GameOver) {
        state.restart();
        return KeyOutcome::Restarted;
    }
    if key == PAUSE_KEY {
        return if state.toggle_pause() {
            KeyOutcome::PauseToggled
        } else {
            KeyOutcome::Ignored
        };
    }
    if state.phase != GamePhase::Running {
        return KeyOutcome::Ignored;
    }
    let Some(lane) = lanes::lane_for_key(key) else {
        return KeyOutcome::Ignored;
    };
    if state.pressed[lane] {
        return KeyOutcome::Repeat;
    }
    state.pressed[lane] = true;

    match state.hittable_tile(lane) {
        Some(index) => {
            let tile = &mut state.tiles[index];
            tile.hit = true;
            let tile_id = tile.id;

            // Score and combo move together
            state.combo += 1;
            let points = policy::hit_points(state.combo);
            state.score = state.score.saturating_add(points);

            state.events.push(GameEvent::NoteHit {
                id: tile_id,
                lane,
                combo: state.combo,
                points,
            });
            if policy::is_combo_milestone(state.combo) {
                state.events.push(GameEvent::ComboMilestone { combo: state.combo });
            }
            KeyOutcome::Hit {
                tile_id,
                lane,
                combo: state.combo,
                points,
            }
        }
        None => {
            let combo = std::mem::take(&mut state.combo);
            state.events.push(GameEvent::ComboBroken { lane, combo });
            KeyOutcome::Miss { lane }
        }
    }
}

/// Handle a key-up edge. Allowed in every phase.
pub fn key_up(state: &mut GameState, key: &str) {
    if let Some(lane) = lanes::lane_for_key(key) {
        state.pressed[lane] = false;
    }
}
