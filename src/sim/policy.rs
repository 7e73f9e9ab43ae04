//! Scoring and difficulty policy
//!
//! Pure functions of score/combo. Difficulty and speed step up once per
//! 10 points of score.

use std::time::Duration;

use super::state::Score;
use crate::consts::*;

/// `1 + floor(score / 10) * 0.2`
pub fn difficulty(score: Score) -> f32 {
    1.0 + score.level() as f32 * DIFFICULTY_STEP
}

/// `0.5 + floor(score / 10) * 0.2`, percent of playfield per tick
pub fn tile_speed(score: Score) -> f32 {
    BASE_TILE_SPEED + score.level() as f32 * SPEED_STEP
}

/// `max(800ms, 2000ms - difficulty * 200ms)`
pub fn spawn_interval(difficulty: f32) -> Duration {
    let ms = (BASE_SPAWN_INTERVAL_MS - difficulty * SPAWN_INTERVAL_PER_DIFFICULTY_MS)
        .max(MIN_SPAWN_INTERVAL_MS);
    Duration::from_millis(ms.round() as u64)
}

/// Bonus on top of the base point: `floor(combo / 5) * 0.1`
pub fn combo_bonus(combo: u32) -> Score {
    Score::from_tenths((combo / COMBO_BONUS_EVERY) as u64)
}

/// Points for a hit that brought the combo to `combo`
pub fn hit_points(combo: u32) -> Score {
    Score::from_tenths(10).saturating_add(combo_bonus(combo))
}

/// Whether reaching `combo` triggers the success cue
pub fn is_combo_milestone(combo: u32) -> bool {
    combo > 0 && combo % COMBO_MILESTONE_EVERY == 0
}
