//! Lane registry
//!
//! Four fixed lanes, bound to the arrow keys. Defined once, never mutated.

use crate::consts::LANE_COUNT;

/// A single input lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    /// Ordinal index (0..LANE_COUNT)
    pub index: usize,
    /// Key identifier (DOM `KeyboardEvent.key` naming)
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Display colour name
    pub color: &'static str,
    /// Note played when a tile in this lane is hit (Hz)
    pub note_hz: f32,
}

/// The lane table, in index order
pub const LANES: [Lane; LANE_COUNT] = [
    Lane {
        index: 0,
        key: "ArrowLeft",
        label: "←",
        color: "red",
        note_hz: 261.63, // C4
    },
    Lane {
        index: 1,
        key: "ArrowDown",
        label: "↓",
        color: "blue",
        note_hz: 293.66, // D4
    },
    Lane {
        index: 2,
        key: "ArrowRight",
        label: "→",
        color: "green",
        note_hz: 329.63, // E4
    },
    Lane {
        index: 3,
        key: "ArrowUp",
        label: "↑",
        color: "yellow",
        note_hz: 392.00, // G4
    },
];

/// Look up the lane bound to a key
pub fn lane_for_key(key: &str) -> Option<usize> {
    LANES.iter().position(|lane| lane.key == key)
}

/// Display label for a lane index
pub fn label(index: usize) -> Option<&'static str> {
    LANES.get(index).map(|lane| lane.label)
}

/// Key bound to a lane index
pub fn key_for_lane(index: usize) -> Option<&'static str> {
    LANES.get(index).map(|lane| lane.key)
}
