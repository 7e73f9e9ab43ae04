//! Idle/demo mode - a bot that plays from snapshots
//!
//! Presses a lane as soon as a falling tile in it enters the hit window and
//! releases it on the following frame, so every press is a fresh edge.

use crate::consts::LANE_COUNT;
use crate::lanes::LANES;
use crate::session::Command;
use crate::sim::GamePhase;
use crate::snapshot::GameSnapshot;

#[derive(Debug, Clone, Default)]
pub struct Autoplayer {
    held: [bool; LANE_COUNT],
}

impl Autoplayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key edges to send for this frame
    pub fn plan(&mut self, snapshot: &GameSnapshot) -> Vec<Command> {
        let mut commands = Vec::new();
        for lane in &LANES {
            if self.held[lane.index] {
                self.held[lane.index] = false;
                commands.push(Command::KeyUp(lane.key.to_string()));
                continue;
            }
            if snapshot.phase != GamePhase::Running {
                continue;
            }
            let target = snapshot
                .falling_tiles()
                .any(|t| t.lane == lane.index && t.in_hit_window());
            if target {
                self.held[lane.index] = true;
                commands.push(Command::KeyDown(lane.key.to_string()));
            }
        }
        commands
    }
}
