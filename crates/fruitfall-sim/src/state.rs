use serde::{Deserialize, Serialize};

use crate::config::LevelTuning;
use crate::entities::{Boss, DefeatedBosses, Enemy, Player};
use crate::hazards::HazardSet;
use crate::level::LevelLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    GameOver,
    Won,
}

/// Level change queued during a frame and applied at the next frame entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// First frame of a run: announce the level and HUD values.
    Start,
    /// Reload the current level after a death.
    Reset,
    /// Load the next level.
    Advance,
}

/// Entire mutable world of one run. This is what `snapshot()` encodes.
///
/// The snapshot is render data, not a save state: the random generator and
/// the last values reported to the HUD live on `Simulation` and are not
/// included. Stepping a restored snapshot does not replay the same enemy
/// throws or boss jumps, and score and lives change events are computed
/// against whatever the receiving instance last reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub level: LevelLayout,
    pub seed: u64,
    pub frame: u64,
    pub phase: Phase,
    pub pending: Option<Transition>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Boss>,
    pub hazards: HazardSet,
    pub defeated: DefeatedBosses,
    pub tuning: LevelTuning,
    pub camera_x: f32,
}

impl SimulationState {
    pub fn is_finished(&self) -> bool {
        self.phase != Phase::Playing
    }

    pub fn level_number(&self) -> u32 {
        self.level.number
    }

    /// Every boss of the current level has been beaten.
    pub fn bosses_cleared(&self) -> bool {
        self.bosses.iter().all(|b| b.defeated)
    }
}
