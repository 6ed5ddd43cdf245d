use serde::{Deserialize, Serialize};

use crate::frontend::Canvas;

/// Core trait implemented by the Fruitfall simulation.
///
/// The frame driver owns input polling, HUD dispatch and drawing;
/// the simulation only advances its own state one fixed frame at a time.
pub trait FrameSimulation {
    /// Advance the simulation by exactly one frame. Returns the events
    /// raised during the frame, in the order they happened.
    fn step(&mut self, input: &InputState) -> Vec<GameEvent>;

    /// Hand the current frame's render data to the drawing layer.
    ///
    /// Drawing never mutates simulation state, so a failing canvas
    /// cannot corrupt the world.
    fn render(&self, canvas: &mut dyn Canvas);

    /// Serialize the authoritative state for a frontend on the far side of
    /// an FFI or wasm boundary.
    fn snapshot(&self) -> Vec<u8>;

    /// Replace the state with a previously taken snapshot. Undecodable
    /// input is ignored.
    fn apply_snapshot(&mut self, data: &[u8]);

    /// Frame rate the simulation was tuned for.
    fn tick_rate(&self) -> f32 {
        crate::time::TICK_RATE_HZ
    }

    fn pause(&mut self);

    fn resume(&mut self);

    /// Whether the run has ended (game over or all levels cleared).
    fn is_finished(&self) -> bool;
}

/// Player input for a single frame, merged from keyboard and touch
/// sources upstream of the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
}

impl InputState {
    /// Horizontal direction: -1 (left), 0, +1 (right). Opposing keys cancel.
    pub fn move_dir(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Events emitted by the simulation during a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    LivesChanged { lives: u32 },
    BossDefeated { message: String },
    LevelStarted { level: u32 },
    LevelComplete { level: u32, score: u32 },
    PlayerDied { lives_left: u32 },
    GameOver { score: u32 },
    GameWon { score: u32 },
}

/// Generates the `FrameSimulation` methods that only shuffle state around:
/// `snapshot`, `apply_snapshot`, `pause`, `resume`, `is_finished`.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields, and `$StateType` to have an `is_finished()` method.
#[macro_export]
macro_rules! simulation_boilerplate {
    (state_type: $StateType:ty) => {
        fn snapshot(&self) -> Vec<u8> {
            match rmp_serde::to_vec(&self.state) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode simulation snapshot");
                    Vec::new()
                },
            }
        }

        fn apply_snapshot(&mut self, data: &[u8]) {
            if let Ok(s) = rmp_serde::from_slice::<$StateType>(data) {
                self.state = s;
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_finished(&self) -> bool {
            self.state.is_finished()
        }
    };
}
