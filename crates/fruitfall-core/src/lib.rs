pub mod frame;
pub mod frontend;
pub mod game_trait;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;

    use crate::frame::run_frame;
    use crate::frontend::{Canvas, DrawError, Hud, InputSource, SpriteKind};
    use crate::game_trait::{FrameSimulation, GameEvent, InputState};

    /// Frontend that replays scripted inputs and records every HUD call
    /// and draw call it receives.
    #[derive(Debug, Default)]
    pub struct RecordingFrontend {
        pub script: VecDeque<InputState>,
        pub scores: Vec<u32>,
        pub lives: Vec<u32>,
        pub level_completions: Vec<u32>,
        pub game_overs: Vec<u32>,
        pub boss_messages: Vec<String>,
        pub draws: Vec<(SpriteKind, f32, f32, bool)>,
        /// When set, every draw call fails after being recorded.
        pub fail_draws: bool,
    }

    impl RecordingFrontend {
        /// Frontend that feeds `inputs` in order, then idles.
        pub fn scripted(inputs: impl IntoIterator<Item = InputState>) -> Self {
            Self {
                script: inputs.into_iter().collect(),
                ..Default::default()
            }
        }
    }

    impl InputSource for RecordingFrontend {
        fn input_state(&mut self) -> InputState {
            self.script.pop_front().unwrap_or_default()
        }
    }

    impl Canvas for RecordingFrontend {
        fn draw_sprite(
            &mut self,
            sprite: SpriteKind,
            x: f32,
            y: f32,
            _w: f32,
            _h: f32,
            flip_horizontal: bool,
        ) -> Result<(), DrawError> {
            self.draws.push((sprite, x, y, flip_horizontal));
            if self.fail_draws {
                return Err(DrawError::MissingSprite(sprite));
            }
            Ok(())
        }
    }

    impl Hud for RecordingFrontend {
        fn report_score(&mut self, score: u32) {
            self.scores.push(score);
        }

        fn report_lives(&mut self, lives: u32) {
            self.lives.push(lives);
        }

        fn on_level_complete(&mut self, score: u32) {
            self.level_completions.push(score);
        }

        fn on_game_over(&mut self, score: u32) {
            self.game_overs.push(score);
        }

        fn on_boss_defeated(&mut self, message: &str) {
            self.boss_messages.push(message.to_string());
        }
    }

    /// Step the simulation `n` times with the same input, returning all
    /// accumulated events.
    pub fn run_steps(
        sim: &mut dyn FrameSimulation,
        n: usize,
        input: InputState,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.step(&input));
        }
        all_events
    }

    /// Run `n` full frames (input, step, HUD, draw) through `frontend`.
    pub fn run_frames<S: FrameSimulation>(
        sim: &mut S,
        frontend: &mut RecordingFrontend,
        n: usize,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(run_frame(sim, frontend));
        }
        all_events
    }

    // ================================================================
    // FrameSimulation contract checks
    // ================================================================
    // Simulation crates call these from their own tests with a freshly
    // constructed instance.

    /// step() on a running simulation must change its state.
    pub fn contract_step_advances_state(sim: &mut dyn FrameSimulation) {
        let before = sim.snapshot();
        sim.step(&InputState::default());
        let after = sim.snapshot();
        assert_ne!(before, after, "step() must advance simulation state");
    }

    /// pause() must freeze the state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(sim: &mut dyn FrameSimulation) {
        sim.pause();
        let before = sim.snapshot();
        sim.step(&InputState::default());
        let during_pause = sim.snapshot();
        assert_eq!(before, during_pause, "State must not change while paused");

        sim.resume();
        sim.step(&InputState::default());
        let after_resume = sim.snapshot();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// snapshot → apply_snapshot must be stable after one roundtrip.
    pub fn contract_snapshot_roundtrip_preserves(sim: &mut dyn FrameSimulation) {
        let state_a = sim.snapshot();
        sim.apply_snapshot(&state_a);
        let state_b = sim.snapshot();
        assert_eq!(
            state_a, state_b,
            "State must survive a snapshot→apply→snapshot roundtrip"
        );
    }

    /// Garbage snapshot bytes must be ignored without panicking.
    pub fn contract_garbage_snapshot_ignored(sim: &mut dyn FrameSimulation) {
        let before = sim.snapshot();
        sim.apply_snapshot(&[0xC1, 0xFF, 0x00, 0x13]);
        sim.apply_snapshot(&[]);
        assert_eq!(before, sim.snapshot(), "Garbage must leave state untouched");
    }

    /// A canvas that fails every draw must not influence the simulation.
    pub fn contract_draw_failure_is_harmless<S: FrameSimulation>(
        failing: &mut S,
        healthy: &mut S,
        frames: usize,
    ) {
        let mut bad = RecordingFrontend {
            fail_draws: true,
            ..Default::default()
        };
        let mut good = RecordingFrontend::default();
        run_frames(failing, &mut bad, frames);
        run_frames(healthy, &mut good, frames);
        assert!(!bad.draws.is_empty(), "Failing canvas should still be asked to draw");
        assert_eq!(
            failing.snapshot(),
            healthy.snapshot(),
            "Draw failures must not feed back into the simulation"
        );
    }
}
