use fruitfall_core::frontend::{Canvas, DrawError, Hud, InputSource, SpriteKind};
use fruitfall_core::game_trait::InputState;

/// Scripted input: always runs right and jumps on a fixed rhythm, with a
/// mid-air second press for the double jump.
#[derive(Debug, Clone)]
pub struct Autopilot {
    pub period: u64,
    pub double_jump_after: u64,
    frame: u64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            period: 45,
            double_jump_after: 12,
            frame: 0,
        }
    }
}

impl Autopilot {
    pub fn next_input(&mut self) -> InputState {
        let phase = self.frame % self.period;
        self.frame += 1;
        InputState {
            left: false,
            right: true,
            jump_pressed: phase == 0 || phase == self.double_jump_after,
        }
    }
}

/// Frontend with no window: input from the autopilot, HUD and draw calls
/// go to the log.
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    pub autopilot: Autopilot,
    pub score: u32,
    pub lives: u32,
    pub draws_this_frame: usize,
}

impl HeadlessFrontend {
    pub fn new(autopilot: Autopilot) -> Self {
        Self {
            autopilot,
            ..Default::default()
        }
    }
}

impl InputSource for HeadlessFrontend {
    fn input_state(&mut self) -> InputState {
        tracing::trace!(draws = self.draws_this_frame, "Frame drawn");
        self.draws_this_frame = 0;
        self.autopilot.next_input()
    }
}

impl Canvas for HeadlessFrontend {
    fn draw_sprite(
        &mut self,
        _sprite: SpriteKind,
        _x: f32,
        _y: f32,
        _w: f32,
        _h: f32,
        _flip_horizontal: bool,
    ) -> Result<(), DrawError> {
        self.draws_this_frame += 1;
        Ok(())
    }
}

impl Hud for HeadlessFrontend {
    fn report_score(&mut self, score: u32) {
        self.score = score;
        tracing::debug!(score, "Score");
    }

    fn report_lives(&mut self, lives: u32) {
        self.lives = lives;
        tracing::info!(lives, "Lives");
    }

    fn on_level_complete(&mut self, score: u32) {
        tracing::info!(score, "Level complete");
    }

    fn on_game_over(&mut self, score: u32) {
        tracing::info!(score, "Game over");
    }

    fn on_boss_defeated(&mut self, message: &str) {
        tracing::info!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autopilot_presses_twice_per_period() {
        let mut pilot = Autopilot::default();
        let presses = (0..90).filter(|_| pilot.next_input().jump_pressed).count();
        assert_eq!(presses, 4);
    }

    #[test]
    fn autopilot_always_runs_right() {
        let mut pilot = Autopilot::default();
        assert!((0..100).all(|_| {
            let input = pilot.next_input();
            input.right && !input.left
        }));
    }

    #[test]
    fn hud_tracks_latest_values() {
        let mut frontend = HeadlessFrontend::default();
        frontend.report_score(300);
        frontend.report_lives(2);
        assert_eq!((frontend.score, frontend.lives), (300, 2));
    }
}
