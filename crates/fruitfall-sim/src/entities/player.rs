use serde::{Deserialize, Serialize};

use fruitfall_core::frontend::SpriteSize;
use fruitfall_core::game_trait::InputState;

use super::{Body, BossKind, EnemyKind};
use crate::config::LevelTuning;

/// Invulnerable frames granted after a respawn.
pub const RESPAWN_INVULNERABLE_FRAMES: u32 = 60;
/// Frames a banana-peel slide lasts.
pub const SLIDE_FRAMES: u32 = 40;
/// Horizontal speed while sliding.
pub const SLIDE_SPEED: f32 = 8.0;
/// Spawn x at level start.
pub const SPAWN_X: f32 = 100.0;

/// What killed the player. Drives the lives bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Fall,
    Lava,
    Enemy(EnemyKind),
    Boss(BossKind),
    Slicer,
    Missile,
    Barrel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub jumping: bool,
    pub double_jumping: bool,
    pub can_double_jump: bool,
    pub is_alive: bool,
    pub invulnerable_timer: u32,
    /// Level-scaled walk speed before hazard modifiers.
    pub base_move_speed: f32,
    /// Walk speed this frame (syrup slows it).
    pub move_speed: f32,
    pub jump_power: f32,
    pub double_jump_power: f32,
    pub score: u32,
    pub lives: u32,
    pub slide_frames: u32,
    pub facing_left: bool,
    /// Top edge before this frame's motion.
    pub prev_top: f32,
    /// Bottom edge before this frame's motion.
    pub prev_bottom: f32,
    /// Jump key state last frame, for edge detection.
    pub jump_held: bool,
    pub death_cause: Option<DeathCause>,
}

impl Player {
    pub fn spawn(
        ground_y: f32,
        size: SpriteSize,
        tuning: &LevelTuning,
        score: u32,
        lives: u32,
    ) -> Self {
        let body = Body::standing_on(SPAWN_X, ground_y, size);
        Self {
            prev_top: body.y,
            prev_bottom: body.bottom(),
            body,
            jumping: false,
            double_jumping: false,
            can_double_jump: false,
            is_alive: true,
            invulnerable_timer: 0,
            base_move_speed: tuning.move_speed,
            move_speed: tuning.move_speed,
            jump_power: tuning.jump_power,
            double_jump_power: tuning.double_jump_power,
            score,
            lives,
            slide_frames: 0,
            facing_left: false,
            jump_held: false,
            death_cause: None,
        }
    }

    /// Same as [`Player::spawn`], with the post-respawn invulnerability window.
    pub fn respawn(
        ground_y: f32,
        size: SpriteSize,
        tuning: &LevelTuning,
        score: u32,
        lives: u32,
    ) -> Self {
        let mut player = Self::spawn(ground_y, size, tuning, score, lives);
        player.invulnerable_timer = RESPAWN_INVULNERABLE_FRAMES;
        player
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    /// Remember the pre-motion edges used by landing and stomp tests.
    pub fn record_previous_edges(&mut self) {
        self.prev_top = self.body.y;
        self.prev_bottom = self.body.bottom();
    }

    /// Apply horizontal input and jump presses for this frame.
    pub fn apply_input(&mut self, input: &InputState) {
        // Sliding ignores steering; velocity was set when the slide began.
        if self.slide_frames == 0 {
            let dir = input.move_dir();
            self.body.vx = dir * self.move_speed;
            if dir < 0.0 {
                self.facing_left = true;
            } else if dir > 0.0 {
                self.facing_left = false;
            }
        }

        let pressed = input.jump_pressed && !self.jump_held;
        self.jump_held = input.jump_pressed;
        if pressed {
            self.try_jump();
        }
    }

    fn try_jump(&mut self) {
        if !self.jumping {
            self.body.vy = self.jump_power;
            self.jumping = true;
            self.double_jumping = false;
            self.can_double_jump = true;
        } else if self.can_double_jump {
            self.body.vy = self.double_jump_power;
            self.double_jumping = true;
            self.can_double_jump = false;
        }
    }

    /// Touched down on a surface: clear all jump state.
    pub fn land(&mut self) {
        self.jumping = false;
        self.double_jumping = false;
        self.can_double_jump = false;
    }

    /// Upward bounce after a stomp. Counts as a fresh jump so a double jump
    /// is available again.
    pub fn bounce(&mut self, factor: f32) {
        self.body.vy = self.jump_power * factor;
        self.jumping = true;
        self.double_jumping = false;
        self.can_double_jump = true;
    }

    /// Unconditional death (lava, falling out of the world).
    pub fn kill(&mut self, cause: DeathCause) {
        if self.is_alive {
            self.is_alive = false;
            self.death_cause = Some(cause);
        }
    }

    /// Damage from a hostile; suppressed while invulnerable. Returns whether
    /// the player died.
    pub fn hurt(&mut self, cause: DeathCause) -> bool {
        if self.is_invulnerable() || !self.is_alive {
            return false;
        }
        self.kill(cause);
        true
    }

    /// Force a slide in the direction of travel (rightward when standing still).
    pub fn start_slide(&mut self) {
        let dir = if self.body.vx < 0.0 { -1.0 } else { 1.0 };
        self.body.vx = dir * SLIDE_SPEED;
        self.slide_frames = SLIDE_FRAMES;
    }

    pub fn is_sliding(&self) -> bool {
        self.slide_frames > 0
    }

    /// Count down frame timers. Called once at the end of the player update.
    pub fn tick_timers(&mut self) {
        self.invulnerable_timer = self.invulnerable_timer.saturating_sub(1);
        self.slide_frames = self.slide_frames.saturating_sub(1);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// `can_double_jump` implies a first jump is in progress and unspent.
    pub fn jump_flags_consistent(&self) -> bool {
        !self.can_double_jump || (self.jumping && !self.double_jumping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitfall_core::frontend::SpriteKind;

    fn player() -> Player {
        Player::spawn(
            550.0,
            SpriteKind::Player.default_size(),
            &LevelTuning::default(),
            0,
            3,
        )
    }

    fn jump() -> InputState {
        InputState {
            jump_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn first_press_jumps_and_arms_double_jump() {
        let mut p = player();
        p.apply_input(&jump());
        assert!(p.jumping && p.can_double_jump && !p.double_jumping);
        assert_eq!(p.body.vy, p.jump_power);
        assert!(p.jump_flags_consistent());
    }

    #[test]
    fn held_jump_does_not_retrigger() {
        let mut p = player();
        p.apply_input(&jump());
        p.body.vy = 3.0;
        p.apply_input(&jump());
        assert_eq!(p.body.vy, 3.0, "Holding jump must not fire the double jump");
        assert!(p.can_double_jump);
    }

    #[test]
    fn second_press_double_jumps_once() {
        let mut p = player();
        p.apply_input(&jump());
        p.apply_input(&InputState::default());
        p.apply_input(&jump());
        assert!(p.double_jumping && !p.can_double_jump);
        assert_eq!(p.body.vy, p.double_jump_power);

        p.body.vy = 2.0;
        p.apply_input(&InputState::default());
        p.apply_input(&jump());
        assert_eq!(p.body.vy, 2.0, "No third jump");
        assert!(p.jump_flags_consistent());
    }

    #[test]
    fn landing_clears_jump_state() {
        let mut p = player();
        p.apply_input(&jump());
        p.land();
        assert!(!p.jumping && !p.double_jumping && !p.can_double_jump);
    }

    #[test]
    fn invulnerability_blocks_hurt_but_not_kill() {
        let mut p = player();
        p.invulnerable_timer = 10;
        assert!(!p.hurt(DeathCause::Enemy(EnemyKind::Cherry)));
        assert!(p.is_alive);
        p.kill(DeathCause::Lava);
        assert!(!p.is_alive);
        assert_eq!(p.death_cause, Some(DeathCause::Lava));
    }

    #[test]
    fn first_death_cause_sticks() {
        let mut p = player();
        p.kill(DeathCause::Fall);
        p.kill(DeathCause::Lava);
        assert_eq!(p.death_cause, Some(DeathCause::Fall));
    }

    #[test]
    fn slide_overrides_steering() {
        let mut p = player();
        p.body.vx = -2.0;
        p.start_slide();
        assert_eq!(p.body.vx, -SLIDE_SPEED);
        p.apply_input(&InputState {
            right: true,
            ..Default::default()
        });
        assert_eq!(p.body.vx, -SLIDE_SPEED);
    }

    #[test]
    fn slide_defaults_rightward() {
        let mut p = player();
        p.start_slide();
        assert_eq!(p.body.vx, SLIDE_SPEED);
    }

    #[test]
    fn respawn_grants_invulnerability() {
        let p = Player::respawn(
            550.0,
            SpriteKind::Player.default_size(),
            &LevelTuning::default(),
            1200,
            2,
        );
        assert_eq!(p.invulnerable_timer, RESPAWN_INVULNERABLE_FRAMES);
        assert_eq!(p.score, 1200);
    }
}
