use crate::config::CHEAT_LIVES;

pub const ENEMY_STOMP_POINTS: u32 = 100;
pub const BOSS_HIT_POINTS: u32 = 200;
/// Granted once per boss kind on defeat, on top of the hit points.
pub const BOSS_DEFEAT_BONUS: u32 = 1000;

/// Lives left after one death. Cheat lives never drop; some bosses end the
/// run outright.
pub fn lives_after_death(lives: u32, forced_game_over: bool) -> u32 {
    if forced_game_over {
        0
    } else if lives == CHEAT_LIVES {
        lives
    } else {
        lives.saturating_sub(1)
    }
}

/// Tracks the last values pushed to the HUD so changes are reported once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudMirror {
    pub score: Option<u32>,
    pub lives: Option<u32>,
}

impl HudMirror {
    /// Returns the new score if it differs from the last one reported.
    pub fn score_changed(&mut self, score: u32) -> Option<u32> {
        if self.score == Some(score) {
            return None;
        }
        self.score = Some(score);
        Some(score)
    }

    pub fn lives_changed(&mut self, lives: u32) -> Option<u32> {
        if self.lives == Some(lives) {
            return None;
        }
        self.lives = Some(lives);
        Some(lives)
    }
}
