use rand::Rng;
use serde::{Deserialize, Serialize};

use fruitfall_core::frontend::{SpriteKind, SpriteSize};
use fruitfall_core::time::FRAME_MS;

use super::Body;
use crate::config::LevelTuning;
use crate::hazards::Missile;
use crate::level::{BOSS_AREA_START, LEVEL_LENGTH, LevelLayout};
use crate::physics::{self, PrevEdges, SurfaceContact};

/// Frames a boss ignores stomps after taking a hit.
pub const BOSS_INVULNERABLE_FRAMES: u32 = 30;
/// Randomized jump cooldown bounds for the arena bosses, in frames.
pub const JUMP_COOLDOWN_MIN: u32 = 90;
pub const JUMP_COOLDOWN_MAX: u32 = 180;
/// The banana boss sleeps until the player is this close.
pub const BANANA_WAKE_RANGE: f32 = 600.0;
pub const MISSILE_COOLDOWN_MS: f32 = 2000.0;
/// Per-frame jump chance of a grounded banana boss.
pub const BANANA_JUMP_CHANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    Primary,
    Second,
    Banana,
}

impl BossKind {
    pub fn hits_required(self) -> u32 {
        match self {
            BossKind::Primary | BossKind::Second => 5,
            BossKind::Banana => 10,
        }
    }

    pub fn sprite(self) -> SpriteKind {
        match self {
            BossKind::Primary => SpriteKind::Boss,
            BossKind::Second => SpriteKind::SecondBoss,
            BossKind::Banana => SpriteKind::BananaBoss,
        }
    }

    pub fn defeat_message(self) -> &'static str {
        match self {
            BossKind::Primary => "The Strawberry King has fallen!",
            BossKind::Second => "The Cherry Tyrant is crushed!",
            BossKind::Banana => "The Banana Overlord has been peeled!",
        }
    }

    /// Touching this boss ends the run outright instead of costing one life.
    pub fn forces_game_over(self) -> bool {
        self == BossKind::Second
    }

    fn move_speed(self) -> f32 {
        match self {
            BossKind::Primary => 2.0,
            BossKind::Second => 3.0,
            BossKind::Banana => 2.5,
        }
    }

    fn jump_power(self) -> f32 {
        match self {
            BossKind::Primary => -10.0,
            BossKind::Second => -12.0,
            BossKind::Banana => -11.0,
        }
    }
}

/// Per-kind defeat flags. Each flag flips once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefeatedBosses {
    pub primary: bool,
    pub second: bool,
    pub banana: bool,
}

impl DefeatedBosses {
    fn flag_mut(&mut self, kind: BossKind) -> &mut bool {
        match kind {
            BossKind::Primary => &mut self.primary,
            BossKind::Second => &mut self.second,
            BossKind::Banana => &mut self.banana,
        }
    }

    /// Set the flag for `kind`. Returns true only the first time.
    pub fn mark(&mut self, kind: BossKind) -> bool {
        let flag = self.flag_mut(kind);
        let newly = !*flag;
        *flag = true;
        newly
    }
}

/// Result of a stomp landing on a boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Boss was still flashing from the previous hit.
    Ignored,
    Hit,
    Defeated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
    pub kind: BossKind,
    pub hits: u32,
    pub hits_required: u32,
    pub active: bool,
    pub defeated: bool,
    pub invulnerable_timer: u32,
    /// -1.0 or 1.0.
    pub direction: f32,
    pub grounded: bool,
    pub jump_cooldown: u32,
    pub awake: bool,
    pub missile_cooldown_ms: f32,
    pub prev_bottom: f32,
}

impl Boss {
    pub fn spawn(kind: BossKind, x: f32, ground_y: f32, size: SpriteSize) -> Self {
        let body = Body::standing_on(x, ground_y, size);
        Self {
            prev_bottom: body.bottom(),
            body,
            kind,
            hits: 0,
            hits_required: kind.hits_required(),
            active: true,
            defeated: false,
            invulnerable_timer: 0,
            direction: -1.0,
            grounded: true,
            jump_cooldown: JUMP_COOLDOWN_MIN,
            awake: kind != BossKind::Banana,
            missile_cooldown_ms: MISSILE_COOLDOWN_MS,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    /// Apply one stomp. The counter saturates at `hits_required` and defeat
    /// is one-way.
    pub fn register_hit(&mut self) -> HitOutcome {
        if self.defeated || self.is_invulnerable() {
            return HitOutcome::Ignored;
        }
        self.hits = (self.hits + 1).min(self.hits_required);
        self.invulnerable_timer = BOSS_INVULNERABLE_FRAMES;
        if self.hits >= self.hits_required {
            self.active = false;
            self.defeated = true;
            HitOutcome::Defeated
        } else {
            HitOutcome::Hit
        }
    }

    /// Advance one frame. Returns a missile if the banana boss fired.
    pub fn update(
        &mut self,
        layout: &LevelLayout,
        tuning: &LevelTuning,
        player: &Body,
        rng: &mut impl Rng,
        missile_size: SpriteSize,
    ) -> Option<Missile> {
        if !self.active {
            return None;
        }
        self.prev_bottom = self.body.bottom();
        self.invulnerable_timer = self.invulnerable_timer.saturating_sub(1);

        if !self.awake {
            if (player.center_x() - self.body.center_x()).abs() <= BANANA_WAKE_RANGE {
                tracing::debug!("Banana boss woke up");
                self.awake = true;
            } else {
                return None;
            }
        }

        let speed = self.kind.move_speed() * tuning.scale;
        match self.kind {
            BossKind::Primary | BossKind::Second => self.patrol(speed, tuning, rng),
            BossKind::Banana => self.chase(speed, tuning, player, rng),
        }
        self.apply_physics(layout, tuning);

        if self.kind == BossKind::Banana {
            return self.maybe_fire(player, missile_size);
        }
        None
    }

    fn patrol(&mut self, speed: f32, tuning: &LevelTuning, rng: &mut impl Rng) {
        let (min_x, max_x) = self.arena_bounds();
        if self.body.x <= min_x {
            self.direction = 1.0;
        } else if self.body.x >= max_x {
            self.direction = -1.0;
        }
        self.body.vx = self.direction * speed;

        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);
        if self.grounded && self.jump_cooldown == 0 {
            self.body.vy = self.kind.jump_power() * tuning.scale;
            self.grounded = false;
            self.jump_cooldown = rng.random_range(JUMP_COOLDOWN_MIN..=JUMP_COOLDOWN_MAX);
        }
    }

    fn chase(&mut self, speed: f32, tuning: &LevelTuning, player: &Body, rng: &mut impl Rng) {
        let dx = player.center_x() - self.body.center_x();
        if dx.abs() > 1.0 {
            self.direction = dx.signum();
        }
        self.body.vx = self.direction * speed;
        if self.grounded && rng.random_bool(BANANA_JUMP_CHANCE) {
            self.body.vy = self.kind.jump_power() * tuning.scale;
            self.grounded = false;
        }
    }

    fn apply_physics(&mut self, layout: &LevelLayout, tuning: &LevelTuning) {
        let prev = PrevEdges::of(&self.body);
        physics::integrate(&mut self.body, tuning.gravity);
        let (min_x, max_x) = self.arena_bounds();
        self.body.x = self.body.x.clamp(min_x, max_x);
        physics::sanitize(&mut self.body, prev);

        // Bosses only ever stand on the arena ground.
        for ground in layout.platforms.ground() {
            if physics::resolve_surface(
                &mut self.body,
                prev,
                &ground.rect(),
                tuning.landing_tolerance,
            ) == Some(SurfaceContact::Landed)
            {
                self.grounded = true;
            }
        }
        if self.body.y > tuning.canvas_height {
            tracing::warn!(kind = ?self.kind, "Boss fell out of the arena, restoring");
            self.body.y = tuning.ground_y() - self.body.h;
            self.body.vy = 0.0;
            self.grounded = true;
        }
    }

    fn maybe_fire(&mut self, player: &Body, missile_size: SpriteSize) -> Option<Missile> {
        self.missile_cooldown_ms -= FRAME_MS;
        if self.missile_cooldown_ms > 0.0 {
            return None;
        }
        self.missile_cooldown_ms = MISSILE_COOLDOWN_MS;
        let dir = if player.center_x() < self.body.center_x() { -1.0 } else { 1.0 };
        Some(Missile::fired(
            self.body.center_x(),
            self.body.y + self.body.h / 3.0,
            dir,
            missile_size,
        ))
    }

    /// Allowed range for the boss's left edge. A boss too wide for the
    /// arena is pinned to its left wall.
    fn arena_bounds(&self) -> (f32, f32) {
        let max_x = (LEVEL_LENGTH - self.body.w).max(BOSS_AREA_START);
        (BOSS_AREA_START, max_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelEnd, PlatformArena, PlatformKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const GROUND_Y: f32 = 550.0;

    fn arena_layout() -> LevelLayout {
        let mut platforms = PlatformArena::new();
        platforms.insert(0.0, GROUND_Y, LEVEL_LENGTH, 50.0, PlatformKind::Ground);
        LevelLayout {
            number: 1,
            platforms,
            obstacles: Vec::new(),
            level_end: LevelEnd {
                x: 8200.0,
                width: 400.0,
                height: 200.0,
            },
        }
    }

    fn boss(kind: BossKind, x: f32) -> Boss {
        Boss::spawn(kind, x, GROUND_Y, kind.sprite().default_size())
    }

    fn player_at(x: f32) -> Body {
        Body::standing_on(x, GROUND_Y, SpriteKind::Player.default_size())
    }

    #[test]
    fn hits_saturate_and_defeat_once() {
        let mut b = boss(BossKind::Primary, 7700.0);
        for i in 0..5 {
            b.invulnerable_timer = 0;
            let outcome = b.register_hit();
            if i < 4 {
                assert_eq!(outcome, HitOutcome::Hit);
            } else {
                assert_eq!(outcome, HitOutcome::Defeated);
            }
        }
        assert!(b.defeated && !b.active);
        b.invulnerable_timer = 0;
        assert_eq!(b.register_hit(), HitOutcome::Ignored);
        assert_eq!(b.hits, 5);
    }

    #[test]
    fn invulnerable_boss_ignores_hits() {
        let mut b = boss(BossKind::Second, 7850.0);
        assert_eq!(b.register_hit(), HitOutcome::Hit);
        assert_eq!(b.register_hit(), HitOutcome::Ignored);
        assert_eq!(b.hits, 1);
    }

    #[test]
    fn defeated_flags_flip_once() {
        let mut flags = DefeatedBosses::default();
        assert!(flags.mark(BossKind::Banana));
        assert!(!flags.mark(BossKind::Banana));
        assert!(flags.banana);
        assert!(!flags.primary && !flags.second);
    }

    #[test]
    fn patrol_stays_inside_arena() {
        let layout = arena_layout();
        let mut b = boss(BossKind::Second, 7500.0);
        let mut rng = StdRng::seed_from_u64(9);
        let missile = SpriteKind::Missile.default_size();
        for _ in 0..2000 {
            b.update(&layout, &LevelTuning::default(), &player_at(100.0), &mut rng, missile);
            assert!(b.body.x >= BOSS_AREA_START);
            assert!(b.body.right() <= LEVEL_LENGTH);
            assert!(b.body.bottom() <= GROUND_Y + 1e-3);
        }
    }

    #[test]
    fn boss_wider_than_arena_is_pinned_to_its_start() {
        let layout = arena_layout();
        let size = SpriteSize {
            width: 700.0,
            height: 100.0,
        };
        let mut b = Boss::spawn(BossKind::Primary, 7700.0, GROUND_Y, size);
        let mut rng = StdRng::seed_from_u64(2);
        let missile = SpriteKind::Missile.default_size();
        for _ in 0..300 {
            b.update(&layout, &LevelTuning::default(), &player_at(100.0), &mut rng, missile);
            assert_eq!(b.body.x, BOSS_AREA_START);
        }
    }

    #[test]
    fn arena_boss_jumps_after_cooldown() {
        let layout = arena_layout();
        let mut b = boss(BossKind::Primary, 7700.0);
        let mut rng = StdRng::seed_from_u64(2);
        let missile = SpriteKind::Missile.default_size();
        let mut jumped = false;
        for _ in 0..=JUMP_COOLDOWN_MIN {
            b.update(&layout, &LevelTuning::default(), &player_at(100.0), &mut rng, missile);
            jumped |= b.body.bottom() < GROUND_Y - 1.0;
        }
        assert!(jumped);
    }

    #[test]
    fn banana_boss_sleeps_until_player_close() {
        let layout = arena_layout();
        let mut b = boss(BossKind::Banana, 7750.0);
        let mut rng = StdRng::seed_from_u64(4);
        let missile = SpriteKind::Missile.default_size();
        let tuning = LevelTuning::default();
        for _ in 0..300 {
            assert!(b.update(&layout, &tuning, &player_at(5000.0), &mut rng, missile).is_none());
        }
        assert!(!b.awake);
        assert_eq!(b.body.x, 7750.0);

        b.update(&layout, &tuning, &player_at(7300.0), &mut rng, missile);
        assert!(b.awake);
        assert!(b.body.vx < 0.0, "Chases toward the player");
    }

    #[test]
    fn banana_boss_fires_every_two_seconds() {
        let layout = arena_layout();
        let mut b = boss(BossKind::Banana, 7750.0);
        b.awake = true;
        let mut rng = StdRng::seed_from_u64(4);
        let missile = SpriteKind::Missile.default_size();
        let tuning = LevelTuning::default();
        let mut fired_at = Vec::new();
        for frame in 0..400u32 {
            if b.update(&layout, &tuning, &player_at(7400.0), &mut rng, missile).is_some() {
                fired_at.push(frame);
            }
        }
        // 2000 ms at 16 ms per frame.
        assert_eq!(fired_at, vec![124, 249, 374]);
    }
}
