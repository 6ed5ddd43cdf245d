use rand::Rng;
use serde::{Deserialize, Serialize};

use fruitfall_core::frontend::{SpriteKind, SpriteSize};
use fruitfall_core::time::FRAME_MS;

use super::Body;
use crate::config::LevelTuning;
use crate::hazards::BananaPeel;
use crate::level::{BOSS_AREA_START, LevelLayout, PlatformId};
use crate::physics::{self, PrevEdges};

/// Player must be this close before a banana enemy throws.
pub const PEEL_THROW_RANGE: f32 = 800.0;
/// Randomized throw cooldown bounds.
pub const PEEL_COOLDOWN_MIN_MS: f32 = 2000.0;
pub const PEEL_COOLDOWN_MAX_MS: f32 = 5000.0;
/// Platform riders patrol at this speed before level scaling.
pub const PATROL_SPEED: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Strawberry,
    Cherry,
    Banana,
}

impl EnemyKind {
    pub fn sprite(self) -> SpriteKind {
        match self {
            EnemyKind::Strawberry => SpriteKind::Strawberry,
            EnemyKind::Cherry => SpriteKind::Cherry,
            EnemyKind::Banana => SpriteKind::Banana,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    /// Platform this enemy patrols, if it is a rider.
    pub platform: Option<PlatformId>,
    pub active: bool,
    pub is_alive: bool,
    pub throw_cooldown_ms: f32,
    /// Bottom edge before this frame's motion, for stomp tests.
    pub prev_bottom: f32,
}

impl Enemy {
    /// Ground walker resting on `ground_y`.
    pub fn on_ground(kind: EnemyKind, x: f32, ground_y: f32, size: SpriteSize, vx: f32) -> Self {
        let mut body = Body::standing_on(x, ground_y, size);
        body.vx = vx;
        Self::with_body(kind, body, None)
    }

    /// Rider centered on a floating platform.
    pub fn on_platform(
        kind: EnemyKind,
        platform: PlatformId,
        platform_x: f32,
        platform_y: f32,
        platform_w: f32,
        size: SpriteSize,
        vx: f32,
    ) -> Self {
        let x = platform_x + (platform_w - size.width) / 2.0;
        let mut body = Body::standing_on(x, platform_y, size);
        body.vx = vx;
        Self::with_body(kind, body, Some(platform))
    }

    fn with_body(kind: EnemyKind, body: Body, platform: Option<PlatformId>) -> Self {
        Self {
            prev_bottom: body.bottom(),
            body,
            kind,
            platform,
            active: true,
            is_alive: true,
            throw_cooldown_ms: PEEL_COOLDOWN_MIN_MS,
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.is_alive = false;
    }

    /// Advance one frame. Returns a peel if a banana enemy threw one.
    pub fn update(
        &mut self,
        layout: &LevelLayout,
        tuning: &LevelTuning,
        player_x: f32,
        rng: &mut impl Rng,
        peel_size: SpriteSize,
    ) -> Option<BananaPeel> {
        if !self.active {
            return None;
        }
        self.prev_bottom = self.body.bottom();
        match self.platform {
            Some(id) => self.patrol_platform(id, layout),
            None => self.walk_ground(layout, tuning),
        }
        if self.active && self.body.x > BOSS_AREA_START {
            self.deactivate();
        }
        if self.active && self.kind == EnemyKind::Banana {
            return self.maybe_throw(player_x, rng, peel_size);
        }
        None
    }

    fn patrol_platform(&mut self, id: PlatformId, layout: &LevelLayout) {
        let Some(platform) = layout.platforms.get(id) else {
            tracing::warn!(?id, kind = ?self.kind, "Enemy bound to missing platform, deactivating");
            self.deactivate();
            return;
        };
        self.body.x += self.body.vx;
        if self.body.x <= platform.x {
            self.body.x = platform.x;
            self.body.vx = self.body.vx.abs();
        } else if self.body.right() >= platform.right() {
            self.body.x = platform.right() - self.body.w;
            self.body.vx = -self.body.vx.abs();
        }
        self.body.y = platform.y - self.body.h;
        self.body.vy = 0.0;
    }

    fn walk_ground(&mut self, layout: &LevelLayout, tuning: &LevelTuning) {
        let prev = PrevEdges::of(&self.body);
        physics::integrate(&mut self.body, tuning.gravity);
        physics::sanitize(&mut self.body, prev);

        let tolerance = tuning.landing_tolerance;
        let contacts =
            physics::resolve_platforms(&mut self.body, prev, &layout.platforms, tolerance);
        let obstacles =
            physics::resolve_obstacles(&mut self.body, prev, &layout.obstacles, tolerance);
        if obstacles.lava || physics::fell_out_of_world(&self.body, tuning.canvas_height) {
            self.deactivate();
            return;
        }
        if contacts.side || obstacles.side {
            self.body.vx = -self.body.vx;
            return;
        }

        // Turn around at the end of the ground segment underfoot.
        if let Some(segment) = contacts.landed_on.and_then(|id| layout.platforms.get(id)) {
            if segment.is_ground() {
                if self.body.x <= segment.x && self.body.vx < 0.0 {
                    self.body.x = segment.x;
                    self.body.vx = -self.body.vx;
                } else if self.body.right() >= segment.right() && self.body.vx > 0.0 {
                    self.body.x = segment.right() - self.body.w;
                    self.body.vx = -self.body.vx;
                }
            }
        }
    }

    fn maybe_throw(
        &mut self,
        player_x: f32,
        rng: &mut impl Rng,
        peel_size: SpriteSize,
    ) -> Option<BananaPeel> {
        self.throw_cooldown_ms -= FRAME_MS;
        if self.throw_cooldown_ms > 0.0 {
            return None;
        }
        self.throw_cooldown_ms = rng.random_range(PEEL_COOLDOWN_MIN_MS..=PEEL_COOLDOWN_MAX_MS);
        if (player_x - self.body.center_x()).abs() > PEEL_THROW_RANGE {
            return None;
        }
        let dir = if player_x < self.body.center_x() { -1.0 } else { 1.0 };
        Some(BananaPeel::thrown(self.body.center_x(), self.body.y, dir, peel_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelEnd, LEVEL_LENGTH, Obstacle, ObstacleKind, PlatformArena, PlatformKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const GROUND_Y: f32 = 550.0;

    fn layout(arena: PlatformArena, obstacles: Vec<Obstacle>) -> LevelLayout {
        LevelLayout {
            number: 2,
            platforms: arena,
            obstacles,
            level_end: LevelEnd {
                x: 8200.0,
                width: 400.0,
                height: 200.0,
            },
        }
    }

    fn size(kind: EnemyKind) -> SpriteSize {
        kind.sprite().default_size()
    }

    fn step(enemy: &mut Enemy, layout: &LevelLayout) -> Option<BananaPeel> {
        let mut rng = StdRng::seed_from_u64(1);
        let peel_size = SpriteKind::BananaPeel.default_size();
        enemy.update(layout, &LevelTuning::default(), 0.0, &mut rng, peel_size)
    }

    #[test]
    fn rider_reverses_at_platform_edge() {
        let mut arena = PlatformArena::new();
        let id = arena.insert(1000.0, 400.0, 120.0, 20.0, PlatformKind::Floating);
        let layout = layout(arena, Vec::new());
        let s = size(EnemyKind::Cherry);
        let mut e = Enemy::on_platform(EnemyKind::Cherry, id, 1000.0, 400.0, 120.0, s, 2.0);
        for _ in 0..200 {
            step(&mut e, &layout);
            assert!(e.body.x >= 1000.0 && e.body.right() <= 1120.0);
            assert_eq!(e.body.bottom(), 400.0);
        }
        assert!(e.active);
    }

    #[test]
    fn dangling_platform_deactivates_only_that_enemy() {
        let mut arena = PlatformArena::new();
        let id = arena.insert(1000.0, 400.0, 120.0, 20.0, PlatformKind::Floating);
        let keep = arena.insert(1400.0, 400.0, 120.0, 20.0, PlatformKind::Floating);
        arena.remove(id);
        let layout = layout(arena, Vec::new());
        let s = size(EnemyKind::Strawberry);
        let kind = EnemyKind::Strawberry;
        let mut orphan = Enemy::on_platform(kind, id, 1000.0, 400.0, 120.0, s, 1.0);
        let mut other = Enemy::on_platform(kind, keep, 1400.0, 400.0, 120.0, s, 1.0);
        step(&mut orphan, &layout);
        step(&mut other, &layout);
        assert!(!orphan.active);
        assert!(other.active);
    }

    #[test]
    fn ground_walker_turns_at_segment_end() {
        let mut arena = PlatformArena::new();
        arena.insert(0.0, GROUND_Y, 500.0, 50.0, PlatformKind::Ground);
        let layout = layout(arena, Vec::new());
        let s = size(EnemyKind::Strawberry);
        let mut e = Enemy::on_ground(EnemyKind::Strawberry, 440.0, GROUND_Y, s, 2.0);
        for _ in 0..30 {
            step(&mut e, &layout);
        }
        assert!(e.active);
        assert!(e.body.vx < 0.0);
        assert!(e.body.right() <= 500.0);
    }

    #[test]
    fn walker_in_lava_is_deactivated() {
        let lava = Obstacle {
            x: 300.0,
            y: GROUND_Y + 10.0,
            width: 100.0,
            height: 40.0,
            kind: ObstacleKind::Lava,
        };
        let layout = layout(PlatformArena::new(), vec![lava]);
        let s = size(EnemyKind::Cherry);
        let mut e = Enemy::on_ground(EnemyKind::Cherry, 320.0, GROUND_Y + 20.0, s, 0.0);
        step(&mut e, &layout);
        assert!(!e.active);
    }

    #[test]
    fn walker_past_arena_threshold_is_deactivated() {
        let mut arena = PlatformArena::new();
        arena.insert(0.0, GROUND_Y, LEVEL_LENGTH, 50.0, PlatformKind::Ground);
        let layout = layout(arena, Vec::new());
        let s = size(EnemyKind::Strawberry);
        let mut e =
            Enemy::on_ground(EnemyKind::Strawberry, BOSS_AREA_START - 1.0, GROUND_Y, s, 2.0);
        step(&mut e, &layout);
        assert!(!e.active);
    }

    #[test]
    fn banana_throws_toward_player_when_close() {
        let mut arena = PlatformArena::new();
        arena.insert(0.0, GROUND_Y, LEVEL_LENGTH, 50.0, PlatformKind::Ground);
        let layout = layout(arena, Vec::new());
        let s = size(EnemyKind::Banana);
        let mut e = Enemy::on_ground(EnemyKind::Banana, 1000.0, GROUND_Y, s, 0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let peel_size = SpriteKind::BananaPeel.default_size();
        let tuning = LevelTuning::default();
        let mut peel = None;
        for _ in 0..200 {
            if let Some(p) = e.update(&layout, &tuning, 700.0, &mut rng, peel_size) {
                peel = Some(p);
                break;
            }
        }
        let peel = peel.expect("banana should throw within the first cooldown");
        assert!(peel.vx < 0.0);
        assert!((PEEL_COOLDOWN_MIN_MS..=PEEL_COOLDOWN_MAX_MS).contains(&e.throw_cooldown_ms));
    }

    #[test]
    fn banana_holds_fire_when_player_far() {
        let mut arena = PlatformArena::new();
        arena.insert(0.0, GROUND_Y, LEVEL_LENGTH, 50.0, PlatformKind::Ground);
        let layout = layout(arena, Vec::new());
        let s = size(EnemyKind::Banana);
        let mut e = Enemy::on_ground(EnemyKind::Banana, 3000.0, GROUND_Y, s, 0.0);
        let mut rng = StdRng::seed_from_u64(3);
        let peel_size = SpriteKind::BananaPeel.default_size();
        let tuning = LevelTuning::default();
        for _ in 0..600 {
            let peel = e.update(&layout, &tuning, 100.0, &mut rng, peel_size);
            assert!(peel.is_none());
        }
    }
}
