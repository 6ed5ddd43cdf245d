use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SimConfig;
use crate::entities::enemy::PATROL_SPEED;
use crate::entities::{Boss, BossKind, Enemy, EnemyKind, SpriteSizes};
use crate::level::{
    BOSS_AREA_START, FACTORY_START, GROUND_HEIGHT, LAVA_GAP_LIMIT, LEVEL_LENGTH, LevelEnd,
    LevelLayout, Obstacle, ObstacleKind, PlatformArena, PlatformId, PlatformKind,
    SAFE_START_LENGTH,
};

const GAP_MIN: f32 = 80.0;
const GAP_MAX: f32 = 180.0;
const SEGMENT_MIN: f32 = 200.0;
const SEGMENT_MAX: f32 = 500.0;
/// Lava sits this far below the ground line.
const LAVA_DEPTH: f32 = 10.0;
const LAVA_HEIGHT: f32 = 40.0;

const FLOATING_CANDIDATES: u32 = 40;
const FLOATING_HEIGHT: f32 = 20.0;
const CHILD_PLATFORM_CHANCE: f64 = 0.4;

const BASE_ENEMY_COUNT: f32 = 30.0;
const LEVEL_END_HEIGHT: f32 = 200.0;

/// Everything the generator produces for one level.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLevel {
    pub layout: LevelLayout,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Boss>,
}

/// Seed used for `level`. Reloading a level with the same base seed replays
/// the same layout.
pub fn level_seed(seed: u64, level: u32) -> u64 {
    seed ^ u64::from(level).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Generate `level` with default sizes and tuning.
pub fn generate_level(level: u32, seed: u64) -> GeneratedLevel {
    let mut rng = StdRng::seed_from_u64(level_seed(seed, level));
    LevelGenerator::new(SpriteSizes::default(), SimConfig::default()).generate(level, &mut rng)
}

pub struct LevelGenerator {
    sizes: SpriteSizes,
    config: SimConfig,
}

impl LevelGenerator {
    pub fn new(sizes: SpriteSizes, config: SimConfig) -> Self {
        Self { sizes, config }
    }

    pub fn generate(&self, level: u32, rng: &mut impl Rng) -> GeneratedLevel {
        let tuning = self.config.tuning(level);
        let ground_y = tuning.ground_y();
        let factory = level == crate::level::FACTORY_LEVEL;

        let mut layout = LevelLayout {
            number: level,
            platforms: PlatformArena::new(),
            obstacles: Vec::new(),
            level_end: level_end(factory),
        };

        let (ground, gaps) = ground_spans(level, factory, rng);
        for &(start, end) in &ground {
            layout
                .platforms
                .insert(start, ground_y, end - start, GROUND_HEIGHT, PlatformKind::Ground);
        }
        for &(start, end) in &gaps {
            layout.obstacles.push(Obstacle {
                x: start,
                y: ground_y + LAVA_DEPTH,
                width: end - start,
                height: LAVA_HEIGHT,
                kind: ObstacleKind::Lava,
            });
        }

        let floating = place_floating_platforms(&mut layout, ground_y, factory, rng);
        place_rocks(&mut layout, ground_y, factory, rng);

        let mut enemies = self.place_ground_enemies(&layout, ground_y, tuning.scale, factory, rng);
        enemies.extend(self.place_riders(&layout, &floating, tuning.scale, rng));
        let bosses = self.place_bosses(level, ground_y);

        tracing::debug!(
            level,
            platforms = layout.platforms.len(),
            obstacles = layout.obstacles.len(),
            enemies = enemies.len(),
            bosses = bosses.len(),
            "Generated level"
        );

        GeneratedLevel {
            layout,
            enemies,
            bosses,
        }
    }

    fn place_ground_enemies(
        &self,
        layout: &LevelLayout,
        ground_y: f32,
        scale: f32,
        factory: bool,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        let mut enemies = Vec::new();
        for i in 0..ground_enemy_count(layout.number) {
            let x = 800.0 + 250.0 * i as f32 + rng.random_range(-50.0..=50.0);
            let kind = enemy_kind(layout.number, rng);
            let speed = rng.random_range(1.0..=2.0) * scale;
            let size = self.sizes.enemy(kind);
            if x >= BOSS_AREA_START || !layout.ground_supports(x, size.width) {
                continue;
            }
            if factory && x + size.width > FACTORY_START {
                continue;
            }
            enemies.push(Enemy::on_ground(kind, x, ground_y, size, -speed));
        }
        enemies
    }

    fn place_riders(
        &self,
        layout: &LevelLayout,
        floating: &[PlatformId],
        scale: f32,
        rng: &mut impl Rng,
    ) -> Vec<Enemy> {
        let chance = rider_chance(layout.number);
        let mut riders = Vec::new();
        for &id in floating {
            let Some(platform) = layout.platforms.get(id) else {
                continue;
            };
            let kind = enemy_kind(layout.number, rng);
            let size = self.sizes.enemy(kind);
            if platform.right() > BOSS_AREA_START || platform.width < size.width * 2.0 {
                continue;
            }
            if !rng.random_bool(chance) {
                continue;
            }
            let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            riders.push(Enemy::on_platform(
                kind,
                id,
                platform.x,
                platform.y,
                platform.width,
                size,
                dir * PATROL_SPEED * scale,
            ));
        }
        riders
    }

    fn place_bosses(&self, level: u32, ground_y: f32) -> Vec<Boss> {
        boss_roster(level)
            .iter()
            .map(|&(kind, x)| Boss::spawn(kind, x, ground_y, self.sizes.boss(kind)))
            .collect()
    }
}

/// Ground spans and lava gaps as `(start, end)` pairs, in order.
fn ground_spans(
    level: u32,
    factory: bool,
    rng: &mut impl Rng,
) -> (Vec<(f32, f32)>, Vec<(f32, f32)>) {
    if level <= 1 {
        return (vec![(0.0, LEVEL_LENGTH)], Vec::new());
    }
    // The factory floor must be solid too.
    let (gap_start_limit, gap_end_limit) = if factory {
        (FACTORY_START, FACTORY_START)
    } else {
        (LAVA_GAP_LIMIT, BOSS_AREA_START)
    };

    let mut ground = vec![(0.0, SAFE_START_LENGTH)];
    let mut gaps = Vec::new();
    let mut x = SAFE_START_LENGTH;
    loop {
        let gap = rng.random_range(GAP_MIN..=GAP_MAX);
        if x > gap_start_limit || x + gap > gap_end_limit {
            break;
        }
        let start = x + gap;
        let end = start + rng.random_range(SEGMENT_MIN..=SEGMENT_MAX);
        gaps.push((x, start));
        ground.push((start, end));
        x = end;
        if end >= BOSS_AREA_START {
            break;
        }
    }
    if let Some(last) = ground.last_mut() {
        last.1 = LEVEL_LENGTH;
    }
    (ground, gaps)
}

/// Floating platforms plus their optional smaller companions. Returns the
/// handles of every floating platform placed.
fn place_floating_platforms(
    layout: &mut LevelLayout,
    ground_y: f32,
    factory: bool,
    rng: &mut impl Rng,
) -> Vec<PlatformId> {
    let mut placed = Vec::new();
    for i in 0..FLOATING_CANDIDATES {
        let x = 200.0 + 200.0 * i as f32 + rng.random_range(-50.0..=50.0);
        let width = rng.random_range(100.0..=300.0);
        let y = ground_y - rng.random_range(100.0..=250.0);
        if x >= BOSS_AREA_START || (factory && x + width > FACTORY_START) {
            continue;
        }
        placed.push(
            layout
                .platforms
                .insert(x, y, width, FLOATING_HEIGHT, PlatformKind::Floating),
        );

        if !rng.random_bool(CHILD_PLATFORM_CHANCE) {
            continue;
        }
        let child_w = rng.random_range(60.0..=120.0_f32).min(width);
        let child_x = x + rng.random_range(0.0..=(width - child_w));
        let child_y = y - rng.random_range(90.0..=130.0);
        if child_x + child_w > BOSS_AREA_START {
            continue;
        }
        placed.push(
            layout
                .platforms
                .insert(child_x, child_y, child_w, FLOATING_HEIGHT, PlatformKind::Floating),
        );
    }
    placed
}

fn place_rocks(layout: &mut LevelLayout, ground_y: f32, factory: bool, rng: &mut impl Rng) {
    let count = if layout.number <= 1 { 25 } else { 30 };
    for i in 0..count {
        let x = 600.0 + 300.0 * i as f32 + rng.random_range(-60.0..=60.0);
        let width = rng.random_range(40.0..=60.0);
        let height = rng.random_range(30.0..=50.0);
        if x + width > BOSS_AREA_START || !layout.ground_supports(x, width) {
            continue;
        }
        if factory && x + width > FACTORY_START {
            continue;
        }
        layout.obstacles.push(Obstacle {
            x,
            y: ground_y - height,
            width,
            height,
            kind: ObstacleKind::Rock,
        });
    }
}

fn level_end(factory: bool) -> LevelEnd {
    if factory {
        LevelEnd {
            x: 7850.0,
            width: 100.0,
            height: LEVEL_END_HEIGHT,
        }
    } else {
        LevelEnd {
            x: 8200.0,
            width: 400.0,
            height: LEVEL_END_HEIGHT,
        }
    }
}

fn ground_enemy_count(level: u32) -> u32 {
    match level {
        0 | 1 => 8,
        2 => (BASE_ENEMY_COUNT * 1.1).round() as u32,
        3 => (BASE_ENEMY_COUNT * 1.2).round() as u32,
        4 => (BASE_ENEMY_COUNT * 1.3).round() as u32,
        _ => 20,
    }
}

fn enemy_kind(level: u32, rng: &mut impl Rng) -> EnemyKind {
    match level {
        0..=2 => EnemyKind::Strawberry,
        3 => EnemyKind::Cherry,
        4 => {
            if rng.random_bool(0.5) {
                EnemyKind::Strawberry
            } else {
                EnemyKind::Cherry
            }
        },
        _ => EnemyKind::Banana,
    }
}

fn rider_chance(level: u32) -> f64 {
    match level {
        0 | 1 => 0.1,
        2 => 0.4,
        3 => 0.5,
        _ => 0.6,
    }
}

/// Bosses waiting in the arena of `level`.
pub fn boss_roster(level: u32) -> &'static [(BossKind, f32)] {
    match level {
        4 => &[(BossKind::Primary, 7600.0), (BossKind::Second, 7850.0)],
        5 => &[(BossKind::Banana, 7750.0)],
        _ => &[(BossKind::Primary, 7700.0)],
    }
}
