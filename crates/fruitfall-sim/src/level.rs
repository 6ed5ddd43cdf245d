use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Horizontal extent of every level, in world units.
pub const LEVEL_LENGTH: f32 = 8000.0;
/// Start of the boss arena. Nothing climbable or hostile is generated past it
/// except the bosses themselves.
pub const BOSS_AREA_START: f32 = 7400.0;
/// No lava gap may begin past this x.
pub const LAVA_GAP_LIMIT: f32 = 7300.0;
/// Length of the guaranteed safe ground at the start of a level.
pub const SAFE_START_LENGTH: f32 = 500.0;
/// Thickness of ground segments.
pub const GROUND_HEIGHT: f32 = 50.0;
/// Start of the level-5 factory interior.
pub const FACTORY_START: f32 = 6000.0;
/// The factory level.
pub const FACTORY_LEVEL: u32 = 5;
/// Last level of a run.
pub const FINAL_LEVEL: u32 = 5;

/// Stable handle into a [`PlatformArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Ground,
    Floating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn is_ground(&self) -> bool {
        self.kind == PlatformKind::Ground
    }
}

/// Platforms addressed by handle. Handles are never reused, so a removed
/// platform resolves to `None` instead of aliasing a different one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformArena {
    /// Sorted by id; ids increase monotonically on insert.
    platforms: Vec<Platform>,
    next_id: u32,
}

impl PlatformArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        kind: PlatformKind,
    ) -> PlatformId {
        let id = PlatformId(self.next_id);
        self.next_id += 1;
        self.platforms.push(Platform {
            id,
            x,
            y,
            width,
            height,
            kind,
        });
        id
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|idx| &self.platforms[idx])
    }

    pub fn remove(&mut self, id: PlatformId) -> Option<Platform> {
        let idx = self.platforms.binary_search_by_key(&id, |p| p.id).ok()?;
        Some(self.platforms.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn ground(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(|p| p.is_ground())
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Lava,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Trigger zone spanning `[x - width/2, x + width/2]` horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelEnd {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl LevelEnd {
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether a body spanning `[left, right]` has reached the zone.
    pub fn is_crossed_by(&self, left: f32, right: f32) -> bool {
        right >= self.left() && left <= self.right()
    }
}

/// Static geometry of the active level. Written only at level load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub number: u32,
    pub platforms: PlatformArena,
    pub obstacles: Vec<Obstacle>,
    pub level_end: LevelEnd,
}

impl LevelLayout {
    /// Top of the ground strip.
    pub fn ground_y(canvas_height: f32) -> f32 {
        canvas_height - GROUND_HEIGHT
    }

    /// Whether a ground segment fully supports the span `[x, x + width]`.
    pub fn ground_supports(&self, x: f32, width: f32) -> bool {
        self.platforms
            .ground()
            .any(|g| x >= g.x && x + width <= g.right())
    }
}
