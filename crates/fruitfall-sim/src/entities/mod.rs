pub mod boss;
pub mod enemy;
pub mod player;

use serde::{Deserialize, Serialize};

use fruitfall_core::frontend::{DefaultAtlas, SpriteAtlas, SpriteKind, SpriteSize};

use crate::geometry::Rect;

pub use boss::{Boss, BossKind, DefeatedBosses};
pub use enemy::{Enemy, EnemyKind};
pub use player::{DeathCause, Player};

/// Kinematic part shared by every moving entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, size: SpriteSize) -> Self {
        Self {
            x,
            y,
            w: size.width,
            h: size.height,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Body standing on a surface whose top is at `surface_y`.
    pub fn standing_on(x: f32, surface_y: f32, size: SpriteSize) -> Self {
        Self::new(x, surface_y - size.height, size)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }
}

/// Sprite sizes resolved once from the asset layer and reused at every spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSizes {
    pub player: SpriteSize,
    pub strawberry: SpriteSize,
    pub cherry: SpriteSize,
    pub banana: SpriteSize,
    pub boss: SpriteSize,
    pub second_boss: SpriteSize,
    pub banana_boss: SpriteSize,
    pub peel: SpriteSize,
    pub missile: SpriteSize,
    pub barrel: SpriteSize,
}

impl SpriteSizes {
    pub fn from_atlas(atlas: &dyn SpriteAtlas) -> Self {
        let get = |kind: SpriteKind| {
            let size = atlas.sprite_dimensions(kind);
            // A broken asset must not produce zero-size or NaN hitboxes.
            if size.width.is_finite()
                && size.height.is_finite()
                && size.width > 0.0
                && size.height > 0.0
            {
                size
            } else {
                tracing::warn!(?kind, "Invalid sprite dimensions, using built-in size");
                kind.default_size()
            }
        };
        Self {
            player: get(SpriteKind::Player),
            strawberry: get(SpriteKind::Strawberry),
            cherry: get(SpriteKind::Cherry),
            banana: get(SpriteKind::Banana),
            boss: get(SpriteKind::Boss),
            second_boss: get(SpriteKind::SecondBoss),
            banana_boss: get(SpriteKind::BananaBoss),
            peel: get(SpriteKind::BananaPeel),
            missile: get(SpriteKind::Missile),
            barrel: get(SpriteKind::Barrel),
        }
    }

    pub fn enemy(&self, kind: EnemyKind) -> SpriteSize {
        match kind {
            EnemyKind::Strawberry => self.strawberry,
            EnemyKind::Cherry => self.cherry,
            EnemyKind::Banana => self.banana,
        }
    }

    pub fn boss(&self, kind: BossKind) -> SpriteSize {
        match kind {
            BossKind::Primary => self.boss,
            BossKind::Second => self.second_boss,
            BossKind::Banana => self.banana_boss,
        }
    }
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self::from_atlas(&DefaultAtlas)
    }
}
