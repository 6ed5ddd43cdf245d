//! Interfaces the simulation core calls into (or is called by). They are
//! implemented by the asset, canvas and HUD layers outside the core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_trait::InputState;

/// Every drawable entity kind. One variant per sprite the core asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Strawberry,
    Cherry,
    Banana,
    Boss,
    SecondBoss,
    BananaBoss,
    BananaPeel,
    Missile,
    Barrel,
    Platform,
    Ground,
    Rock,
    Lava,
    Conveyor,
    Syrup,
    Slicer,
    CollapsingPlatform,
    Hook,
    LevelEnd,
}

impl SpriteKind {
    /// Built-in sprite size used when no asset layer is attached.
    pub fn default_size(self) -> SpriteSize {
        let (width, height) = match self {
            SpriteKind::Player => (40.0, 50.0),
            SpriteKind::Strawberry => (40.0, 40.0),
            SpriteKind::Cherry => (36.0, 40.0),
            SpriteKind::Banana => (40.0, 48.0),
            SpriteKind::Boss => (100.0, 100.0),
            SpriteKind::SecondBoss => (90.0, 110.0),
            SpriteKind::BananaBoss => (120.0, 120.0),
            SpriteKind::BananaPeel => (30.0, 16.0),
            SpriteKind::Missile => (30.0, 14.0),
            SpriteKind::Barrel => (40.0, 40.0),
            SpriteKind::Rock => (48.0, 40.0),
            SpriteKind::Hook => (60.0, 15.0),
            SpriteKind::LevelEnd => (60.0, 200.0),
            // Level geometry is sized by the generator, not the atlas.
            SpriteKind::Platform
            | SpriteKind::Ground
            | SpriteKind::Lava
            | SpriteKind::Conveyor
            | SpriteKind::Syrup
            | SpriteKind::Slicer
            | SpriteKind::CollapsingPlatform => (0.0, 0.0),
        };
        SpriteSize { width, height }
    }
}

/// Width and height of a sprite in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: f32,
    pub height: f32,
}

/// A draw call that the canvas layer could not honour.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("sprite {0:?} is not loaded")]
    MissingSprite(SpriteKind),
    #[error("canvas unavailable: {0}")]
    CanvasUnavailable(String),
}

/// Polled once per frame at the top of the player update.
pub trait InputSource {
    fn input_state(&mut self) -> InputState;
}

/// Asset sizing; feeds entity size fields at spawn.
pub trait SpriteAtlas {
    fn sprite_dimensions(&self, kind: SpriteKind) -> SpriteSize;
}

/// Render primitive. Coordinates are screen-space (world x minus camera x).
pub trait Canvas {
    fn draw_sprite(
        &mut self,
        sprite: SpriteKind,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        flip_horizontal: bool,
    ) -> Result<(), DrawError>;
}

/// HUD sync and overlay notifications. The core never renders text itself.
pub trait Hud {
    fn report_score(&mut self, score: u32);
    fn report_lives(&mut self, lives: u32);
    fn on_level_complete(&mut self, score: u32);
    fn on_game_over(&mut self, score: u32);
    fn on_boss_defeated(&mut self, message: &str);
}

/// Everything a frame driver needs from the outside world.
pub trait Frontend: InputSource + Canvas + Hud {}

impl<T: InputSource + Canvas + Hud> Frontend for T {}

/// Atlas that answers with the built-in sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAtlas;

impl SpriteAtlas for DefaultAtlas {
    fn sprite_dimensions(&self, kind: SpriteKind) -> SpriteSize {
        kind.default_size()
    }
}
