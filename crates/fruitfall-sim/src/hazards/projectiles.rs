use serde::{Deserialize, Serialize};

use fruitfall_core::frontend::SpriteSize;
use fruitfall_core::time::FRAME_MS;

use super::devices::ConveyorBelt;
use crate::geometry::{Buffer, Rect, overlaps};
use crate::level::{BOSS_AREA_START, FACTORY_START, LEVEL_LENGTH, LevelLayout};

pub const PEEL_GRAVITY: f32 = 0.3;
pub const PEEL_THROW_VX: f32 = 3.0;
pub const PEEL_THROW_VY: f32 = -5.0;
/// Peels rot away after this long.
pub const PEEL_LIFETIME_MS: f32 = 6000.0;

pub const MISSILE_GRAVITY: f32 = 0.25;
pub const MISSILE_VX: f32 = 6.0;
pub const MISSILE_VY: f32 = -7.0;

pub const BARREL_INTERVAL_MS: f32 = 4000.0;

/// Thrown by banana enemies. Forces a slide on contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BananaPeel {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    pub active: bool,
    pub grounded: bool,
    pub age_ms: f32,
}

impl BananaPeel {
    /// Peel launched from `(center_x, top)` toward `dir` (-1 or 1).
    pub fn thrown(center_x: f32, top: f32, dir: f32, size: SpriteSize) -> Self {
        Self {
            x: center_x - size.width / 2.0,
            y: top,
            w: size.width,
            h: size.height,
            vx: dir * PEEL_THROW_VX,
            vy: PEEL_THROW_VY,
            active: true,
            grounded: false,
            age_ms: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn update(&mut self, layout: &LevelLayout, canvas_height: f32) {
        if !self.active {
            return;
        }
        self.age_ms += FRAME_MS;
        if self.age_ms >= PEEL_LIFETIME_MS {
            self.active = false;
            return;
        }
        if !self.grounded {
            let prev_bottom = self.y + self.h;
            self.vy += PEEL_GRAVITY;
            self.x += self.vx;
            self.y += self.vy;
            if let Some(top) = landing_top(&self.rect(), prev_bottom, self.vy, layout) {
                self.y = top - self.h;
                self.vx = 0.0;
                self.vy = 0.0;
                self.grounded = true;
            }
        }
        if self.y > canvas_height {
            self.active = false;
        }
    }
}

/// Fired by the banana boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Missile {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
}

impl Missile {
    pub fn fired(center_x: f32, y: f32, dir: f32, size: SpriteSize) -> Self {
        Self {
            x: center_x - size.width / 2.0,
            y,
            w: size.width,
            h: size.height,
            velocity_x: dir * MISSILE_VX,
            velocity_y: MISSILE_VY,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Move one frame. Returns false once the missile should be removed.
    pub fn update(&mut self, layout: &LevelLayout, canvas_height: f32) -> bool {
        self.velocity_y += MISSILE_GRAVITY;
        self.x += self.velocity_x;
        self.y += self.velocity_y;
        if self.y > canvas_height || self.x + self.w < 0.0 || self.x > LEVEL_LENGTH {
            return false;
        }
        let rect = self.rect();
        !layout
            .platforms
            .ground()
            .any(|g| overlaps(&rect, &g.rect(), Buffer::NONE))
    }
}

/// Barrel dropped inside the factory. Rides conveyors, rolls on the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BananaBarrel {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub on_conveyor: bool,
}

impl BananaBarrel {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Move one frame. Returns false once the barrel left the factory or the world.
    pub fn update(
        &mut self,
        layout: &LevelLayout,
        conveyors: &[ConveyorBelt],
        gravity: f32,
        canvas_height: f32,
    ) -> bool {
        let prev_bottom = self.y + self.h;
        self.velocity_y += gravity;
        self.x += self.velocity_x;
        self.y += self.velocity_y;
        self.on_conveyor = false;

        let rect = self.rect();
        let belt = conveyors.iter().find(|c| {
            self.velocity_y > 0.0
                && prev_bottom <= c.y + 10.0
                && overlaps(&rect, &c.rect(), Buffer::NONE)
        });
        if let Some(belt) = belt {
            self.y = belt.y - self.h;
            self.velocity_y = 0.0;
            self.velocity_x = belt.drag();
            self.on_conveyor = true;
        } else if let Some(top) = landing_top(&rect, prev_bottom, self.velocity_y, layout) {
            self.y = top - self.h;
            self.velocity_y = 0.0;
        }

        self.y <= canvas_height && self.x + self.w >= FACTORY_START && self.x < BOSS_AREA_START
    }
}

/// Drops a barrel every `interval_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrelSpawner {
    pub x: f32,
    pub y: f32,
    pub interval_ms: f32,
    pub timer_ms: f32,
}

impl BarrelSpawner {
    pub fn new(x: f32, y: f32, interval_ms: f32) -> Self {
        Self {
            x,
            y,
            interval_ms,
            timer_ms: 0.0,
        }
    }

    pub fn update(&mut self, size: SpriteSize) -> Option<BananaBarrel> {
        self.timer_ms += FRAME_MS;
        if self.timer_ms < self.interval_ms {
            return None;
        }
        self.timer_ms = 0.0;
        Some(BananaBarrel {
            x: self.x,
            y: self.y,
            w: size.width,
            h: size.height,
            velocity_x: 0.0,
            velocity_y: 0.0,
            on_conveyor: false,
        })
    }
}

/// Top of the ground segment a falling box just landed on, if any.
fn landing_top(rect: &Rect, prev_bottom: f32, vy: f32, layout: &LevelLayout) -> Option<f32> {
    if vy <= 0.0 {
        return None;
    }
    layout
        .platforms
        .ground()
        .find(|g| prev_bottom <= g.y + 10.0 && overlaps(rect, &g.rect(), Buffer::NONE))
        .map(|g| g.y)
}
