use serde::{Deserialize, Serialize};

/// Axis-aligned box in screen-space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
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
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Shrink each edge inward by the matching buffer amount.
    pub fn shrink(&self, buffer: Buffer) -> Rect {
        Rect {
            x: self.x + buffer.left,
            y: self.y + buffer.top,
            w: self.w - buffer.left - buffer.right,
            h: self.h - buffer.top - buffer.bottom,
        }
    }
}

/// Per-side tolerance in pixels. Positive values shrink a box, negative grow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Buffer {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Buffer {
    pub const NONE: Buffer = Buffer {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };
}

/// AABB overlap after shrinking `a` by `buffer`.
///
/// Zero-size, inverted (over-shrunk) or non-finite boxes never overlap.
pub fn overlaps(a: &Rect, b: &Rect, buffer: Buffer) -> bool {
    let a = a.shrink(buffer);
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    if a.w <= 0.0 || a.h <= 0.0 || b.w <= 0.0 || b.h <= 0.0 {
        return false;
    }
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Push-out distances of `a` out of `b` along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Distance to move `a` left so its right edge meets `b`'s left edge.
    pub left: f32,
    /// Distance to move `a` right so its left edge meets `b`'s right edge.
    pub right: f32,
    /// Distance to move `a` up so it rests on `b`'s top.
    pub top: f32,
    /// Distance to move `a` down so it sits under `b`'s bottom.
    pub bottom: f32,
}

/// Which way to push along the minimum-penetration axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOut {
    Left,
    Right,
    Up,
    Down,
}

impl Penetration {
    pub fn between(a: &Rect, b: &Rect) -> Self {
        Self {
            left: a.right() - b.x,
            right: b.right() - a.x,
            top: a.bottom() - b.y,
            bottom: b.bottom() - a.y,
        }
    }

    /// Axis with the smallest push-out distance. Ties resolve in
    /// left, right, top, bottom order.
    pub fn min_axis(&self) -> PushOut {
        let min = self.left.min(self.right).min(self.top).min(self.bottom);
        if min == self.left {
            PushOut::Left
        } else if min == self.right {
            PushOut::Right
        } else if min == self.top {
            PushOut::Up
        } else {
            PushOut::Down
        }
    }
}
