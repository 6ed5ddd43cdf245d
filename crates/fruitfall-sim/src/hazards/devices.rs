//! Fixed factory machinery: belts, syrup, slicers, crumbling ledges and hooks.

use serde::{Deserialize, Serialize};

use fruitfall_core::time::FRAME_MS;

use crate::geometry::Rect;

/// Time an unstable platform holds before it gives way.
pub const COLLAPSE_DELAY_MS: f32 = 2000.0;
/// Walk speed multiplier inside syrup.
pub const SYRUP_SLOWDOWN: f32 = 0.5;
/// Rope length of a factory hook.
pub const HOOK_LENGTH: f32 = 60.0;
/// Slicer blade spin per frame, radians.
pub const SLICER_SPIN: f32 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConveyorBelt {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// -1.0 or 1.0.
    pub direction: f32,
    pub speed: f32,
}

impl ConveyorBelt {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Horizontal displacement applied to anything resting on the belt.
    pub fn drag(&self) -> f32 {
        self.direction * self.speed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyrupPool {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SyrupPool {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Blade on a duty cycle; only dangerous while active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatingSlicer {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub rotation: f32,
    pub active: bool,
    pub timer_ms: f32,
    pub active_time_ms: f32,
    pub inactive_time_ms: f32,
}

impl RotatingSlicer {
    pub fn new(x: f32, y: f32, w: f32, h: f32, active_time_ms: f32, inactive_time_ms: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            rotation: 0.0,
            active: true,
            timer_ms: 0.0,
            active_time_ms,
            inactive_time_ms,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn update(&mut self) {
        self.rotation = (self.rotation + SLICER_SPIN) % std::f32::consts::TAU;
        self.timer_ms += FRAME_MS;
        let phase = if self.active {
            self.active_time_ms
        } else {
            self.inactive_time_ms
        };
        if self.timer_ms >= phase {
            self.active = !self.active;
            self.timer_ms = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollapseState {
    Stable,
    Unstable { elapsed_ms: f32 },
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapsingPlatform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub state: CollapseState,
}

impl CollapsingPlatform {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            state: CollapseState::Stable,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn is_solid(&self) -> bool {
        !matches!(self.state, CollapseState::Collapsed)
    }

    /// Something landed on it. Starts the countdown once.
    pub fn trigger(&mut self) {
        if self.state == CollapseState::Stable {
            self.state = CollapseState::Unstable { elapsed_ms: 0.0 };
        }
    }

    pub fn update(&mut self) {
        if let CollapseState::Unstable { elapsed_ms } = self.state {
            let elapsed_ms = elapsed_ms + FRAME_MS;
            self.state = if elapsed_ms >= COLLAPSE_DELAY_MS {
                tracing::debug!(x = self.x, "Platform collapsed");
                CollapseState::Collapsed
            } else {
                CollapseState::Unstable { elapsed_ms }
            };
        }
    }
}

/// Pendulum hook hanging from `(x, y)`. Its landing surface sits at the end
/// of the rope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryHook {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub swing_angle: f32,
    pub swing_speed: f32,
    pub swing_range: f32,
    /// Horizontal movement of the hook during its last update.
    pub last_dx: f32,
}

impl FactoryHook {
    pub fn new(x: f32, y: f32, w: f32, h: f32, swing_speed: f32, swing_range: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            swing_angle: 0.0,
            swing_speed,
            swing_range,
            last_dx: 0.0,
        }
    }

    pub fn effective_position(&self) -> (f32, f32) {
        (
            self.x + self.swing_angle.sin() * HOOK_LENGTH,
            self.y + self.swing_angle.cos() * HOOK_LENGTH,
        )
    }

    pub fn rect(&self) -> Rect {
        let (x, y) = self.effective_position();
        Rect::new(x, y, self.w, self.h)
    }

    pub fn update(&mut self) {
        let (before, _) = self.effective_position();
        self.swing_angle += self.swing_speed;
        let range = self.swing_range.abs();
        if self.swing_angle.abs() > range {
            self.swing_angle = self.swing_angle.clamp(-range, range);
            self.swing_speed = -self.swing_speed;
        }
        let (after, _) = self.effective_position();
        self.last_dx = after - before;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slicer_follows_duty_cycle() {
        let mut s = RotatingSlicer::new(0.0, 0.0, 50.0, 60.0, 160.0, 80.0);
        let mut phases = Vec::new();
        for _ in 0..16 {
            s.update();
            phases.push(s.active);
        }
        // 160 ms active = 10 frames, then 80 ms inactive = 5 frames.
        assert_eq!(phases.iter().take(9).filter(|a| **a).count(), 9);
        assert!(!phases[9]);
        assert!(phases[9..14].iter().all(|a| !*a));
        assert!(phases[14]);
    }

    #[test]
    fn collapse_after_two_seconds() {
        let mut p = CollapsingPlatform::new(0.0, 0.0, 100.0, 20.0);
        p.update();
        assert_eq!(p.state, CollapseState::Stable);
        p.trigger();
        for _ in 0..124 {
            p.update();
        }
        assert!(p.is_solid());
        p.update();
        assert_eq!(p.state, CollapseState::Collapsed);
        p.trigger();
        assert_eq!(p.state, CollapseState::Collapsed);
    }

    #[test]
    fn hook_reflects_at_range() {
        let mut h = FactoryHook::new(100.0, 100.0, 60.0, 15.0, 0.1, 0.25);
        h.update();
        h.update();
        h.update();
        assert!(h.swing_angle <= 0.25 + 1e-6);
        assert!(h.swing_speed < 0.0);
        let (x, y) = h.effective_position();
        assert!((x - (100.0 + 0.25f32.sin() * HOOK_LENGTH)).abs() < 1e-4);
        assert!((y - (100.0 + 0.25f32.cos() * HOOK_LENGTH)).abs() < 1e-4);
    }

    #[test]
    fn hook_reports_frame_delta() {
        let mut h = FactoryHook::new(0.0, 0.0, 60.0, 15.0, 0.03, 0.6);
        h.update();
        assert!((h.last_dx - 0.03f32.sin() * HOOK_LENGTH).abs() < 1e-4);
    }

    #[test]
    fn conveyor_drag_has_direction() {
        let belt = ConveyorBelt {
            x: 0.0,
            y: 0.0,
            w: 200.0,
            h: 20.0,
            direction: -1.0,
            speed: 2.5,
        };
        assert_eq!(belt.drag(), -2.5);
    }
}
