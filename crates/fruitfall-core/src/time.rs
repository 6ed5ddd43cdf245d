/// Fixed simulation rate. All tuning assumes roughly 60 frames per second.
pub const TICK_RATE_HZ: f32 = 60.0;

/// Milliseconds credited to wall-clock hazard timers per frame.
pub const FRAME_MS: f32 = 16.0;
