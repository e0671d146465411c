//! Clock Hop - dodge the hands of a spinning clock
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, color transitions, game state)
//! - `render`: Drawing surface abstraction the simulation renders through
//! - `highscores`: Best-score tracking over an opaque key/value store
//! - `settings`: Data-driven tuning and palette

pub mod error;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use highscores::{HighScores, MemoryStore, ScoreStore};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frames per second the outer loop drives `update` at
    pub const FRAME_RATE: u32 = 60;

    /// Clock dimensions (pixels)
    pub const CLOCK_RADIUS: f32 = 200.0;
    pub const CLOCK_MIN_RADIUS: f32 = 160.0;
    pub const CLOCK_MAX_RADIUS: f32 = 200.0;
    /// Linear radius change per frame while scaling
    pub const CLOCK_SCALE_SPEED: f32 = 1.0;
    /// Numbers opacity change per frame
    pub const NUMBERS_FADE_SPEED: f32 = 0.05;

    /// Knockback spring constants
    pub const KNOCKBACK_STRENGTH: f32 = 0.6;
    pub const KNOCKBACK_STIFFNESS: f32 = 0.12;
    pub const KNOCKBACK_DAMPING: f32 = 0.25;

    /// Angular step while easing back to rest (degrees/frame)
    pub const CONVERGE_STEP_DEG: f32 = 2.0;

    /// Arrow base speeds (degrees/frame)
    pub const MINUTE_ARROW_SPEED: f32 = 1.2;
    pub const HOUR_ARROW_SPEED: f32 = 0.8;
    /// Speed added to both arrows every 10 points
    pub const ARROW_SPEED_RAMP: f32 = 0.1;

    /// Arrow proportions relative to clock radius
    pub const MINUTE_ARROW_LENGTH: f32 = 0.9;
    pub const HOUR_ARROW_LENGTH: f32 = 0.78;
    pub const ARROW_WIDTH: f32 = 0.09;

    /// Bug defaults
    pub const BUG_SPEED: f32 = 1.5;
    pub const BUG_JUMP_SPEED: f32 = 7.5;
    pub const BUG_GRAVITY: f32 = -0.35;
    /// Resting distance of the bug from the clock center, relative to radius
    pub const BUG_GROUND_RATIO: f32 = 0.7;
    /// Bug body half-size relative to radius
    pub const BUG_SIZE_RATIO: f32 = 0.06;
    /// Jumps available before landing
    pub const MAX_JUMPS: u8 = 2;

    /// Score milestones
    pub const SCHEME_EVERY: u64 = 5;
    pub const SPEED_RAMP_EVERY: u64 = 10;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_deg(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180]
#[inline]
pub fn shortest_delta_deg(from: f32, to: f32) -> f32 {
    let delta = normalize_deg(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Rotate a point about the origin
#[inline]
pub fn rotate_point(point: Vec2, radians: f32) -> Vec2 {
    if radians == 0.0 {
        return point;
    }
    let (sin, cos) = radians.sin_cos();
    Vec2::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}

/// Unit vector pointing away from the clock center at a clock angle
/// (0° = twelve o'clock, clockwise in screen space)
#[inline]
pub fn clock_direction(deg: f32) -> Vec2 {
    rotate_point(Vec2::new(0.0, -1.0), deg.to_radians())
}
