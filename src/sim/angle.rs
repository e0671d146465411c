//! Angular state shared by the arrows and the bug
//!
//! While a round is live the angle spins freely; once it ends the angle eases
//! back to a resting target by a fixed step along the shorter arc.

use serde::{Deserialize, Serialize};

use crate::consts::CONVERGE_STEP_DEG;
use crate::{normalize_deg, shortest_delta_deg};

/// Rotation sense (+1 clockwise, -1 counter-clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Spin {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Spin {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Spin::Clockwise => 1.0,
            Spin::CounterClockwise => -1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Spin::Clockwise => Spin::CounterClockwise,
            Spin::CounterClockwise => Spin::Clockwise,
        }
    }
}

/// Angle, speed and resting target of a rotating entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleState {
    /// Current angle in degrees, kept in [0, 360)
    pub rotation_deg: f32,
    /// Degrees per frame (non-negative)
    pub rotation_speed: f32,
    pub direction: Spin,
    /// Resting target in degrees
    pub idle_deg: f32,
}

impl AngleState {
    pub fn new(rotation_speed: f32, direction: Spin) -> Self {
        Self {
            rotation_deg: 0.0,
            rotation_speed: rotation_speed.max(0.0),
            direction,
            idle_deg: 0.0,
        }
    }

    /// Advance one frame of free spinning
    pub fn spin(&mut self) {
        self.rotation_deg = normalize_deg(
            self.rotation_deg + self.rotation_speed * self.direction.sign(),
        );
    }

    /// Step one frame toward `idle_deg`.
    ///
    /// `tie_break` decides the way round when the target is exactly opposite.
    /// Lands on the target exactly once within one step.
    pub fn converge(&mut self, tie_break: Spin) {
        self.rotation_deg = normalize_deg(self.rotation_deg);
        self.idle_deg = normalize_deg(self.idle_deg);

        let mut delta = shortest_delta_deg(self.rotation_deg, self.idle_deg);
        if delta == 180.0 {
            delta = 180.0 * tie_break.sign();
        }

        if delta.abs() <= CONVERGE_STEP_DEG {
            self.rotation_deg = self.idle_deg;
        } else {
            self.rotation_deg =
                normalize_deg(self.rotation_deg + CONVERGE_STEP_DEG * delta.signum());
        }
    }

    /// Unsigned shortest distance to the resting target
    pub fn distance_to_idle(&self) -> f32 {
        shortest_delta_deg(self.rotation_deg, self.idle_deg).abs()
    }

    /// At rest exactly on the target
    pub fn is_idle(&self) -> bool {
        normalize_deg(self.rotation_deg) == normalize_deg(self.idle_deg)
    }

    pub fn flip_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    #[inline]
    pub fn rotation_radians(&self) -> f32 {
        self.rotation_deg.to_radians()
    }
}
