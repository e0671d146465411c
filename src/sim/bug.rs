//! The bug: runs around the rim, double-jumps over the hands
//!
//! The bug's angle spins like a hand while the round is live. Its radial
//! distance from the clock center (`anchor_y`) is the jump height. Passing
//! over a hand while airborne scores once per pass.

use glam::Vec2;

use super::angle::{AngleState, Spin};
use super::color::ColorScheme;
use super::context::{ArrowId, ArrowSnapshot, FrameContext};
use super::events::{GameEvent, SoundCue};
use crate::consts::*;
use crate::render::Canvas;
use crate::settings::Settings;
use crate::{normalize_deg, rotate_point, shortest_delta_deg};

/// Visual state, independent of the airborne count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BugState {
    #[default]
    Idle,
    Jumping,
}

/// Sprite set picked from state and facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugAnimation {
    IdleLeft,
    IdleRight,
    JumpLeft,
    JumpRight,
}

impl BugAnimation {
    pub fn name(self) -> &'static str {
        match self {
            BugAnimation::IdleLeft => "bug_idle_left",
            BugAnimation::IdleRight => "bug_idle_right",
            BugAnimation::JumpLeft => "bug_jump_left",
            BugAnimation::JumpRight => "bug_jump_right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bug {
    pub angle: AngleState,
    /// Jumps used since last touching the ground (0, 1 or 2)
    pub jumps: u8,
    /// Radial velocity, positive away from the center
    pub jump_speed: f32,
    pub launch_speed: f32,
    /// Radial acceleration per frame (negative)
    pub gravity: f32,
    /// Distance from the clock center
    pub anchor_y: f32,
    /// Distance from the clock center when standing
    pub grounded_anchor_y: f32,
    /// Half-size of the body
    pub size: f32,
    pub state: BugState,
    /// Overlap flag from the previous frame
    pub were_over_arrow: bool,
    /// Clock center in world space
    pub center: Vec2,
}

impl Bug {
    pub fn new(settings: &Settings) -> Self {
        let mut bug = Self {
            angle: AngleState::new(settings.bug_speed, Spin::Clockwise),
            jumps: 0,
            jump_speed: 0.0,
            launch_speed: settings.bug_jump_speed,
            gravity: settings.bug_gravity,
            anchor_y: 0.0,
            grounded_anchor_y: 0.0,
            size: 0.0,
            state: BugState::Idle,
            were_over_arrow: false,
            center: Vec2::new(settings.clock_center.0, settings.clock_center.1),
        };
        bug.resize(settings.clock_radius);
        bug
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.jumps > 0
    }

    /// Launch, or spend the second jump mid-air. Returns false once both are used.
    pub fn jump(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.jumps >= MAX_JUMPS {
            return false;
        }
        self.jump_speed = self.launch_speed;
        self.jumps += 1;
        self.state = BugState::Jumping;
        events.push(GameEvent::PlaySound(SoundCue::Jump));
        true
    }

    pub fn switch_direction(&mut self) {
        self.angle.flip_direction();
    }

    /// Round lost: show the idle sprite, leave position to the convergence
    pub fn die(&mut self) {
        self.state = BugState::Idle;
    }

    /// Clear per-round flags before a new round
    pub fn reset(&mut self) {
        self.state = if self.is_airborne() {
            BugState::Jumping
        } else {
            BugState::Idle
        };
        self.were_over_arrow = false;
    }

    pub fn animation(&self) -> BugAnimation {
        match (self.state, self.angle.direction) {
            (BugState::Idle, Spin::CounterClockwise) => BugAnimation::IdleLeft,
            (BugState::Idle, Spin::Clockwise) => BugAnimation::IdleRight,
            (BugState::Jumping, Spin::CounterClockwise) => BugAnimation::JumpLeft,
            (BugState::Jumping, Spin::Clockwise) => BugAnimation::JumpRight,
        }
    }

    /// Resting angle between the two hands.
    ///
    /// Candidates are the midpoint of the hands' rest angles and its opposite;
    /// the one nearer the minute hand's rest angle sits inside the smaller gap.
    pub fn rest_angle(minute_idle: f32, hour_idle: f32) -> f32 {
        let mid = normalize_deg((normalize_deg(minute_idle) + normalize_deg(hour_idle)) / 2.0);
        let opposite = normalize_deg(mid + 180.0);
        if shortest_delta_deg(opposite, minute_idle).abs() < shortest_delta_deg(mid, minute_idle).abs() {
            opposite
        } else {
            mid
        }
    }

    pub fn update(
        &mut self,
        ctx: &FrameContext,
        arrows: &[ArrowSnapshot],
        events: &mut Vec<GameEvent>,
    ) {
        if ctx.game_over {
            let minute = arrows.iter().find(|a| a.id == ArrowId::Minute);
            let hour = arrows.iter().find(|a| a.id == ArrowId::Hour);
            if let (Some(minute), Some(hour)) = (minute, hour) {
                self.angle.idle_deg = Self::rest_angle(minute.idle_deg, hour.idle_deg);
            }
            self.angle.converge(Spin::Clockwise);
        } else {
            self.angle.spin();
        }

        self.update_jump(ctx, events);

        if self.is_airborne() && !ctx.game_over {
            self.detect_overlap(arrows, events);
        } else {
            self.were_over_arrow = false;
        }
    }

    fn update_jump(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        if !self.is_airborne() {
            return;
        }
        self.jump_speed += self.gravity;
        self.anchor_y += self.jump_speed;

        if self.anchor_y <= self.grounded_anchor_y {
            let landing_speed = self.jump_speed.abs();
            self.anchor_y = self.grounded_anchor_y;
            self.jump_speed = 0.0;
            self.jumps = 0;
            if !ctx.game_over {
                self.state = BugState::Idle;
            }
            events.push(GameEvent::BugHitGround {
                rotation_deg: self.angle.rotation_deg,
                speed: landing_speed,
            });
        }
    }

    /// Fire `BugOverArrow` on the frame the bug starts passing over a hand
    fn detect_overlap(&mut self, arrows: &[ArrowSnapshot], events: &mut Vec<GameEvent>) {
        let over = arrows.iter().find(|arrow| {
            let window = self.angle.rotation_speed + arrow.rotation_speed;
            shortest_delta_deg(self.angle.rotation_deg, arrow.rotation_deg).abs() <= window
        });

        if let Some(arrow) = over {
            if !self.were_over_arrow {
                log::debug!("Bug over {:?} at {:.1}°", arrow.id, self.angle.rotation_deg);
                events.push(GameEvent::BugOverArrow { arrow: arrow.id });
            }
        }
        self.were_over_arrow = over.is_some();
    }

    pub fn resize(&mut self, radius: f32) {
        self.grounded_anchor_y = radius * BUG_GROUND_RATIO;
        self.size = radius * BUG_SIZE_RATIO;
        if !self.is_airborne() {
            self.anchor_y = self.grounded_anchor_y;
        }
    }

    pub fn reposition(&mut self, x: f32, y: f32) {
        self.center = Vec2::new(x, y);
    }

    /// Body square around the origin
    pub fn local_path(&self) -> Vec<Vec2> {
        let s = self.size;
        vec![
            Vec2::new(-s, -s),
            Vec2::new(s, -s),
            Vec2::new(s, s),
            Vec2::new(-s, s),
        ]
    }

    /// World-space body: lifted to `anchor_y`, rotated, centered on the clock
    pub fn transformed_path(&self) -> Vec<Vec2> {
        let radians = self.angle.rotation_radians();
        let anchor = Vec2::new(0.0, -self.anchor_y);
        self.local_path()
            .into_iter()
            .map(|p| rotate_point(p + anchor, radians) + self.center)
            .collect()
    }

    pub fn position(&self) -> Vec2 {
        rotate_point(Vec2::new(0.0, -self.anchor_y), self.angle.rotation_radians()) + self.center
    }

    pub fn render(&self, canvas: &mut dyn Canvas, _scheme: &ColorScheme) {
        canvas.draw_sprite(
            self.animation().name(),
            self.position(),
            self.angle.rotation_radians(),
            self.size * 2.0,
        );
    }
}
