//! The clock face: size, position and landing knockback
//!
//! The radius grows toward its maximum while a round is live and shrinks
//! toward its minimum between rounds. A landing bug kicks the face away from
//! itself; a damped spring pulls it back to center.

use glam::Vec2;

use super::color::ColorScheme;
use super::context::FrameContext;
use super::events::GameEvent;
use crate::clock_direction;
use crate::consts::*;
use crate::render::Canvas;
use crate::settings::Settings;

/// Offset and velocity below this snap to rest
const KNOCKBACK_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    /// Resting center
    pub center: Vec2,
    /// Knockback displacement from `center`
    pub offset: Vec2,
    pub offset_velocity: Vec2,
    pub offset_acceleration: Vec2,
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub scale_speed: f32,
    /// Grow toward `max_radius` when true, shrink toward `min_radius` otherwise
    pub scaling_up: bool,
    /// Opacity of the hour numbers, 0 while playing, 1 at rest
    pub numbers_opacity: f32,
}

impl Clock {
    pub fn new(settings: &Settings) -> Self {
        Self {
            center: Vec2::new(settings.clock_center.0, settings.clock_center.1),
            offset: Vec2::ZERO,
            offset_velocity: Vec2::ZERO,
            offset_acceleration: Vec2::ZERO,
            radius: settings.clock_radius,
            min_radius: settings.clock_min_radius,
            max_radius: settings.clock_max_radius,
            scale_speed: settings.clock_scale_speed,
            scaling_up: false,
            numbers_opacity: 1.0,
        }
    }

    /// Current on-screen center
    pub fn position(&self) -> Vec2 {
        self.center + self.offset
    }

    pub fn update(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        self.update_scale(events);
        self.update_knockback(events);

        let target = if ctx.game_over { 1.0 } else { 0.0 };
        self.numbers_opacity = if self.numbers_opacity < target {
            (self.numbers_opacity + NUMBERS_FADE_SPEED).min(target)
        } else {
            (self.numbers_opacity - NUMBERS_FADE_SPEED).max(target)
        };
    }

    fn update_scale(&mut self, events: &mut Vec<GameEvent>) {
        let radius = if self.scaling_up {
            (self.radius + self.scale_speed).min(self.max_radius)
        } else {
            (self.radius - self.scale_speed).max(self.min_radius)
        };
        if radius != self.radius {
            self.radius = radius;
            events.push(GameEvent::ClockResize { radius });
        }
    }

    fn update_knockback(&mut self, events: &mut Vec<GameEvent>) {
        if self.offset == Vec2::ZERO && self.offset_velocity == Vec2::ZERO {
            return;
        }

        self.offset_acceleration =
            -self.offset * KNOCKBACK_STIFFNESS - self.offset_velocity * KNOCKBACK_DAMPING;
        self.offset_velocity += self.offset_acceleration;
        self.offset += self.offset_velocity;

        if self.offset.length() < KNOCKBACK_EPSILON
            && self.offset_velocity.length() < KNOCKBACK_EPSILON
        {
            self.offset = Vec2::ZERO;
            self.offset_velocity = Vec2::ZERO;
            self.offset_acceleration = Vec2::ZERO;
        }

        let position = self.position();
        events.push(GameEvent::ClockReposition {
            x: position.x,
            y: position.y,
        });
    }

    /// Kick the face away from a bug landing at `rotation_deg`
    pub fn knockback(&mut self, rotation_deg: f32, speed: f32) {
        self.offset_velocity -= clock_direction(rotation_deg) * speed.abs() * KNOCKBACK_STRENGTH;
    }

    pub fn set_scaling_up(&mut self, up: bool) {
        self.scaling_up = up;
    }

    /// Move the resting center (host window resized)
    pub fn reposition(&mut self, x: f32, y: f32, events: &mut Vec<GameEvent>) {
        self.center = Vec2::new(x, y);
        let position = self.position();
        events.push(GameEvent::ClockReposition {
            x: position.x,
            y: position.y,
        });
    }

    /// Force a radius, clamped to the allowed range
    pub fn resize(&mut self, radius: f32, events: &mut Vec<GameEvent>) {
        self.radius = radius.clamp(self.min_radius, self.max_radius);
        events.push(GameEvent::ClockResize {
            radius: self.radius,
        });
    }

    pub fn render(&self, canvas: &mut dyn Canvas, scheme: &ColorScheme) {
        let position = self.position();
        canvas.fill_circle(position, self.radius, scheme.clock);

        if self.numbers_opacity <= 0.0 {
            return;
        }
        let size = self.radius * 0.12;
        for hour in 1..=12u32 {
            let at = position + clock_direction(hour as f32 * 30.0) * self.radius * 0.85;
            canvas.draw_text(
                &hour.to_string(),
                at,
                size,
                scheme.numbers,
                self.numbers_opacity,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::context::ClockTime;

    fn ctx(game_over: bool) -> FrameContext {
        FrameContext {
            game_over,
            time: ClockTime::default(),
        }
    }

    #[test]
    fn test_scale_stays_in_bounds() {
        let mut clock = Clock::new(&Settings::default());
        let mut events = Vec::new();

        clock.set_scaling_up(false);
        for _ in 0..500 {
            clock.update(&ctx(true), &mut events);
            assert!(clock.radius >= clock.min_radius);
        }
        assert_eq!(clock.radius, clock.min_radius);

        let resizes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ClockResize { .. }))
            .count();
        assert_eq!(
            resizes,
            ((CLOCK_MAX_RADIUS - CLOCK_MIN_RADIUS) / CLOCK_SCALE_SPEED) as usize
        );

        events.clear();
        clock.set_scaling_up(true);
        for _ in 0..500 {
            clock.update(&ctx(false), &mut events);
            assert!(clock.radius <= clock.max_radius);
        }
        assert_eq!(clock.radius, clock.max_radius);
        assert!(matches!(
            events.last(),
            Some(GameEvent::ClockResize { radius }) if *radius == CLOCK_MAX_RADIUS
        ));
    }

    #[test]
    fn test_numbers_fade() {
        let mut clock = Clock::new(&Settings::default());
        let mut events = Vec::new();
        clock.update(&ctx(false), &mut events);
        assert!(clock.numbers_opacity < 1.0);
        for _ in 0..100 {
            clock.update(&ctx(false), &mut events);
        }
        assert_eq!(clock.numbers_opacity, 0.0);
        for _ in 0..100 {
            clock.update(&ctx(true), &mut events);
        }
        assert_eq!(clock.numbers_opacity, 1.0);
    }

    #[test]
    fn test_knockback_pushes_away_then_settles() {
        let mut clock = Clock::new(&Settings::default());
        let mut events = Vec::new();

        // Bug landing at twelve o'clock pushes the face down (+y)
        clock.knockback(0.0, 5.0);
        clock.update(&ctx(false), &mut events);
        assert!(clock.offset.y > 0.0);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ClockReposition { .. })));

        for _ in 0..600 {
            clock.update(&ctx(false), &mut events);
        }
        assert_eq!(clock.offset, Vec2::ZERO);
        assert_eq!(clock.position(), clock.center);

        events.clear();
        clock.update(&ctx(false), &mut events);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::ClockReposition { .. })));
    }

    #[test]
    fn test_resize_and_reposition_publish() {
        let mut clock = Clock::new(&Settings::default());
        let mut events = Vec::new();
        clock.resize(1000.0, &mut events);
        clock.reposition(10.0, 20.0, &mut events);
        assert_eq!(
            events,
            vec![
                GameEvent::ClockResize {
                    radius: CLOCK_MAX_RADIUS
                },
                GameEvent::ClockReposition { x: 10.0, y: 20.0 },
            ]
        );
    }
}
