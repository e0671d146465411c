//! Clock hands that sweep the face
//!
//! Both hands share one behavior; `ArrowId` selects the base speed, the way
//! they settle and the time-of-day formula for their resting angle.

use glam::Vec2;
use rand::Rng;

use super::angle::{AngleState, Spin};
use super::color::ColorScheme;
use super::context::{ArrowId, ArrowSnapshot, ClockTime, FrameContext};
use crate::consts::*;
use crate::render::Canvas;
use crate::rotate_point;
use crate::settings::Settings;

impl ArrowId {
    /// Resting angle for the time of day, like a real clock hand
    pub fn idle_deg_at(self, time: ClockTime) -> f32 {
        match self {
            ArrowId::Minute => time.minute as f32 * 6.0,
            ArrowId::Hour => (time.hour % 12) as f32 * 30.0 + time.minute as f32 * 0.5,
        }
    }

    /// Spin sense at the start of every round
    fn start_direction(self) -> Spin {
        match self {
            ArrowId::Minute => Spin::Clockwise,
            ArrowId::Hour => Spin::CounterClockwise,
        }
    }

    /// Way round to settle when the rest angle is exactly opposite
    fn idle_direction(self) -> Spin {
        match self {
            ArrowId::Minute => Spin::Clockwise,
            ArrowId::Hour => Spin::CounterClockwise,
        }
    }

    fn length_ratio(self) -> f32 {
        match self {
            ArrowId::Minute => MINUTE_ARROW_LENGTH,
            ArrowId::Hour => HOUR_ARROW_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub id: ArrowId,
    pub angle: AngleState,
    /// Speed restored at the start of each round
    pub base_speed: f32,
    pub idle_direction: Spin,
    /// Half-width of the arrow head
    pub width: f32,
    /// Pivot to tip
    pub height: f32,
    /// Pivot offset from the clock center in local space
    pub anchor: Vec2,
    /// Clock center in world space
    pub center: Vec2,
}

impl Arrow {
    pub fn new(id: ArrowId, settings: &Settings, time: ClockTime) -> Self {
        let base_speed = match id {
            ArrowId::Minute => settings.minute_arrow_speed,
            ArrowId::Hour => settings.hour_arrow_speed,
        };
        let mut angle = AngleState::new(base_speed, id.start_direction());
        angle.idle_deg = id.idle_deg_at(time);
        angle.rotation_deg = angle.idle_deg;

        let mut arrow = Self {
            id,
            angle,
            base_speed,
            idle_direction: id.idle_direction(),
            width: 0.0,
            height: 0.0,
            anchor: Vec2::ZERO,
            center: Vec2::new(settings.clock_center.0, settings.clock_center.1),
        };
        arrow.resize(settings.clock_radius);
        arrow
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        if ctx.game_over {
            self.angle.idle_deg = self.id.idle_deg_at(ctx.time);
            self.angle.converge(self.idle_direction);
        } else {
            self.angle.spin();
        }
    }

    /// Coin flip: keep spinning the same way or reverse
    pub fn random_direction_change<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if rng.random_bool(0.5) {
            self.angle.flip_direction();
        }
    }

    pub fn add_speed(&mut self, delta: f32) {
        self.angle.rotation_speed = (self.angle.rotation_speed + delta).max(0.0);
    }

    /// Restore round-start speed and direction
    pub fn reset(&mut self) {
        self.angle.rotation_speed = self.base_speed;
        self.angle.direction = self.id.start_direction();
    }

    pub fn resize(&mut self, radius: f32) {
        self.height = radius * self.id.length_ratio();
        self.width = radius * ARROW_WIDTH;
    }

    pub fn reposition(&mut self, x: f32, y: f32) {
        self.center = Vec2::new(x, y);
    }

    pub fn snapshot(&self) -> ArrowSnapshot {
        ArrowSnapshot {
            id: self.id,
            rotation_deg: self.angle.rotation_deg,
            rotation_speed: self.angle.rotation_speed,
            idle_deg: self.angle.idle_deg,
        }
    }

    /// Outline pointing at twelve o'clock, pivot at the origin.
    ///
    /// The first three points are the head triangle.
    pub fn local_path(&self) -> Vec<Vec2> {
        let w = self.width;
        let h = self.height;
        let neck = -h + w * 2.0;
        let shaft = w * 0.35;
        vec![
            Vec2::new(-w, neck),
            Vec2::new(0.0, -h),
            Vec2::new(w, neck),
            Vec2::new(shaft, neck),
            Vec2::new(shaft, 0.0),
            Vec2::new(-shaft, 0.0),
            Vec2::new(-shaft, neck),
        ]
    }

    /// World-space outline: anchor-shifted, rotated, then centered on the clock
    pub fn transformed_path(&self) -> Vec<Vec2> {
        let radians = self.angle.rotation_radians();
        self.local_path()
            .into_iter()
            .map(|p| rotate_point(p + self.anchor, radians) + self.center)
            .collect()
    }

    /// Head triangle only; the shaft never collides
    pub fn collision_path(&self) -> Vec<Vec2> {
        let mut path = self.transformed_path();
        path.truncate(3);
        path
    }

    pub fn render(&self, canvas: &mut dyn Canvas, scheme: &ColorScheme) {
        canvas.fill_polygon(&self.transformed_path(), scheme.arrows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing() -> FrameContext {
        FrameContext {
            game_over: false,
            time: ClockTime::new(3, 0),
        }
    }

    #[test]
    fn test_idle_angles_follow_clock_face() {
        let t = ClockTime::new(15, 30);
        assert_eq!(ArrowId::Minute.idle_deg_at(t), 180.0);
        assert_eq!(ArrowId::Hour.idle_deg_at(t), 105.0);
        assert_eq!(ArrowId::Hour.idle_deg_at(ClockTime::new(0, 0)), 0.0);
        assert_eq!(ArrowId::Hour.idle_deg_at(ClockTime::new(23, 59)), 359.5);
    }

    #[test]
    fn test_starts_at_rest() {
        let arrow = Arrow::new(ArrowId::Hour, &Settings::default(), ClockTime::new(3, 0));
        assert_eq!(arrow.angle.rotation_deg, 90.0);
        assert!(arrow.angle.is_idle());
    }

    #[test]
    fn test_spins_while_playing() {
        let mut arrow = Arrow::new(ArrowId::Minute, &Settings::default(), ClockTime::new(3, 0));
        arrow.update(&playing());
        assert!((arrow.angle.rotation_deg - MINUTE_ARROW_SPEED).abs() < 1e-5);

        let mut hour = Arrow::new(ArrowId::Hour, &Settings::default(), ClockTime::new(3, 0));
        hour.update(&playing());
        assert!((hour.angle.rotation_deg - (90.0 - HOUR_ARROW_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_converges_to_live_time() {
        let mut arrow = Arrow::new(ArrowId::Minute, &Settings::default(), ClockTime::new(3, 0));
        arrow.angle.rotation_deg = 40.0;
        let ctx = FrameContext {
            game_over: true,
            time: ClockTime::new(3, 5),
        };
        arrow.update(&ctx);
        assert_eq!(arrow.angle.idle_deg, 30.0);
        assert_eq!(arrow.angle.rotation_deg, 38.0);
        for _ in 0..10 {
            arrow.update(&ctx);
        }
        assert!(arrow.angle.is_idle());
        assert_eq!(arrow.angle.rotation_deg, 30.0);
    }

    #[test]
    fn test_random_direction_change_flips_sometimes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut arrow = Arrow::new(ArrowId::Minute, &Settings::default(), ClockTime::default());
        let mut flips = 0;
        for _ in 0..200 {
            let before = arrow.angle.direction;
            arrow.random_direction_change(&mut rng);
            if arrow.angle.direction != before {
                flips += 1;
            }
        }
        assert!(flips > 50 && flips < 150, "flips = {flips}");
    }

    #[test]
    fn test_speed_ramp_and_reset() {
        let mut arrow = Arrow::new(ArrowId::Hour, &Settings::default(), ClockTime::default());
        arrow.add_speed(ARROW_SPEED_RAMP);
        assert!((arrow.angle.rotation_speed - (HOUR_ARROW_SPEED + ARROW_SPEED_RAMP)).abs() < 1e-6);
        arrow.angle.flip_direction();
        arrow.reset();
        assert_eq!(arrow.angle.rotation_speed, HOUR_ARROW_SPEED);
        assert_eq!(arrow.angle.direction, Spin::CounterClockwise);
    }

    #[test]
    fn test_collision_path_is_head_triangle() {
        let mut arrow = Arrow::new(ArrowId::Minute, &Settings::default(), ClockTime::new(0, 15));
        arrow.reposition(100.0, 100.0);
        let head = arrow.collision_path();
        assert_eq!(head.len(), 3);
        // Pointing at three o'clock, tip sits one arrow length right of center
        let tip = head[1];
        assert!((tip.x - (100.0 + arrow.height)).abs() < 1e-3);
        assert!((tip.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_scales_dimensions() {
        let mut arrow = Arrow::new(ArrowId::Minute, &Settings::default(), ClockTime::default());
        arrow.resize(100.0);
        assert!((arrow.height - 100.0 * MINUTE_ARROW_LENGTH).abs() < 1e-4);
        assert!((arrow.width - 100.0 * ARROW_WIDTH).abs() < 1e-4);
    }
}
