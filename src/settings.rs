//! Game tuning and palette
//!
//! Loaded from JSON by the host (missing fields fall back to defaults) and
//! validated before any entity is built.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::color::{ColorScheme, Rgb};

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the direction-change RNG
    pub seed: u64,

    // === Clock ===
    pub clock_radius: f32,
    pub clock_min_radius: f32,
    pub clock_max_radius: f32,
    /// Radius change per frame while growing or shrinking
    pub clock_scale_speed: f32,
    /// Initial clock center
    pub clock_center: (f32, f32),

    // === Arrows ===
    pub minute_arrow_speed: f32,
    pub hour_arrow_speed: f32,
    /// Added to both arrows at every speed milestone
    pub arrow_speed_ramp: f32,

    // === Bug ===
    pub bug_speed: f32,
    pub bug_jump_speed: f32,
    /// Vertical acceleration per frame (negative)
    pub bug_gravity: f32,

    // === Scoring ===
    /// Points between palette changes
    pub scheme_every: u64,
    /// Points between arrow speed-ups
    pub speed_ramp_every: u64,

    /// Color schemes; index 0 is the all-dark scheme, never used mid-round
    pub palette: Vec<ColorScheme>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            clock_radius: CLOCK_RADIUS,
            clock_min_radius: CLOCK_MIN_RADIUS,
            clock_max_radius: CLOCK_MAX_RADIUS,
            clock_scale_speed: CLOCK_SCALE_SPEED,
            clock_center: (320.0, 320.0),

            minute_arrow_speed: MINUTE_ARROW_SPEED,
            hour_arrow_speed: HOUR_ARROW_SPEED,
            arrow_speed_ramp: ARROW_SPEED_RAMP,

            bug_speed: BUG_SPEED,
            bug_jump_speed: BUG_JUMP_SPEED,
            bug_gravity: BUG_GRAVITY,

            scheme_every: SCHEME_EVERY,
            speed_ramp_every: SPEED_RAMP_EVERY,

            palette: default_palette(),
        }
    }
}

impl Settings {
    /// Parse from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every precondition the entities rely on
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |field: &'static str, reason: &str| {
            Err(SimError::InvalidSettings {
                field,
                reason: reason.to_string(),
            })
        };

        let finite = [
            ("clock_radius", self.clock_radius),
            ("clock_min_radius", self.clock_min_radius),
            ("clock_max_radius", self.clock_max_radius),
            ("clock_scale_speed", self.clock_scale_speed),
            ("minute_arrow_speed", self.minute_arrow_speed),
            ("hour_arrow_speed", self.hour_arrow_speed),
            ("arrow_speed_ramp", self.arrow_speed_ramp),
            ("bug_speed", self.bug_speed),
            ("bug_jump_speed", self.bug_jump_speed),
            ("bug_gravity", self.bug_gravity),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(*field, "must be a finite number");
        }

        if self.clock_min_radius <= 0.0 {
            return invalid("clock_min_radius", "must be positive");
        }
        if self.clock_min_radius > self.clock_max_radius {
            return invalid("clock_max_radius", "must not be below clock_min_radius");
        }
        if !(self.clock_min_radius..=self.clock_max_radius).contains(&self.clock_radius) {
            return invalid("clock_radius", "must lie within [min, max]");
        }
        if self.clock_scale_speed < 0.0 {
            return invalid("clock_scale_speed", "must not be negative");
        }
        if self.minute_arrow_speed < 0.0 || self.hour_arrow_speed < 0.0 || self.bug_speed < 0.0 {
            return invalid("speed", "rotation speeds must not be negative");
        }
        if self.bug_jump_speed <= 0.0 {
            return invalid("bug_jump_speed", "must be positive");
        }
        if self.bug_gravity >= 0.0 {
            return invalid("bug_gravity", "must be negative");
        }
        if self.scheme_every == 0 || self.speed_ramp_every == 0 {
            return invalid("scheme_every", "milestones must be at least 1");
        }
        if self.palette.len() < 2 {
            return invalid("palette", "needs the dark scheme plus at least one color scheme");
        }
        Ok(())
    }
}

/// Built-in palette: the dark scheme followed by the playable ones
pub fn default_palette() -> Vec<ColorScheme> {
    let scheme = |background, scorebar, arrows, clock, numbers| ColorScheme {
        background,
        scorebar,
        arrows,
        clock,
        numbers,
    };
    vec![
        ColorScheme::DARK,
        scheme(
            Rgb::new(0xf4, 0xf1, 0xde),
            Rgb::new(0xe0, 0x7a, 0x5f),
            Rgb::new(0x3d, 0x40, 0x5b),
            Rgb::new(0x81, 0xb2, 0x9a),
            Rgb::new(0xf2, 0xcc, 0x8f),
        ),
        scheme(
            Rgb::new(0x0b, 0x13, 0x2b),
            Rgb::new(0x5b, 0xc0, 0xbe),
            Rgb::new(0x02, 0x60, 0xe8),
            Rgb::new(0x1c, 0x25, 0x41),
            Rgb::new(0x6f, 0xff, 0xe9),
        ),
        scheme(
            Rgb::new(0x2b, 0x2d, 0x42),
            Rgb::new(0xef, 0x23, 0x3c),
            Rgb::new(0xed, 0xf2, 0xf4),
            Rgb::new(0x8d, 0x99, 0xae),
            Rgb::new(0xd9, 0x04, 0x29),
        ),
        scheme(
            Rgb::new(0xfe, 0xfa, 0xe0),
            Rgb::new(0xbc, 0x6c, 0x25),
            Rgb::new(0x28, 0x36, 0x18),
            Rgb::new(0x60, 0x6c, 0x38),
            Rgb::new(0xdd, 0xa1, 0x5e),
        ),
        scheme(
            Rgb::new(0x22, 0x22, 0x3b),
            Rgb::new(0x9a, 0x8c, 0x98),
            Rgb::new(0xf2, 0xe9, 0xe4),
            Rgb::new(0x4a, 0x4e, 0x69),
            Rgb::new(0xc9, 0xad, 0xa7),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.palette[0], ColorScheme::DARK);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "bug_gravity": -0.5 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.bug_gravity, -0.5);
        assert_eq!(settings.clock_radius, CLOCK_RADIUS);
        assert_eq!(settings.palette.len(), default_palette().len());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert!(json.contains("#0260e8"));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Settings::from_json(r#"{ "bug_gravity": 0.3 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidSettings {
                field: "bug_gravity",
                ..
            }
        ));

        let settings = Settings {
            clock_min_radius: 300.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            palette: vec![ColorScheme::DARK],
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidSettings { field: "palette", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(SimError::Config { .. })
        ));
        assert!(Settings::from_json(r#"{ "palette": [{ "background": "red" }] }"#).is_err());
    }
}
