//! Color schemes and stepwise color transitions
//!
//! Transitions never blend: each step moves every RGB channel a fixed amount
//! toward its target, clamping on the last step. A scheme transition runs one
//! channel stepper per role in lockstep.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Per-step channel change
pub const CHANNEL_STEP: u8 = 2;

/// An sRGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string
    pub fn from_hex(hex: &str) -> Result<Self, SimError> {
        let invalid = || SimError::InvalidColor {
            input: hex.to_string(),
        };
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Channels as floats in [0, 1]
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// The five colored roles of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Background,
    Scorebar,
    Arrows,
    Clock,
    Numbers,
}

impl ColorRole {
    pub const ALL: [ColorRole; 5] = [
        ColorRole::Background,
        ColorRole::Scorebar,
        ColorRole::Arrows,
        ColorRole::Clock,
        ColorRole::Numbers,
    ];
}

/// A complete palette snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorScheme {
    pub background: Rgb,
    pub scorebar: Rgb,
    pub arrows: Rgb,
    pub clock: Rgb,
    pub numbers: Rgb,
}

impl ColorScheme {
    /// Every role black; reserved for "lights out", never cycled to mid-round
    pub const DARK: ColorScheme = ColorScheme {
        background: Rgb::BLACK,
        scorebar: Rgb::BLACK,
        arrows: Rgb::BLACK,
        clock: Rgb::BLACK,
        numbers: Rgb::BLACK,
    };

    pub fn get(&self, role: ColorRole) -> Rgb {
        match role {
            ColorRole::Background => self.background,
            ColorRole::Scorebar => self.scorebar,
            ColorRole::Arrows => self.arrows,
            ColorRole::Clock => self.clock,
            ColorRole::Numbers => self.numbers,
        }
    }

    pub fn set(&mut self, role: ColorRole, color: Rgb) {
        match role {
            ColorRole::Background => self.background = color,
            ColorRole::Scorebar => self.scorebar = color,
            ColorRole::Arrows => self.arrows = color,
            ColorRole::Clock => self.clock = color,
            ColorRole::Numbers => self.numbers = color,
        }
    }
}

/// Move one channel a single step toward its target without overshooting
#[inline]
fn step_channel(current: u8, target: u8) -> u8 {
    if current < target {
        current.saturating_add(CHANNEL_STEP).min(target)
    } else {
        current.saturating_sub(CHANNEL_STEP).max(target)
    }
}

/// Lazy, finite stepper from one color to another.
///
/// Each `next()` yields the color after one step; the final yielded value is
/// the target itself. Once exhausted it keeps returning `None`.
#[derive(Debug, Clone)]
pub struct ColorTransition {
    current: Rgb,
    target: Rgb,
    done: bool,
}

impl ColorTransition {
    pub fn new(from: Rgb, to: Rgb) -> Self {
        Self {
            current: from,
            target: to,
            done: from == to,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn target(&self) -> Rgb {
        self.target
    }
}

impl Iterator for ColorTransition {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        if self.done {
            return None;
        }
        self.current = Rgb::new(
            step_channel(self.current.r, self.target.r),
            step_channel(self.current.g, self.target.g),
            step_channel(self.current.b, self.target.b),
        );
        self.done = self.current == self.target;
        Some(self.current)
    }
}

impl std::iter::FusedIterator for ColorTransition {}

/// Lockstep transition of all five roles of a scheme.
///
/// Roles that finish early stay frozen at their target while the rest keep
/// moving. `next()` returns `None` once every role is exhausted.
#[derive(Debug, Clone)]
pub struct SchemeTransition {
    roles: [ColorTransition; 5],
    current: ColorScheme,
    target: ColorScheme,
}

impl SchemeTransition {
    pub fn new(from: ColorScheme, to: ColorScheme) -> Self {
        let roles = ColorRole::ALL.map(|role| ColorTransition::new(from.get(role), to.get(role)));
        Self {
            roles,
            current: from,
            target: to,
        }
    }

    /// Scheme this transition settles on
    pub fn target(&self) -> ColorScheme {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.roles.iter().all(ColorTransition::is_done)
    }
}

impl Iterator for SchemeTransition {
    type Item = ColorScheme;

    fn next(&mut self) -> Option<ColorScheme> {
        let mut advanced = false;
        for (role, stepper) in ColorRole::ALL.iter().zip(self.roles.iter_mut()) {
            if let Some(color) = stepper.next() {
                self.current.set(*role, color);
                advanced = true;
            }
        }
        advanced.then_some(self.current)
    }
}

impl std::iter::FusedIterator for SchemeTransition {}
