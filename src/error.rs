//! Simulation error types.
//!
//! Every failure in the core is a precondition violation surfaced at the
//! boundary call: bad settings at construction, degenerate collision
//! geometry, or a malformed palette color. Nothing here is retried.

use std::fmt;

/// Top-level error enum for the clock simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Settings rejected before any entity was built.
    InvalidSettings {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of what was expected.
        reason: String,
    },

    /// A polygon handed to the collision detector cannot produce edge normals.
    DegenerateGeometry {
        /// Number of points in the rejected polygon.
        points: usize,
        /// What made it unusable.
        reason: &'static str,
    },

    /// A palette entry is not a `#rrggbb` hex color.
    InvalidColor {
        /// The text that failed to parse.
        input: String,
    },

    /// Settings JSON could not be parsed or produced.
    Config {
        /// Message from the serializer.
        message: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidSettings { field, reason } => {
                write!(f, "invalid setting '{}': {}", field, reason)
            }
            SimError::DegenerateGeometry { points, reason } => {
                write!(f, "degenerate polygon with {} points: {}", points, reason)
            }
            SimError::InvalidColor { input } => {
                write!(f, "invalid color '{}', expected #rrggbb", input)
            }
            SimError::Config { message } => write!(f, "settings error: {}", message),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config {
            message: err.to_string(),
        }
    }
}
