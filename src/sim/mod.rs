//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - One `update` per frame, fixed entity order
//! - Seeded RNG only; wall-clock time comes in through `WallClock`
//! - Entities talk through events, never through references to each other
//! - No rendering backend or platform dependencies

pub mod angle;
pub mod arrow;
pub mod bug;
pub mod clock;
pub mod collision;
pub mod color;
pub mod context;
pub mod events;
pub mod game;

pub use angle::{AngleState, Spin};
pub use arrow::Arrow;
pub use bug::{Bug, BugAnimation, BugState};
pub use clock::Clock;
pub use collision::{Polygon, sat_collision, sat_collision_points};
pub use color::{ColorRole, ColorScheme, ColorTransition, Rgb, SchemeTransition};
pub use context::{ArrowId, ArrowSnapshot, ClockTime, FixedClock, FrameContext, SystemClock, WallClock};
pub use events::{EventBus, EventKind, GameEvent, SoundCue, SubscriptionId};
pub use game::{Game, GamePhase};
