//! Read-only views the orchestrator hands to entities each frame
//!
//! Entities never hold a reference to the game. They receive a snapshot of
//! the round state and, for the bug, of the arrows it cares about.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Hour and minute shown by the resting clock hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockTime {
    /// 0-23
    pub hour: u32,
    /// 0-59
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }
}

/// Source of the time of day
pub trait WallClock {
    fn now(&self) -> ClockTime;
}

/// Local system time via `chrono`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> ClockTime {
        let now = chrono::Local::now();
        ClockTime::new(now.hour(), now.minute())
    }
}

/// Always reports the same time (demos, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub ClockTime);

impl WallClock for FixedClock {
    fn now(&self) -> ClockTime {
        self.0
    }
}

/// Round state shared with every entity for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub game_over: bool,
    pub time: ClockTime,
}

/// Which clock hand an arrow plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrowId {
    Minute,
    Hour,
}

impl ArrowId {
    pub const ALL: [ArrowId; 2] = [ArrowId::Minute, ArrowId::Hour];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ArrowId::Minute => 0,
            ArrowId::Hour => 1,
        }
    }
}

/// What the bug may read about an arrow, taken after the arrows update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowSnapshot {
    pub id: ArrowId,
    pub rotation_deg: f32,
    pub rotation_speed: f32,
    pub idle_deg: f32,
}
