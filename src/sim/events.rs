//! Typed publish/subscribe bus
//!
//! Every event kind carries a fixed payload shape. Subscribers are called
//! synchronously, in registration order, before `publish` returns. A
//! panicking subscriber aborts the rest of the dispatch.

use std::collections::HashMap;

use super::context::ArrowId;

/// Audio cues for the external sound player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    Score,
    Crash,
}

/// Everything the core announces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Clock radius changed
    ClockResize { radius: f32 },
    /// Clock center moved (includes knockback offset)
    ClockReposition { x: f32, y: f32 },
    /// Score went up; carries the running total
    ScorebarAdd { score: u64 },
    /// Bug started passing over an arrow
    BugOverArrow { arrow: ArrowId },
    /// Bug landed
    BugHitGround { rotation_deg: f32, speed: f32 },
    PlaySound(SoundCue),
    RoundStarted,
    RoundOver { score: u64 },
    SchemeChanged { index: usize },
}

/// Discriminant used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ClockResize,
    ClockReposition,
    ScorebarAdd,
    BugOverArrow,
    BugHitGround,
    PlaySound,
    RoundStarted,
    RoundOver,
    SchemeChanged,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::ClockResize { .. } => EventKind::ClockResize,
            GameEvent::ClockReposition { .. } => EventKind::ClockReposition,
            GameEvent::ScorebarAdd { .. } => EventKind::ScorebarAdd,
            GameEvent::BugOverArrow { .. } => EventKind::BugOverArrow,
            GameEvent::BugHitGround { .. } => EventKind::BugHitGround,
            GameEvent::PlaySound(_) => EventKind::PlaySound,
            GameEvent::RoundStarted => EventKind::RoundStarted,
            GameEvent::RoundOver { .. } => EventKind::RoundOver,
            GameEvent::SchemeChanged { .. } => EventKind::SchemeChanged,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe that exact callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&GameEvent)>;

/// Registry of subscribers per event kind
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<(SubscriptionId, Callback)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event kind
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a callback; returns false if it was not registered
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        let Some(list) = self.subscribers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(sub, _)| *sub != id);
        before != list.len()
    }

    /// Deliver an event to its subscribers in registration order
    pub fn publish(&mut self, event: &GameEvent) {
        if let Some(list) = self.subscribers.get_mut(&event.kind()) {
            for (_, callback) in list.iter_mut() {
                callback(event);
            }
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<_, _> = self
            .subscribers
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .finish()
    }
}
