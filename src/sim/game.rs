//! Round state machine and per-frame orchestration
//!
//! Frame order: color transition, clock, arrows, bug, collision check.
//! Entities report what happened through events; the game reacts to them
//! (resizes, scoring, knockback) and then forwards each one to the bus.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arrow::Arrow;
use super::bug::Bug;
use super::clock::Clock;
use super::collision::{Polygon, sat_collision};
use super::color::{ColorScheme, SchemeTransition};
use super::context::{ArrowId, ArrowSnapshot, FrameContext, WallClock};
use super::events::{EventBus, GameEvent, SoundCue};
use crate::error::SimError;
use crate::highscores::{HighScores, MemoryStore, ScoreStore};
use crate::render::Canvas;
use crate::settings::Settings;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Hands spinning, bug running
    Playing,
    /// Attract mode: everything eases back to the time of day
    GameOver,
}

pub struct Game {
    settings: Settings,
    pub phase: GamePhase,
    pub score: u64,
    pub clock: Clock,
    /// Minute hand, then hour hand
    pub arrows: [Arrow; 2],
    pub bug: Bug,
    scheme_index: usize,
    active_scheme: ColorScheme,
    transition: Option<SchemeTransition>,
    rng: Pcg32,
    wall_clock: Box<dyn WallClock>,
    bus: EventBus,
    pending: Vec<GameEvent>,
    high_scores: HighScores,
    store: Box<dyn ScoreStore>,
    /// Frames simulated so far
    pub frame: u64,
}

impl Game {
    /// Build every entity once; fails if the settings are unusable
    pub fn new(settings: Settings, wall_clock: Box<dyn WallClock>) -> Result<Self, SimError> {
        settings.validate()?;

        let time = wall_clock.now();
        let arrows = ArrowId::ALL.map(|id| Arrow::new(id, &settings, time));
        let mut bug = Bug::new(&settings);
        bug.angle.idle_deg = Bug::rest_angle(arrows[0].angle.idle_deg, arrows[1].angle.idle_deg);
        bug.angle.rotation_deg = bug.angle.idle_deg;

        let store: Box<dyn ScoreStore> = Box::new(MemoryStore::new());
        let high_scores = HighScores::load(store.as_ref());

        log::info!(
            "Clock hop ready at {:02}:{:02}, {} color schemes",
            time.hour,
            time.minute,
            settings.palette.len()
        );

        Ok(Self {
            phase: GamePhase::GameOver,
            score: 0,
            clock: Clock::new(&settings),
            arrows,
            bug,
            scheme_index: 1,
            active_scheme: settings.palette[1],
            transition: None,
            rng: Pcg32::seed_from_u64(settings.seed),
            wall_clock,
            bus: EventBus::new(),
            pending: Vec::new(),
            high_scores,
            store,
            frame: 0,
            settings,
        })
    }

    /// Swap in the host's persistent store and reload the leaderboard from it
    pub fn with_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.high_scores = HighScores::load(store.as_ref());
        self.store = store;
        self
    }

    /// Subscribe external collaborators (audio, score display) here
    pub fn bus(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn color_scheme(&self) -> &ColorScheme {
        &self.active_scheme
    }

    pub fn scheme_index(&self) -> usize {
        self.scheme_index
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Bug and both hands sit exactly on their resting angles
    pub fn is_settled(&self) -> bool {
        self.bug.angle.is_idle() && self.arrows.iter().all(|a| a.angle.is_idle())
    }

    /// Advance one frame
    pub fn update(&mut self) -> Result<(), SimError> {
        self.frame += 1;
        self.advance_transition();

        let ctx = FrameContext {
            game_over: self.is_game_over(),
            time: self.wall_clock.now(),
        };

        self.clock.update(&ctx, &mut self.pending);
        self.dispatch();

        // Score display lives outside the core; it hears ScorebarAdd on the bus

        for arrow in &mut self.arrows {
            arrow.update(&ctx);
        }

        let snapshots: [ArrowSnapshot; 2] = [self.arrows[0].snapshot(), self.arrows[1].snapshot()];
        self.bug.update(&ctx, &snapshots, &mut self.pending);
        self.dispatch();

        if self.phase == GamePhase::Playing {
            if let Some(arrow) = self.colliding_arrow()? {
                log::info!("Bug hit the {:?} hand", arrow);
                self.end_round();
                self.dispatch();
            }
        }
        Ok(())
    }

    /// Step the active palette transition; drop it once exhausted
    fn advance_transition(&mut self) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        match transition.next() {
            Some(scheme) => self.active_scheme = scheme,
            None => {
                self.active_scheme = transition.target();
                self.transition = None;
            }
        }
    }

    /// First hand whose head overlaps the bug's body
    fn colliding_arrow(&self) -> Result<Option<ArrowId>, SimError> {
        let bug = Polygon::new(self.bug.transformed_path())?;
        for arrow in &self.arrows {
            let head = Polygon::new(arrow.collision_path())?;
            if sat_collision(&bug, &head) {
                return Ok(Some(arrow.id));
            }
        }
        Ok(None)
    }

    /// Input: jump while playing, otherwise try to start a round
    pub fn press(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.jump(),
            GamePhase::GameOver => self.start_round(),
        }
    }

    pub fn jump(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let jumped = self.bug.jump(&mut self.pending);
        self.dispatch();
        jumped
    }

    pub fn switch_direction(&mut self) {
        if self.phase == GamePhase::Playing {
            self.bug.switch_direction();
        }
    }

    /// Begin a round; refused until the attract pose has fully settled
    pub fn start_round(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        if !self.is_settled() {
            log::debug!("Start ignored: clock still settling");
            return false;
        }

        self.phase = GamePhase::Playing;
        self.score = 0;
        for arrow in &mut self.arrows {
            arrow.reset();
        }
        self.bug.reset();
        self.clock.set_scaling_up(true);

        log::info!("Round started");
        self.pending.push(GameEvent::RoundStarted);
        self.dispatch();
        true
    }

    fn end_round(&mut self) {
        self.phase = GamePhase::GameOver;
        self.pending.push(GameEvent::PlaySound(SoundCue::Crash));
        self.bug.die();
        self.change_scheme(1);
        self.clock.set_scaling_up(false);

        let timestamp = chrono::Utc::now().timestamp();
        if let Some(rank) = self.high_scores.add_score(self.score, timestamp) {
            log::info!("New high score {} (rank {})", self.score, rank);
            self.high_scores.save(self.store.as_mut());
        }

        log::info!("Round over with {} points", self.score);
        self.pending.push(GameEvent::RoundOver { score: self.score });
    }

    /// Start a transition from whatever is on screen now; supersedes any other
    fn change_scheme(&mut self, index: usize) {
        let target = self.settings.palette[index];
        self.transition = Some(SchemeTransition::new(self.active_scheme, target));
        self.scheme_index = index;
        log::debug!("Color scheme -> {}", index);
        self.pending.push(GameEvent::SchemeChanged { index });
    }

    /// Next playable scheme, wrapping past the end and skipping the dark one
    fn next_scheme_index(&self) -> usize {
        let next = self.scheme_index + 1;
        if next >= self.settings.palette.len() { 1 } else { next }
    }

    fn on_score(&mut self, score: u64) {
        if score % self.settings.scheme_every == 0 {
            self.change_scheme(self.next_scheme_index());
        }
        if score % self.settings.speed_ramp_every == 0 {
            let ramp = self.settings.arrow_speed_ramp;
            for arrow in &mut self.arrows {
                arrow.add_speed(ramp);
            }
            log::info!("Score {}: hands speed up by {}", score, ramp);
        }
    }

    /// Internal reaction to an event, before the bus sees it
    fn react(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::ClockResize { radius } => {
                for arrow in &mut self.arrows {
                    arrow.resize(radius);
                }
                self.bug.resize(radius);
            }
            GameEvent::ClockReposition { x, y } => {
                for arrow in &mut self.arrows {
                    arrow.reposition(x, y);
                }
                self.bug.reposition(x, y);
            }
            GameEvent::BugOverArrow { arrow } => {
                if self.phase != GamePhase::Playing {
                    return;
                }
                self.score += 1;
                self.arrows[arrow.index()].random_direction_change(&mut self.rng);
                self.pending.push(GameEvent::PlaySound(SoundCue::Score));
                self.pending.push(GameEvent::ScorebarAdd { score: self.score });
            }
            GameEvent::ScorebarAdd { score } => self.on_score(score),
            GameEvent::BugHitGround {
                rotation_deg,
                speed,
            } => self.clock.knockback(rotation_deg, speed),
            GameEvent::PlaySound(_)
            | GameEvent::RoundStarted
            | GameEvent::RoundOver { .. }
            | GameEvent::SchemeChanged { .. } => {}
        }
    }

    /// Drain pending events: react, then publish. Reactions may queue more.
    fn dispatch(&mut self) {
        while !self.pending.is_empty() {
            let batch = std::mem::take(&mut self.pending);
            for event in &batch {
                self.react(event);
                self.bus.publish(event);
            }
        }
    }

    /// Host resized the play area
    pub fn resize(&mut self, radius: f32) {
        self.clock.resize(radius, &mut self.pending);
        self.dispatch();
    }

    pub fn reposition(&mut self, x: f32, y: f32) {
        self.clock.reposition(x, y, &mut self.pending);
        self.dispatch();
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        let scheme = &self.active_scheme;
        canvas.clear(scheme.background);
        self.clock.render(canvas, scheme);
        for arrow in &self.arrows {
            arrow.render(canvas, scheme);
        }
        self.bug.render(canvas, scheme);
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("frame", &self.frame)
            .field("scheme_index", &self.scheme_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::render::{DrawCommand, RecordingCanvas};
    use crate::sim::bug::BugState;
    use crate::sim::context::{ClockTime, FixedClock};
    use crate::sim::events::EventKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn new_game() -> Game {
        Game::new(
            Settings::default(),
            Box::new(FixedClock(ClockTime::new(3, 0))),
        )
        .unwrap()
    }

    fn record(game: &mut Game, kind: EventKind) -> Rc<RefCell<Vec<GameEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        game.bus()
            .subscribe(kind, move |e| sink.borrow_mut().push(*e));
        seen
    }

    fn score_points(game: &mut Game, points: u64) {
        for _ in 0..points {
            game.pending.push(GameEvent::BugOverArrow {
                arrow: ArrowId::Minute,
            });
            game.dispatch();
        }
    }

    #[test]
    fn test_starts_in_attract_mode() {
        let game = new_game();
        assert_eq!(game.phase, GamePhase::GameOver);
        assert!(game.is_settled());
        assert_eq!(game.scheme_index(), 1);
        // 3:00 -> hands at 0° and 90°, bug between them
        assert_eq!(game.bug.angle.rotation_deg, 45.0);
    }

    #[test]
    fn test_invalid_settings_fail_construction() {
        let settings = Settings {
            bug_jump_speed: 0.0,
            ..Settings::default()
        };
        let result = Game::new(settings, Box::new(FixedClock(ClockTime::default())));
        assert!(matches!(result, Err(SimError::InvalidSettings { .. })));
    }

    #[test]
    fn test_press_starts_then_jumps() {
        let mut game = new_game();
        let started = record(&mut game, EventKind::RoundStarted);
        assert!(game.press());
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(started.borrow().len(), 1);

        assert!(game.press());
        assert!(game.bug.is_airborne());
        assert!(game.press());
        assert!(!game.press());
    }

    #[test]
    fn test_scoring_ramps() {
        let mut game = new_game();
        assert!(game.start_round());
        let schemes = record(&mut game, EventKind::SchemeChanged);
        let scores = record(&mut game, EventKind::ScorebarAdd);
        let base: Vec<f32> = game.arrows.iter().map(|a| a.angle.rotation_speed).collect();

        score_points(&mut game, 4);
        assert!(schemes.borrow().is_empty());

        score_points(&mut game, 1);
        assert_eq!(game.score, 5);
        assert_eq!(*schemes.borrow(), vec![GameEvent::SchemeChanged { index: 2 }]);
        assert!(game.is_transitioning());

        score_points(&mut game, 5);
        assert_eq!(game.score, 10);
        assert_eq!(scores.borrow().len(), 10);
        for (arrow, base) in game.arrows.iter().zip(base) {
            assert!((arrow.angle.rotation_speed - (base + ARROW_SPEED_RAMP)).abs() < 1e-5);
        }
        assert_eq!(game.scheme_index(), 3);
    }

    #[test]
    fn test_scheme_cycle_skips_dark() {
        let mut game = new_game();
        assert!(game.start_round());
        game.scheme_index = game.settings.palette.len() - 1;
        score_points(&mut game, 5);
        assert_eq!(game.scheme_index(), 1);
    }

    #[test]
    fn test_transition_completes_and_drops() {
        let mut game = new_game();
        assert!(game.start_round());
        score_points(&mut game, 5);
        let target = game.settings.palette[2];
        for _ in 0..200 {
            game.advance_transition();
        }
        assert!(!game.is_transitioning());
        assert_eq!(*game.color_scheme(), target);
    }

    #[test]
    fn test_newer_transition_supersedes() {
        let mut game = new_game();
        assert!(game.start_round());
        score_points(&mut game, 5);
        game.advance_transition();
        game.change_scheme(4);
        for _ in 0..200 {
            game.advance_transition();
        }
        assert_eq!(*game.color_scheme(), game.settings.palette[4]);
    }

    #[test]
    fn test_collision_ends_round() {
        let mut game = new_game();
        let sounds = record(&mut game, EventKind::PlaySound);
        let overs = record(&mut game, EventKind::RoundOver);
        assert!(game.start_round());

        // Park the minute hand right on the grounded bug
        game.bug.angle.rotation_deg = 100.0;
        game.arrows[0].angle.rotation_deg = 100.0;
        game.arrows[1].angle.rotation_deg = 280.0;
        game.update().unwrap();

        assert_eq!(game.phase, GamePhase::GameOver);
        assert_eq!(game.bug.state, BugState::Idle);
        assert_eq!(game.scheme_index(), 1);
        assert!(game.is_transitioning());
        assert!(sounds
            .borrow()
            .contains(&GameEvent::PlaySound(SoundCue::Crash)));
        assert_eq!(*overs.borrow(), vec![GameEvent::RoundOver { score: 0 }]);
    }

    #[test]
    fn test_jump_over_hand_scores() {
        let mut game = new_game();
        assert!(game.start_round());
        game.bug.angle.rotation_deg = 0.0;
        game.arrows[0].angle.rotation_deg = 180.0;
        game.arrows[1].angle.rotation_deg = 30.0;
        assert!(game.jump());

        for _ in 0..60 {
            game.update().unwrap();
        }
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.score, 1);
        assert!(!game.bug.is_airborne());
    }

    #[test]
    fn test_restart_waits_for_settle() {
        let mut game = new_game();
        assert!(game.start_round());
        game.bug.angle.rotation_deg = 100.0;
        game.arrows[0].angle.rotation_deg = 100.0;
        game.arrows[1].angle.rotation_deg = 280.0;
        game.update().unwrap();
        assert!(game.is_game_over());
        assert!(!game.start_round());

        let mut frames = 0;
        while !game.is_settled() {
            game.update().unwrap();
            frames += 1;
            assert!(frames < 400, "never settled");
        }
        assert!(game.start_round());
        assert_eq!(game.score, 0);
        for arrow in &game.arrows {
            assert_eq!(arrow.angle.rotation_speed, arrow.base_speed);
        }
    }

    #[test]
    fn test_landing_knocks_clock() {
        let mut game = new_game();
        let landings = record(&mut game, EventKind::BugHitGround);
        assert!(game.start_round());
        game.bug.angle.rotation_deg = 0.0;
        game.arrows[0].angle.rotation_deg = 180.0;
        game.arrows[1].angle.rotation_deg = 200.0;
        game.jump();
        let mut knocked = false;
        for _ in 0..60 {
            game.update().unwrap();
            knocked |= game.clock.offset != glam::Vec2::ZERO;
        }
        assert_eq!(landings.borrow().len(), 1);
        assert!(knocked);
    }

    #[test]
    fn test_resize_propagates() {
        let mut game = new_game();
        game.resize(CLOCK_MIN_RADIUS);
        assert!((game.bug.grounded_anchor_y - CLOCK_MIN_RADIUS * BUG_GROUND_RATIO).abs() < 1e-4);
        assert!((game.arrows[0].height - CLOCK_MIN_RADIUS * MINUTE_ARROW_LENGTH).abs() < 1e-4);

        game.reposition(50.0, 60.0);
        assert_eq!(game.bug.center, glam::Vec2::new(50.0, 60.0));
        assert_eq!(game.arrows[1].center, glam::Vec2::new(50.0, 60.0));
    }

    #[test]
    fn test_render_order() {
        let game = new_game();
        let mut canvas = RecordingCanvas::new();
        game.render(&mut canvas);

        assert!(matches!(canvas.commands.first(), Some(DrawCommand::Clear(_))));
        assert!(matches!(canvas.commands.get(1), Some(DrawCommand::Circle { .. })));
        let polygons = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
            .count();
        assert_eq!(polygons, 2);
        assert!(matches!(
            canvas.commands.last(),
            Some(DrawCommand::Sprite { name, .. }) if name == "bug_idle_right"
        ));
    }

    #[test]
    fn test_high_score_saved_to_store() {
        let mut game = new_game().with_store(Box::new(MemoryStore::new()));
        assert!(game.start_round());
        score_points(&mut game, 3);
        game.end_round();
        assert_eq!(game.high_scores().top_score(), Some(3));
        let saved = game.store.get(HighScores::STORAGE_KEY);
        assert!(saved.is_some_and(|json| json.contains("\"score\":3")));
    }
}
