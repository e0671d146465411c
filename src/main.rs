//! Clock Hop headless driver
//!
//! Runs the simulation without a window: waits for the attract pose to
//! settle, starts a round, jumps on a fixed rhythm until the bug is hit, and
//! logs what the bus reports. Pass a settings JSON file as the first argument
//! to override the defaults.

use clock_hop::Settings;
use clock_hop::consts::FRAME_RATE;
use clock_hop::render::RecordingCanvas;
use clock_hop::sim::{EventKind, Game, GameEvent, SystemClock};

/// Give up after this many simulated seconds
const MAX_SECONDS: u64 = 120;
/// Frames between scripted jumps
const JUMP_EVERY: u64 = 50;

fn main() {
    env_logger::init();
    log::info!("Clock Hop (headless) starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading settings from {}", path);
            Settings::from_json(&std::fs::read_to_string(path)?)?
        }
        None => Settings::default(),
    };

    let mut game = Game::new(settings, Box::new(SystemClock))?;
    for kind in [
        EventKind::ScorebarAdd,
        EventKind::PlaySound,
        EventKind::RoundStarted,
        EventKind::RoundOver,
        EventKind::SchemeChanged,
    ] {
        game.bus().subscribe(kind, |event| match event {
            GameEvent::ScorebarAdd { score } => log::info!("Score: {}", score),
            other => log::debug!("{:?}", other),
        });
    }

    let mut canvas = RecordingCanvas::new();
    let mut started = false;
    let max_frames = MAX_SECONDS * FRAME_RATE as u64;

    while game.frame < max_frames {
        if !started {
            started = game.start_round();
        } else if game.frame % JUMP_EVERY == 0 {
            game.jump();
        }

        game.update()?;
        canvas.clear_commands();
        game.render(&mut canvas);

        if started && game.is_game_over() {
            break;
        }
    }

    println!(
        "Finished after {} frames with {} points (best: {})",
        game.frame,
        game.score,
        game.high_scores().top_score().unwrap_or(0)
    );
    Ok(())
}
