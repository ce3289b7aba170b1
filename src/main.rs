//! Matcha Bear entry point
//!
//! Runs a headless demo session: the autopilot plays one game on a simulated
//! display clock while the log shows what happens.
//!
//! Usage: `matcha-bear [settings.json]`

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use matcha_bear::Settings;
use matcha_bear::audio::{AudioManager, LogOutput};
use matcha_bear::input::{InputAction, dispatch};
use matcha_bear::scheduler::Scheduler;
use matcha_bear::sim::{GameStatus, TickOutcome, autopilot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Matcha Bear (native demo) starting...");

    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load_or_default(&PathBuf::from(path)),
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::info!("Seed {seed}");

    let audio = AudioManager::from_settings(&settings, Box::new(LogOutput));
    let mut scheduler = Scheduler::new(seed, Box::new(audio));

    let frame = settings.frame_interval();
    let limit = Duration::from_secs(u64::from(settings.demo_max_secs));
    let mut now = Duration::ZERO;

    dispatch(&mut scheduler, InputAction::Primary, now)?;
    while scheduler.is_running() && now < limit {
        now += frame;
        if let Some(direction) = autopilot::choose_direction(scheduler.state()) {
            scheduler.request_direction(direction);
        }
        match scheduler.frame(now)? {
            Some(TickOutcome::Moved(Some(item))) => {
                let state = scheduler.state();
                log::info!("{:?} at {:?}, score {}", item, state.snake.head(), state.score);
            }
            Some(TickOutcome::Ended(status)) => log::info!("Ended: {:?}", status),
            _ => {}
        }
    }

    if scheduler.state().status == GameStatus::Won {
        dispatch(&mut scheduler, InputAction::Primary, now)?;
    }

    let snapshot = scheduler.snapshot();
    scheduler.teardown();

    println!("{snapshot}");
    println!("{}", message(snapshot.status));
    println!("{}", serde_json::to_string(&snapshot)?);
    Ok(())
}

fn message(status: GameStatus) -> &'static str {
    match status {
        GameStatus::LostWallOrSelf => "Try again Mars!",
        GameStatus::LostThreat => "Caught by the man... try again.",
        GameStatus::Won | GameStatus::Celebrating => "Yay! Happy Valentine's Day!",
        GameStatus::Playing => "Out of time.",
        GameStatus::Start => "",
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
