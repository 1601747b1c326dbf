/// Headless client: replays a scripted night against the engine and logs what happens.
/// Usage: nightshift-client [scenario.json]
mod collision;
mod config;
mod game;
mod hud;
mod scenario;

use anyhow::Result;
use std::path::PathBuf;

use game::GameState;
use hud::format_status;
use scenario::Scenario;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scenario = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Loading scenario {}", path.display());
            Scenario::load(&path)?
        }
        None => {
            log::info!("No scenario given, running the built-in demo night");
            Scenario::demo()
        }
    };

    let mut game = GameState::new(&scenario)?;
    log::info!(
        "Running {:.0}s at {:.0} ticks/s with {} scripted inputs",
        scenario.duration,
        1.0 / scenario.dt,
        scenario.inputs.len()
    );

    while game.elapsed() < scenario.duration {
        game.update(scenario.dt);
    }

    log::info!("Finished: {}", format_status(&game.status()));
    Ok(())
}
