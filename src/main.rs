//! Emberleap headless runner.
//!
//! Builds the simulation world, spawns the demo level and runs a fixed number
//! of ticks without a window. Held keys come from the command line, which is
//! enough to watch the player walk into the minigame trigger:
//!
//! ```sh
//! cargo run --release -- --ticks 300 --hold d
//! ```
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults if missing)
//! 2. Insert resources and observers, spawn the level
//! 3. Each tick: advance time, run the tick schedule
//! 4. Stop after `ticks` or when an exit is requested

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};

use emberleap::components::minigame::MinigameComponent;
use emberleap::components::transform::Transform;
use emberleap::game::{build_tick_schedule, run_tick, setup_world, spawn_demo_level};
use emberleap::resources::exitrequest::ExitRequest;
use emberleap::resources::gameconfig::GameConfig;
use emberleap::resources::input::{InputState, KeyCode};

/// Emberleap 2D simulation, headless.
#[derive(Parser)]
#[command(version, about = "Runs the emberleap simulation without a window.")]
struct Cli {
    /// Configuration file (INI).
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Number of ticks to run. Overrides `[sim] ticks`.
    #[arg(long)]
    ticks: Option<u32>,

    /// Key held for the whole run (e.g. `d`, `space`). Repeatable.
    #[arg(long = "hold", value_name = "KEY")]
    hold: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }

    let mut world = World::new();
    setup_world(&mut world, &config);
    let player = spawn_demo_level(&mut world, config.bindings.clone());

    {
        let mut input = world.resource_mut::<InputState>();
        for name in &cli.hold {
            match name.parse::<KeyCode>() {
                Ok(key) => input.press(key),
                Err(e) => warn!("{}", e),
            }
        }
    }

    let mut schedule = build_tick_schedule();
    let dt = config.frame_delta();
    let mut ticks_run = 0;
    for _ in 0..config.ticks {
        run_tick(&mut world, &mut schedule, dt);
        ticks_run += 1;
        if world.resource::<ExitRequest>().requested {
            info!("exit requested after {} ticks", ticks_run);
            break;
        }
    }

    if let Some(transform) = world.get::<Transform>(player) {
        info!(
            "player at ({:.2}, {:.2}) after {} ticks",
            transform.position.x, transform.position.y, ticks_run
        );
    }
    let mut minigames = world.query::<&MinigameComponent>();
    for component in minigames.iter(&world) {
        info!("running minigame: {}", component.name().unwrap_or("<none>"));
    }
}
