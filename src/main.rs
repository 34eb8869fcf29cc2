//! Verse engine headless runner.
//!
//! Runs the simulation core without a renderer:
//!
//! 1. Load the INI configuration (defaults when the file is missing)
//! 2. Optionally load a world document and spawn toolbar entities
//! 3. Run a fixed number of frames at the configured delta
//! 4. Log every host callback, optionally export the resulting world
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --load world.json --spawn car --spawn goblin --frames 600
//! ```

use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

use verseengine::engine::Engine;
use verseengine::events::host::{CommandReply, HostCommand, HostEvent};
use verseengine::resources::config::EngineConfig;

/// Verse engine headless simulation
#[derive(Parser)]
#[command(version, about = "Headless runner of the verse world simulation core")]
struct Cli {
    /// Configuration file (INI).
    #[arg(long, value_name = "PATH", default_value = "./verse.ini")]
    config: PathBuf,

    /// Data root holding recipe namespaces. Overrides the config file.
    #[arg(long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// World document to import before running.
    #[arg(long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Toolbar spawn, direct kind or recipe id. Repeatable.
    #[arg(long, value_name = "KIND")]
    spawn: Vec<String>,

    /// Frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seed for repeatable runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the final world document here.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

fn log_host_event(event: &HostEvent) {
    match event {
        HostEvent::StatsTick(_) | HostEvent::RaceTimerTick { .. } => {
            log::trace!("{:?}", event)
        }
        _ => info!("host event: {:?}", event),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EngineConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("using default config: {}", e);
    }
    if let Some(data) = cli.data {
        config.data_root = data;
    }

    let mut engine = Engine::from_config(config);
    if let Some(seed) = cli.seed {
        engine.seed(seed);
    }
    let host = engine.connect_host();

    if let Some(path) = &cli.load {
        match std::fs::read_to_string(path) {
            Ok(json) => match engine.execute(HostCommand::ImportWorld { json }) {
                CommandReply::Imported(summary) => info!(
                    "loaded {:?}: {} created, {} failed",
                    path, summary.created, summary.failed
                ),
                reply => error!("could not load {:?}: {:?}", path, reply),
            },
            Err(e) => error!("could not read {:?}: {}", path, e),
        }
    }

    for kind in cli.spawn {
        let reply = engine.execute(HostCommand::SpawnPrimitive { kind });
        info!("spawn: {:?}", reply);
    }

    for _ in 0..cli.frames {
        engine.run_frames(1);
        // The renderer would consume these.
        engine.drain_visuals();
        for event in host.try_iter() {
            log_host_event(&event);
        }
    }

    if let Some(path) = &cli.export {
        match engine.execute(HostCommand::ExportWorld) {
            CommandReply::World(json) => match std::fs::write(path, json) {
                Ok(()) => info!("world written to {:?}", path),
                Err(e) => error!("could not write {:?}: {}", path, e),
            },
            reply => error!("export failed: {:?}", reply),
        }
    }
}
