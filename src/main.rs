//! Lawn Defense entry point.
//!
//! Built on:
//! - **raylib** for windowing, graphics, and audio
//! - **image** for decoding and preparing sprite frames on the CPU
//!
//! # Startup
//!
//! 1. Read `config.ini` (defaults when absent) and apply CLI overrides
//! 2. Load the graphics tree and collision-rect tables; any asset error is
//!    fatal
//! 3. Load or recover the save file and derive the tick rate
//! 4. Build the screen registry and start the first screen
//! 5. Open the window, start the audio thread and queue the sound cues
//! 6. Run the loop until the window closes or a screen exits
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --start lose
//! cargo run --release -- --list-assets
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use lawndefense::constants::{EXIT, GAME_LOSE, GAME_VICTORY, ORIGINAL_CAPTION, SOUND_VOLUME};
use lawndefense::control::{Control, Stop};
use lawndefense::events::audio::AudioCmd;
use lawndefense::platform::raylib::RaylibPlatform;
use lawndefense::resources::assettable::{AssetError, AssetTable};
use lawndefense::resources::audio::AudioBridge;
use lawndefense::resources::gameconfig::{DEFAULT_CONFIG_PATH, GameConfig};
use lawndefense::states::StateRegistry;
use lawndefense::states::screen::TimedScreen;
use lawndefense::systems::loader::load_game_assets;
use log::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StartScreen {
    Victory,
    Lose,
}

impl StartScreen {
    fn state_id(self) -> &'static str {
        match self {
            StartScreen::Victory => GAME_VICTORY,
            StartScreen::Lose => GAME_LOSE,
        }
    }
}

/// Lawn Defense
#[derive(Parser)]
#[command(version, about = "Lawn Defense: state-machine game runtime")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Save file, overriding the configured one.
    #[arg(long, value_name = "PATH")]
    save_path: Option<PathBuf>,

    /// Screen to start on.
    #[arg(long, value_enum, default_value_t = StartScreen::Victory)]
    start: StartScreen,

    /// Print every loaded asset with its kind and frame count, then exit.
    #[arg(long)]
    list_assets: bool,
}

fn fatal(what: &str, err: impl std::fmt::Display) -> ! {
    error!("{}: {}", what, err);
    process::exit(1);
}

fn print_assets(table: &AssetTable) {
    for name in table.names() {
        if let Ok(asset) = table.get(name) {
            println!("{:<40} {:<10} {}", name, asset.kind(), asset.frames().len());
        }
    }
    println!("{} assets", table.len());
}

/// Victory, then lose, then exit.
fn build_registry(graphics: &AssetTable) -> Result<StateRegistry, AssetError> {
    let mut registry = StateRegistry::default();
    registry.insert(
        GAME_VICTORY.to_string(),
        Box::new(TimedScreen::victory(graphics)?.with_next(GAME_LOSE)),
    );
    registry.insert(
        GAME_LOSE.to_string(),
        Box::new(TimedScreen::lose(graphics)?.with_next(EXIT)),
    );
    Ok(registry)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }
    if let Some(path) = cli.save_path {
        config.userdata_path = path;
    }

    // --------------- Assets ---------------
    let assets = load_game_assets(&config.graphics_dir, &config.zombie_rects, &config.plant_rects)
        .unwrap_or_else(|e| fatal("Failed to load assets", e));

    // Early-exit: list assets and quit (no window/audio needed)
    if cli.list_assets {
        print_assets(&assets.graphics);
        return;
    }

    // --------------- Save data & screens ---------------
    let mut control = Control::with_base_fps(&config.userdata_path, config.base_fps)
        .unwrap_or_else(|e| fatal("Failed to initialise game", e));
    let registry =
        build_registry(&assets.graphics).unwrap_or_else(|e| fatal("Failed to build screens", e));
    if let Err(e) = control.setup_states(registry, cli.start.state_id()) {
        fatal("Failed to start", e);
    }

    // --------------- Window & audio ---------------
    let bridge = AudioBridge::spawn();
    bridge.load_dir(&config.sound_dir);
    if let Some(vol) = control
        .game_info()
        .get(SOUND_VOLUME)
        .and_then(serde_json::Value::as_f64)
    {
        bridge.send(AudioCmd::Volume { vol: vol as f32 });
    }
    let mut platform = match RaylibPlatform::new(&config, ORIGINAL_CAPTION) {
        Ok(platform) => platform.with_audio(bridge),
        Err(e) => {
            bridge.shutdown();
            fatal("Failed to open window", e);
        }
    };

    // --------------- Main loop ---------------
    let result = control.run(&mut platform);
    platform.shutdown();
    match result {
        Ok(Stop::Exit) => info!("Exit requested"),
        Ok(Stop::Quit) => info!("Window closed"),
        Err(e) => fatal("Game loop failed", e),
    }
}
