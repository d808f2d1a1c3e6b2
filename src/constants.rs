//! Shared identifiers and defaults.
//!
//! State identifiers, save-data keys, asset names and colors used across the
//! crate. State identifiers are plain strings so screens can name successors
//! that live outside this crate.

use raylib::prelude::Color;

/// Logical window width in pixels.
pub const SCREEN_WIDTH: u32 = 800;
/// Logical window height in pixels.
pub const SCREEN_HEIGHT: u32 = 600;
/// Base tick rate, multiplied by the game-speed multiplier.
pub const BASE_FPS: f64 = 50.0;
pub const ORIGINAL_CAPTION: &str = "Lawn Defense";

// State identifiers
pub const MAIN_MENU: &str = "main menu";
pub const LEVEL: &str = "level";
pub const GAME_VICTORY: &str = "game victory";
pub const GAME_LOSE: &str = "game lose";
/// Reserved: transitioning here ends the program.
pub const EXIT: &str = "exit";

// Save-data keys
pub const GAME_RATE: &str = "game rate";
pub const LEVEL_NUM: &str = "level num";
pub const LEVEL_COMPLETIONS: &str = "level completions";
pub const LITTLEGAME_NUM: &str = "littleGame num";
pub const LITTLEGAME_COMPLETIONS: &str = "littleGame completions";
pub const SOUND_VOLUME: &str = "volume";
/// Injected after load, never written to disk.
pub const CURRENT_TIME: &str = "current time";

// Screen images
pub const GAME_VICTORY_IMAGE: &str = "GameVictory";
pub const GAME_LOSE_IMAGE: &str = "GameLose";

// Sound cues
pub const SOUND_WIN: &str = "win";
pub const SOUND_LOSE: &str = "lose";
pub const SOUND_SCREAM: &str = "scream";
pub const MAX_SOUND_CHANNELS: usize = 255;

// Collision-rect tables
pub const ZOMBIE_IMAGE_RECT: &str = "ZOMBIE_IMAGE_RECT";
pub const PLANT_IMAGE_RECT: &str = "PLANT_IMAGE_RECT";

// Default paths
pub const DEFAULT_GRAPHICS_DIR: &str = "./resources/graphics";
pub const DEFAULT_SOUND_DIR: &str = "./resources/sound";
pub const DEFAULT_ZOMBIE_RECTS: &str = "./resources/data/entity/zombie.json";
pub const DEFAULT_PLANT_RECTS: &str = "./resources/data/entity/plant.json";
pub const DEFAULT_USERDATA_PATH: &str = "./userdata/userdata.json";
pub const DEFAULT_ICON_PATH: &str = "./resources/logo.png";

/// Image extensions the loader accepts (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

pub const WHITE: Color = Color::new(255, 255, 255, 255);
pub const BLACK: Color = Color::new(0, 0, 0, 255);
