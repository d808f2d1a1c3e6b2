//! Game configuration.
//!
//! Settings loaded from an INI file. Defaults allow startup without any file
//! present, and command-line flags override individual values afterwards.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 600
//! fullscreen = false
//!
//! [game]
//! base_fps = 50
//!
//! [paths]
//! graphics = ./resources/graphics
//! sounds = ./resources/sound
//! zombie_rects = ./resources/data/entity/zombie.json
//! plant_rects = ./resources/data/entity/plant.json
//! userdata = ./userdata/userdata.json
//! icon = ./resources/logo.png
//! ```
//!
//! The window icon is optional: a missing file is skipped.

use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use log::info;

use crate::constants::{
    BASE_FPS, DEFAULT_GRAPHICS_DIR, DEFAULT_ICON_PATH, DEFAULT_PLANT_RECTS, DEFAULT_SOUND_DIR,
    DEFAULT_USERDATA_PATH, DEFAULT_ZOMBIE_RECTS, SCREEN_HEIGHT, SCREEN_WIDTH,
};

pub const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Ticks per second before the save's game-speed multiplier.
    pub base_fps: f64,
    pub graphics_dir: PathBuf,
    pub sound_dir: PathBuf,
    pub zombie_rects: PathBuf,
    pub plant_rects: PathBuf,
    pub userdata_path: PathBuf,
    /// Window icon image.
    pub icon_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            window_width: SCREEN_WIDTH,
            window_height: SCREEN_HEIGHT,
            fullscreen: false,
            base_fps: BASE_FPS,
            graphics_dir: PathBuf::from(DEFAULT_GRAPHICS_DIR),
            sound_dir: PathBuf::from(DEFAULT_SOUND_DIR),
            zombie_rects: PathBuf::from(DEFAULT_ZOMBIE_RECTS),
            plant_rects: PathBuf::from(DEFAULT_PLANT_RECTS),
            userdata_path: PathBuf::from(DEFAULT_USERDATA_PATH),
            icon_path: PathBuf::from(DEFAULT_ICON_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration that reads and writes `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [game] section
        if let Some(fps) = config.getfloat("game", "base_fps").ok().flatten() {
            if fps > 0.0 {
                self.base_fps = fps;
            }
        }

        // [paths] section
        let path = |key: &str| config.get("paths", key).map(PathBuf::from);
        if let Some(p) = path("graphics") {
            self.graphics_dir = p;
        }
        if let Some(p) = path("sounds") {
            self.sound_dir = p;
        }
        if let Some(p) = path("zombie_rects") {
            self.zombie_rects = p;
        }
        if let Some(p) = path("plant_rects") {
            self.plant_rects = p;
        }
        if let Some(p) = path("userdata") {
            self.userdata_path = p;
        }
        if let Some(p) = path("icon") {
            self.icon_path = p;
        }

        info!(
            "Loaded config: {}x{} window, fullscreen={}, base_fps={}, graphics={}",
            self.window_width,
            self.window_height,
            self.fullscreen,
            self.base_fps,
            self.graphics_dir.display()
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        // [game] section
        config.set("game", "base_fps", Some(self.base_fps.to_string()));

        // [paths] section
        let path = |p: &PathBuf| Some(p.to_string_lossy().into_owned());
        config.set("paths", "graphics", path(&self.graphics_dir));
        config.set("paths", "sounds", path(&self.sound_dir));
        config.set("paths", "zombie_rects", path(&self.zombie_rects));
        config.set("paths", "plant_rects", path(&self.plant_rects));
        config.set("paths", "userdata", path(&self.userdata_path));
        config.set("paths", "icon", path(&self.icon_path));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// The icon file, if it exists.
    pub fn icon_file(&self) -> Option<&Path> {
        Some(self.icon_path.as_path()).filter(|p| p.is_file())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_is_an_error_and_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GameConfig::with_path(dir.path().join("absent.ini"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.window_size(), (SCREEN_WIDTH, SCREEN_HEIGHT));
        assert_eq!(config.base_fps, BASE_FPS);
    }

    #[test]
    fn test_partial_file_overrides_present_keys_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(
            &path,
            "[window]\nfullscreen = true\n[paths]\ngraphics = /data/gfx\n",
        )
        .unwrap();
        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert!(config.fullscreen);
        assert_eq!(config.graphics_dir, PathBuf::from("/data/gfx"));
        assert_eq!(config.sound_dir, PathBuf::from(DEFAULT_SOUND_DIR));
        assert_eq!(config.window_width, SCREEN_WIDTH);
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut saved = GameConfig::with_path(&path);
        saved.window_width = 1024;
        saved.base_fps = 60.0;
        saved.userdata_path = PathBuf::from("/tmp/save.json");
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_icon_only_offered_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let icon = dir.path().join("logo.png");
        fs::write(&path, format!("[paths]\nicon = {}\n", icon.display())).unwrap();

        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.icon_path, icon);
        assert!(config.icon_file().is_none());

        fs::write(&icon, b"png").unwrap();
        assert_eq!(config.icon_file(), Some(icon.as_path()));
    }
}
