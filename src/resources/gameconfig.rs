//! Game configuration resource.
//!
//! Manages simulation settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! gravity_x = 0.0
//! gravity_y = -9.81
//!
//! [sim]
//! ticks = 600
//! frame_rate = 60
//!
//! [bindings]
//! jump = space
//! move_left = a
//! move_right = d
//! quit = escape
//! use = e
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::playercontrolled::{Bindings, GameAction};
use crate::resources::input::KeyCode;

/// Default safe values for startup
const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.81);
const DEFAULT_TICKS: u32 = 600;
const DEFAULT_FRAME_RATE: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// Stores world gravity, headless run length and the player's key bindings.
/// Missing keys keep their defaults, so a partial file is valid.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Gravity applied by the physics world (y up).
    pub gravity: Vec2,
    /// Ticks to run in headless mode.
    pub ticks: u32,
    /// Frames per second of the host loop; sets the frame delta.
    pub frame_rate: u32,
    /// Player key bindings.
    pub bindings: Bindings,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            ticks: DEFAULT_TICKS,
            frame_rate: DEFAULT_FRAME_RATE,
            bindings: Bindings::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Host frame delta in seconds.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Unparseable key
    /// names in `[bindings]` are skipped with a warning.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [physics] section
        if let Some(x) = config.getfloat("physics", "gravity_x").ok().flatten() {
            self.gravity.x = x as f32;
        }
        if let Some(y) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.gravity.y = y as f32;
        }

        // [sim] section
        if let Some(ticks) = config.getuint("sim", "ticks").ok().flatten() {
            self.ticks = ticks as u32;
        }
        if let Some(rate) = config.getuint("sim", "frame_rate").ok().flatten() {
            if rate > 0 {
                self.frame_rate = rate as u32;
            }
        }

        // [bindings] section
        for action in GameAction::ALL {
            let Some(name) = config.get("bindings", action.config_key()) else {
                continue;
            };
            match name.parse::<KeyCode>() {
                Ok(key) => self.bindings.bind(action, key),
                Err(e) => warn!("Ignoring binding for {}: {}", action, e),
            }
        }

        info!(
            "Loaded config: gravity=({}, {}), ticks={}, frame_rate={}",
            self.gravity.x, self.gravity.y, self.ticks, self.frame_rate
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [physics] section
        config.set("physics", "gravity_x", Some(self.gravity.x.to_string()));
        config.set("physics", "gravity_y", Some(self.gravity.y.to_string()));

        // [sim] section
        config.set("sim", "ticks", Some(self.ticks.to_string()));
        config.set("sim", "frame_rate", Some(self.frame_rate.to_string()));

        // [bindings] section
        for (action, key) in self.bindings.iter() {
            config.set(
                "bindings",
                action.config_key(),
                Some(format!("{:?}", key).to_ascii_lowercase()),
            );
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emberleap_{}_{}.ini", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.gravity, Vec2::new(0.0, -9.81));
        assert_eq!(config.frame_rate, 60);
        assert!((config.frame_delta() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(config.bindings, Bindings::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = GameConfig::with_path(temp_path("does_not_exist"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.ticks, DEFAULT_TICKS);
    }

    #[test]
    fn test_load_partial_file() {
        let path = temp_path("partial");
        fs::write(
            &path,
            "[physics]\ngravity_y = -20.0\n\n[sim]\nticks = 42\n\n[bindings]\njump = w\nuse = f13\n",
        )
        .unwrap();

        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.gravity, Vec2::new(0.0, -20.0));
        assert_eq!(config.ticks, 42);
        assert_eq!(config.frame_rate, DEFAULT_FRAME_RATE);
        assert_eq!(config.bindings.key_for(GameAction::Jump), Some(KeyCode::W));
        // Bad key names keep the previous binding.
        assert_eq!(config.bindings.key_for(GameAction::Use), Some(KeyCode::E));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let mut saved = GameConfig::with_path(&path);
        saved.gravity = Vec2::new(1.0, -5.0);
        saved.ticks = 7;
        saved.bindings.bind(GameAction::MoveLeft, KeyCode::Left);
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.gravity, saved.gravity);
        assert_eq!(loaded.ticks, 7);
        assert_eq!(loaded.bindings, saved.bindings);
    }
}
