//! Game tuning and configuration
//!
//! Every gameplay constant lives here so runs can be replayed with a given
//! tuning. Read from LocalStorage on the web and from a JSON file on native.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::Inset;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::Error),
    /// Config JSON was malformed
    Parse(serde_json::Error),
    /// Config parsed but a value is out of range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Gameplay tuning
///
/// Units are playfield pixels, frames (one `tick`) and milliseconds.
/// Y grows downward, so upward velocities are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Height of the ground strip at the bottom of the playfield
    pub ground_height: f32,

    // === Character ===
    pub character_x: f32,
    pub character_width: f32,
    pub character_height: f32,
    /// Added to vertical velocity every airborne frame
    pub gravity: f32,
    /// Vertical velocity set on jump (negative = up)
    pub launch_velocity: f32,

    // === Scrolling ===
    pub base_speed: f32,
    /// Speed added at every difficulty step
    pub speed_step: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_base_height: f32,
    /// Regular obstacles get `floor(u * jitter)` extra height
    pub obstacle_height_jitter: f32,
    pub hazard_height: f32,
    /// Probability that a spawn is a hazard
    pub hazard_chance: f32,

    // === Spawn timing (ms) ===
    /// Interval before the first spawn of a run
    pub initial_spawn_interval_ms: f64,
    pub spawn_interval_min_ms: f64,
    pub spawn_interval_max_ms: f64,
    /// Amount the interval bounds shrink at every difficulty step
    pub spawn_interval_step_ms: f64,
    /// Lower bound the interval never shrinks past
    pub spawn_interval_floor_ms: f64,

    // === Score ===
    /// Score clock period
    pub score_period_ms: u64,
    /// Difficulty rises every time score reaches a multiple of this
    pub difficulty_threshold: u32,

    // === Hitboxes ===
    pub character_inset: Inset,
    pub obstacle_inset: Inset,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 400.0,
            ground_height: 50.0,

            character_x: 50.0,
            character_width: 130.0,
            character_height: 130.0,
            gravity: 1.25,
            launch_velocity: -20.0,

            base_speed: 10.0,
            speed_step: 2.0,

            obstacle_width: 80.0,
            obstacle_base_height: 50.0,
            obstacle_height_jitter: 50.0,
            hazard_height: 70.0,
            hazard_chance: 0.2,

            initial_spawn_interval_ms: 2000.0,
            spawn_interval_min_ms: 800.0,
            spawn_interval_max_ms: 2000.0,
            spawn_interval_step_ms: 100.0,
            spawn_interval_floor_ms: 500.0,

            score_period_ms: 100,
            difficulty_threshold: 180,

            // Sprite art has empty space on the right and bottom
            character_inset: Inset {
                left: 4.0,
                top: 4.0,
                right: 36.0,
                bottom: 36.0,
            },
            obstacle_inset: Inset::uniform(10.0),
        }
    }
}

impl GameConfig {
    /// Y of the ground line (top edge of the ground strip)
    pub fn ground_line(&self) -> f32 {
        self.playfield_height - self.ground_height
    }

    /// Y of the character's top edge while standing on the ground
    pub fn character_ground_y(&self) -> f32 {
        self.ground_line() - self.character_height
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject tunings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("gravity", self.gravity),
            ("base_speed", self.base_speed),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_base_height", self.obstacle_base_height),
            ("hazard_height", self.hazard_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.ground_height < 0.0 || self.ground_height >= self.playfield_height {
            return Err(invalid(format!(
                "ground_height must be in [0, {}), got {}",
                self.playfield_height, self.ground_height
            )));
        }
        if self.character_ground_y() < 0.0 {
            return Err(invalid("character does not fit above the ground".into()));
        }
        if !(self.launch_velocity < 0.0) {
            return Err(invalid(format!(
                "launch_velocity must be negative (upward), got {}",
                self.launch_velocity
            )));
        }
        if self.speed_step < 0.0 || self.obstacle_height_jitter < 0.0 {
            return Err(invalid("speed_step and obstacle_height_jitter must not be negative".into()));
        }
        if !(0.0..=1.0).contains(&self.hazard_chance) {
            return Err(invalid(format!(
                "hazard_chance must be in [0, 1], got {}",
                self.hazard_chance
            )));
        }

        if self.spawn_interval_floor_ms < 0.0 || self.spawn_interval_step_ms < 0.0 {
            return Err(invalid("spawn interval floor and step must not be negative".into()));
        }
        if self.spawn_interval_min_ms > self.spawn_interval_max_ms {
            return Err(invalid(format!(
                "spawn_interval_min_ms ({}) exceeds spawn_interval_max_ms ({})",
                self.spawn_interval_min_ms, self.spawn_interval_max_ms
            )));
        }
        if self.spawn_interval_floor_ms > self.spawn_interval_min_ms {
            return Err(invalid(format!(
                "spawn_interval_floor_ms ({}) exceeds spawn_interval_min_ms ({})",
                self.spawn_interval_floor_ms, self.spawn_interval_min_ms
            )));
        }
        if self.initial_spawn_interval_ms < 0.0 {
            return Err(invalid("initial_spawn_interval_ms must not be negative".into()));
        }

        if self.score_period_ms == 0 {
            return Err(invalid("score_period_ms must be non-zero".into()));
        }
        if self.difficulty_threshold == 0 {
            return Err(invalid("difficulty_threshold must be non-zero".into()));
        }

        if !self.character_inset.leaves_area(self.character_width, self.character_height) {
            return Err(invalid("character_inset leaves an empty hitbox".into()));
        }
        let smallest_obstacle = self.obstacle_base_height.min(self.hazard_height);
        if !self.obstacle_inset.leaves_area(self.obstacle_width, smallest_obstacle) {
            return Err(invalid("obstacle_inset leaves an empty hitbox".into()));
        }

        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "dino_jump_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
