//! Game tuning
//!
//! Loaded from JSON; every field has a default so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, duration_range, non_negative, positive};

/// Red light/green light tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Round length (seconds). Surviving this long wins.
    pub total_game_seconds: f32,

    // === Light cycle ===
    pub min_green_seconds: f32,
    pub max_green_seconds: f32,
    pub min_red_seconds: f32,
    pub max_red_seconds: f32,
    /// Movement is ignored for this long after the doll turns around
    pub grace_window_seconds: f32,

    // === Movement detection ===
    /// Frame-to-frame camera translation that counts as moving (meters)
    pub movement_threshold: f32,
    /// Frame-to-frame camera rotation that counts as moving (degrees)
    pub rotation_threshold_degrees: f32,

    // === Cues ===
    /// Tick sound plays every second once the clock is at or below this
    pub tick_cue_window_seconds: f32,
    /// Delay between the elimination sting and the gunshot
    pub gunshot_delay_seconds: f32,
    /// Delay between the gunshot and the end panel
    pub panel_delay_seconds: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            total_game_seconds: 120.0,

            min_green_seconds: 3.0,
            max_green_seconds: 8.0,
            min_red_seconds: 2.0,
            max_red_seconds: 5.0,
            grace_window_seconds: 0.5,

            movement_threshold: 0.01,
            rotation_threshold_degrees: 0.5,

            tick_cue_window_seconds: 10.0,
            gunshot_delay_seconds: 3.0,
            panel_delay_seconds: 1.0,
        }
    }
}

impl LightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("total_game_seconds", self.total_game_seconds)?;
        duration_range(
            "min_green_seconds",
            self.min_green_seconds,
            "max_green_seconds",
            self.max_green_seconds,
        )?;
        duration_range(
            "min_red_seconds",
            self.min_red_seconds,
            "max_red_seconds",
            self.max_red_seconds,
        )?;
        non_negative("grace_window_seconds", self.grace_window_seconds)?;
        non_negative("movement_threshold", self.movement_threshold)?;
        non_negative("rotation_threshold_degrees", self.rotation_threshold_degrees)?;
        non_negative("tick_cue_window_seconds", self.tick_cue_window_seconds)?;
        non_negative("gunshot_delay_seconds", self.gunshot_delay_seconds)?;
        non_negative("panel_delay_seconds", self.panel_delay_seconds)?;
        Ok(())
    }
}

/// Glass bridge tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Round length (seconds). Running out of time is fatal on the bridge.
    pub total_game_seconds: f32,
    /// How fast the world drops away during the fall (units/second)
    pub fall_speed: f32,
    /// Time without support before the player falls
    pub fall_delay_seconds: f32,
    /// Platform count per lane
    pub lanes: Vec<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            total_game_seconds: 120.0,
            fall_speed: 5.0,
            fall_delay_seconds: 2.0,
            lanes: vec![6, 6],
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("total_game_seconds", self.total_game_seconds)?;
        non_negative("fall_speed", self.fall_speed)?;
        non_negative("fall_delay_seconds", self.fall_delay_seconds)?;
        Ok(())
    }
}

/// All tuning, as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub light: LightConfig,
    pub bridge: BridgeConfig,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.light.validate()?;
        self.bridge.validate()
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
