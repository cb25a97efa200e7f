//! Scene configuration
//!
//! Every tunable of the particle scene lives in [`SceneConfig`]. The defaults
//! are the hand-tuned values the splash effect was built around; they are
//! exposed as named constants so callers can refer to them directly.
//!
//! Configs can be loaded from JSON. Missing fields fall back to defaults, so a
//! file only needs the values it overrides:
//!
//! ```
//! use splash_sim_core::SceneConfig;
//!
//! let config = SceneConfig::from_json_str(r#"{ "spawn_probability": 0.25 }"#).unwrap();
//! assert_eq!(config.spawn_probability, 0.25);
//! assert_eq!(config.floor_y, splash_sim_core::config::FLOOR_Y);
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

/// Height of the floor plane; drops below it are removed
pub const FLOOR_Y: f32 = -3.0;

/// Gravitational acceleration applied to water drops (m/s²)
pub const GRAVITY: f32 = 9.81;

/// Fraction of a drop's velocity applied to its position each step
pub const DROP_POSITION_DAMPING: f32 = 0.5;

/// Fraction of a splash particle's velocity applied to its position each step
pub const SPLASH_POSITION_DAMPING: f32 = 0.25;

/// Lifetime of a splash particle in seconds
pub const SPLASH_TIME_TO_LIVE: f32 = 2.75;

/// Chance per frame that the continuous spawner emits a drop
pub const DROP_SPAWN_PROBABILITY: f32 = 0.01;

/// Scene configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// Config text is not valid JSON for [`SceneConfig`]
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// A value is outside the range the scene can run with
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunable parameters of the particle scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Drops whose height falls below this are removed
    pub floor_y: f32,
    /// Downward acceleration on drops
    pub gravity: f32,
    /// Position damping for drops
    pub drop_damping: f32,
    /// Position damping for splash particles
    pub splash_damping: f32,
    /// Initial time-to-live of splash particles (seconds)
    pub splash_time_to_live: f32,
    /// Per-frame probability of spawning a drop (0-1)
    pub spawn_probability: f32,

    /// Spawn region, x axis
    pub drop_spawn_x: Range<f32>,
    /// Spawn region, y axis
    pub drop_spawn_y: Range<f32>,
    /// Spawn region, z axis
    pub drop_spawn_z: Range<f32>,
    /// Per-component range of a new drop's velocity
    pub drop_velocity: Range<f32>,
    /// Width/height range of a new drop
    pub drop_scale: Range<f32>,

    /// Per-component range of a splash particle's launch velocity
    pub splash_velocity: Range<f32>,
    /// Width/height range of a splash particle
    pub splash_scale: Range<f32>,
    /// Per-component range of the random splash forcing
    pub splash_acceleration: Range<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            floor_y: FLOOR_Y,
            gravity: GRAVITY,
            drop_damping: DROP_POSITION_DAMPING,
            splash_damping: SPLASH_POSITION_DAMPING,
            splash_time_to_live: SPLASH_TIME_TO_LIVE,
            spawn_probability: DROP_SPAWN_PROBABILITY,
            drop_spawn_x: 1.0..5.0,
            drop_spawn_y: 5.5..7.5,
            // Reversed range, sampled between -4.5 and -1.5
            drop_spawn_z: Range {
                start: -1.5,
                end: -4.5,
            },
            drop_velocity: 0.0..0.05,
            drop_scale: 0.1..0.35,
            splash_velocity: -1.5..1.5,
            splash_scale: 0.05..0.15,
            splash_acceleration: 0.0..50.0,
        }
    }
}

impl SceneConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON and validate it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed JSON and
    /// [`ConfigError::ValidationError`] for out-of-range values.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: SceneConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileError`] if the file cannot be read, otherwise
    /// the same errors as [`SceneConfig::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if serialization fails.
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Check every value is one the scene can run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        let scalars = [
            ("floor_y", self.floor_y),
            ("gravity", self.gravity),
            ("drop_damping", self.drop_damping),
            ("splash_damping", self.splash_damping),
            ("splash_time_to_live", self.splash_time_to_live),
            ("spawn_probability", self.spawn_probability),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(name, &format!("must be finite, got {value}")));
            }
        }

        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(invalid(
                "spawn_probability",
                &format!("must be within 0-1, got {}", self.spawn_probability),
            ));
        }
        if self.gravity < 0.0 {
            return Err(invalid("gravity", "must not be negative"));
        }
        if self.drop_damping < 0.0 {
            return Err(invalid("drop_damping", "must not be negative"));
        }
        if self.splash_damping < 0.0 {
            return Err(invalid("splash_damping", "must not be negative"));
        }
        if self.splash_time_to_live <= 0.0 {
            return Err(invalid(
                "splash_time_to_live",
                &format!("must be positive, got {}", self.splash_time_to_live),
            ));
        }

        let ranges = [
            ("drop_spawn_x", &self.drop_spawn_x),
            ("drop_spawn_y", &self.drop_spawn_y),
            ("drop_spawn_z", &self.drop_spawn_z),
            ("drop_velocity", &self.drop_velocity),
            ("drop_scale", &self.drop_scale),
            ("splash_velocity", &self.splash_velocity),
            ("splash_scale", &self.splash_scale),
            ("splash_acceleration", &self.splash_acceleration),
        ];
        for (name, range) in ranges {
            if !range.start.is_finite() || !range.end.is_finite() {
                return Err(invalid(name, "range bounds must be finite"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::ValidationError(format!("{field}: {reason}"))
}
