//! # World Configuration Module
//!
//! This module defines the world generation configuration consumed by the
//! whole pipeline, its startup validation, and the seed handling that turns a
//! user-supplied seed string into the 64-bit hash terrain generation runs on.
//!
//! Configuration is loaded once at startup (either from a JSON file or from
//! defaults), validated before any chunk work begins, and passed explicitly
//! into the generator and mesher. Nothing in the pipeline reads configuration
//! from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod seed;

/// The smallest accepted chunk size, in voxels per horizontal axis.
pub const MIN_CHUNK_SIZE: u8 = 1;
/// The largest accepted chunk size, in voxels per horizontal axis.
pub const MAX_CHUNK_SIZE: u8 = 32;

/// Errors raised by configuration loading and validation.
///
/// These are the only fatal errors in the system: an invalid configuration is
/// rejected before any chunk work begins, because no valid voxel addressing
/// scheme can be derived from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The chunk size is outside the supported range.
    #[error("chunk size must be between {MIN_CHUNK_SIZE} and {MAX_CHUNK_SIZE}, got {0}")]
    ChunkSize(u8),

    /// The chunk height is zero.
    #[error("chunk height must be at least 1")]
    ChunkHeight,

    /// The render distance is zero.
    #[error("render distance must be at least 1")]
    RenderDistance,

    /// The noise frequency is NaN or infinite.
    #[error("noise frequency must be finite, got {0}")]
    Frequency(f32),

    /// The noise amplitude is NaN or infinite.
    #[error("noise amplitude must be finite, got {0}")]
    Amplitude(f32),

    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// World generation configuration, immutable once the pipeline starts.
///
/// The configuration fully determines the generated world: identical
/// `(seed, frequency, amplitude, chunk_size, chunk_height)` always yield
/// identical voxel content for every chunk coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Voxels per horizontal axis of a chunk (1-32).
    pub chunk_size: u8,
    /// Voxels along the vertical axis of a chunk (1-255).
    pub chunk_height: u8,
    /// Radius around the viewer, in chunk-grid units, within which chunks
    /// must be loaded.
    pub render_distance: u32,
    /// Horizontal scale applied to world coordinates before noise sampling.
    pub frequency: f32,
    /// Vertical scale applied to the normalized noise value.
    pub amplitude: f32,
    /// Optional seed string. A random seed is drawn at startup when absent
    /// or blank.
    #[serde(default)]
    pub seed: Option<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: 16,
            chunk_height: 255,
            render_distance: 8,
            frequency: 0.01,
            amplitude: 32.0,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Path of the JSON file to read
    ///
    /// # Returns
    /// The parsed configuration, not yet validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Checks every field against its accepted range.
    ///
    /// # Returns
    /// `Ok(())` when the configuration can drive the pipeline, or the first
    /// violated constraint as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size < MIN_CHUNK_SIZE || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkSize(self.chunk_size));
        }
        if self.chunk_height == 0 {
            return Err(ConfigError::ChunkHeight);
        }
        if self.render_distance == 0 {
            return Err(ConfigError::RenderDistance);
        }
        if !self.frequency.is_finite() {
            return Err(ConfigError::Frequency(self.frequency));
        }
        if !self.amplitude.is_finite() {
            return Err(ConfigError::Amplitude(self.amplitude));
        }
        Ok(())
    }

    /// Replaces an absent or blank seed with a freshly drawn random one.
    ///
    /// Called once at startup so that every later `seed_hash` call sees the
    /// same seed string for the lifetime of the process.
    pub fn resolve_seed(&mut self) {
        let blank = match &self.seed {
            None => true,
            Some(text) => text.trim().is_empty(),
        };
        if blank {
            let drawn = seed::random_seed_string();
            log::info!("No world seed configured, drew \"{}\"", drawn);
            self.seed = Some(drawn);
        }
    }

    /// Returns the 64-bit hash of the resolved seed string.
    pub fn seed_hash(&self) -> u64 {
        seed::seed_hash(self.seed.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_chunk_size_out_of_range() {
        let mut config = WorldConfig::default();
        config.chunk_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ChunkSize(0))));
        config.chunk_size = 33;
        assert!(matches!(config.validate(), Err(ConfigError::ChunkSize(33))));
    }

    #[test]
    fn test_rejects_zero_chunk_height() {
        let mut config = WorldConfig::default();
        config.chunk_height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ChunkHeight)));
    }

    #[test]
    fn test_rejects_zero_render_distance() {
        let mut config = WorldConfig::default();
        config.render_distance = 0;
        assert!(matches!(config.validate(), Err(ConfigError::RenderDistance)));
    }

    #[test]
    fn test_rejects_non_finite_noise_parameters() {
        let mut config = WorldConfig::default();
        config.frequency = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Frequency(_))));

        let mut config = WorldConfig::default();
        config.amplitude = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Amplitude(_))));
    }

    #[test]
    fn test_resolve_seed_fills_blank_seed() {
        let mut config = WorldConfig::default();
        config.resolve_seed();
        let drawn = config.seed.clone().unwrap();
        assert!(!drawn.trim().is_empty());

        // An explicit seed is left untouched.
        let mut config = WorldConfig::default();
        config.seed = Some("test".to_string());
        config.resolve_seed();
        assert_eq!(config.seed.as_deref(), Some("test"));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = WorldConfig {
            seed: Some("test".to_string()),
            ..WorldConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.chunk_size, config.chunk_size);
        assert_eq!(parsed.chunk_height, config.chunk_height);
        assert_eq!(parsed.render_distance, config.render_distance);
        assert_eq!(parsed.seed, config.seed);
    }
}
