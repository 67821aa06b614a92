//! World streaming configuration.
//!
//! Configurable parameters for region shape, streaming window, and
//! movement detection. Configuration can be loaded from and saved to a
//! TOML file; a missing or malformed file falls back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use strata_common::RegionDims;
use strata_kernel::WindowParams;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "strata.toml";

/// World streaming configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed for deterministic generation
    pub seed: u64,
    /// Region edge length in blocks (X and Z)
    pub region_edge: u32,
    /// Region height in blocks (Y)
    pub region_height: u32,
    /// Render distance in regions
    pub render_distance: u32,
    /// Seconds between observer movement checks
    pub detection_interval_secs: f32,
    /// Event bus capacity
    pub event_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: Self::random_seed(),
            region_edge: 16,
            region_height: 100,
            render_distance: 8,
            detection_interval_secs: 1.0,
            event_capacity: 256,
        }
    }
}

impl WorldConfig {
    /// Creates a config with the given seed and default shape.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Generates a random seed from system time.
    #[must_use]
    pub fn random_seed() -> u64 {
        use std::time::SystemTime;
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    }

    /// Region dimensions implied by this config.
    #[must_use]
    pub const fn dims(&self) -> RegionDims {
        RegionDims::new(self.region_edge, self.region_height)
    }

    /// Window parameters implied by this config.
    #[must_use]
    pub const fn window_params(&self) -> WindowParams {
        WindowParams {
            render_distance: self.render_distance,
            dims: self.dims(),
        }
    }

    /// Loads configuration from a TOML file, falling back to defaults
    /// when the file is absent or malformed. Degenerate values that
    /// would break the windowing math are clamped.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded world config");
                    config.sanitized()
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "invalid world config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no world config found, using defaults");
                Self::default()
            }
        }
    }

    /// Clamps values the streaming math cannot tolerate.
    fn sanitized(mut self) -> Self {
        if self.render_distance == 0 {
            warn!("render_distance must be at least 1, clamping");
            self.render_distance = 1;
        }
        if self.region_edge == 0 || self.region_height == 0 {
            warn!("region dimensions must be nonzero, using defaults");
            self.region_edge = 16;
            self.region_height = 100;
        }
        self
    }

    /// Saves configuration to a TOML file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = WorldConfig::default();
        assert_eq!(config.region_edge, 16);
        assert_eq!(config.region_height, 100);
        assert!(config.render_distance > 0);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);

        let mut config = WorldConfig::with_seed(1234);
        config.render_distance = 3;
        config.save(&path).expect("save config");

        let loaded = WorldConfig::load_or_default(&path);
        assert_eq!(loaded.seed, 1234);
        assert_eq!(loaded.render_distance, 3);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not valid toml [").expect("write");

        let loaded = WorldConfig::load_or_default(&path);
        assert_eq!(loaded.region_edge, WorldConfig::default().region_edge);
    }

    #[test]
    fn test_degenerate_values_are_clamped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "render_distance = 0\nregion_edge = 0\n").expect("write");

        let loaded = WorldConfig::load_or_default(&path);
        assert_eq!(loaded.render_distance, 1);
        assert_eq!(loaded.region_edge, 16);
        assert_eq!(loaded.region_height, 100);
    }
}
