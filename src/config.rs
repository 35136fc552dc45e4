//! Simulation configuration
//!
//! Fixed at startup; the grid never resizes for the lifetime of the process.

use std::env;

/// Configuration for the simulation and its window
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Grid width in cells
    pub grid_width: u32,
    /// Grid height in cells
    pub grid_height: u32,
    /// Probability that a seeded cell starts alive
    pub density: f32,
    /// Explicit seed for the initial pattern; `None` draws one and logs it
    pub seed: Option<u64>,
    /// Window title
    pub title: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_width: 1024,
            grid_height: 1024,
            density: 0.5,
            seed: None,
            title: "Conway's Game of Life".to_string(),
        }
    }
}

impl SimConfig {
    /// Builds a config from the environment.
    ///
    /// `GRIDLIFE_WIDTH` / `GRIDLIFE_HEIGHT` override the grid dimensions and
    /// `GRIDLIFE_SEED` pins the initial pattern for reproducible runs.
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            grid_width: env_u32("GRIDLIFE_WIDTH").unwrap_or(defaults.grid_width),
            grid_height: env_u32("GRIDLIFE_HEIGHT").unwrap_or(defaults.grid_height),
            seed: env::var("GRIDLIFE_SEED")
                .ok()
                .and_then(|v| v.parse().ok()),
            ..defaults
        }
    }
}

fn env_u32(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.grid_width, 1024);
        assert_eq!(config.grid_height, 1024);
        assert_eq!(config.density, 0.5);
        assert!(config.seed.is_none());
    }
}
