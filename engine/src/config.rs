//! Tunable parameters of a simulation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when no other seed is configured.
pub const DEFAULT_SEED: u64 = 0x5348_414D_424C_4521;

/// Parameters that shape a [`crate::Simulation`].
///
/// Every field has a default, so configuration files only need to name the
/// values they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of map columns.
    pub map_width: u32,
    /// Number of map rows.
    pub map_height: u32,
    /// Side length of a map field in pixels.
    pub field_size: u32,
    /// Number of enemies requested at start-up.
    pub enemy_count: u32,
    /// Sight range of the player in cells.
    pub visibility_range: f32,
    /// Initial camera width in pixels.
    pub viewport_width: u32,
    /// Initial camera height in pixels.
    pub viewport_height: u32,
    /// Seed shared by map generation, enemy placement and enemy decisions.
    pub seed: u64,
    /// Probability that an idle enemy waits instead of walking.
    pub enemy_wait_chance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            map_width: 64,
            map_height: 64,
            field_size: 32,
            enemy_count: 20,
            visibility_range: shamble_system_visibility::VISIBILITY_RANGE,
            viewport_width: 800,
            viewport_height: 600,
            seed: DEFAULT_SEED,
            enemy_wait_chance: shamble_system_wander::DEFAULT_WAIT_CHANCE,
        }
    }
}

impl SimulationConfig {
    /// Checks that the configuration describes a runnable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(ConfigError::EmptyMap {
                width: self.map_width,
                height: self.map_height,
            });
        }
        let capacity = u64::from(self.map_width) * u64::from(self.map_height) - 1;
        if u64::from(self.enemy_count) > capacity {
            return Err(ConfigError::TooManyEnemies {
                count: self.enemy_count,
                capacity,
            });
        }
        if self.field_size == 0 {
            return Err(ConfigError::ZeroFieldSize);
        }
        if !self.visibility_range.is_finite() || self.visibility_range <= 0.0 {
            return Err(ConfigError::InvalidVisibilityRange {
                range: self.visibility_range,
            });
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !(0.0..=1.0).contains(&self.enemy_wait_chance) {
            return Err(ConfigError::InvalidWaitChance {
                chance: self.enemy_wait_chance,
            });
        }
        Ok(())
    }
}

/// Reasons a [`SimulationConfig`] is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The map has no cells.
    #[error("map must have at least one cell (received {width}x{height})")]
    EmptyMap {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// More enemies were requested than the map has cells besides the player's.
    #[error("{count} enemies do not fit on a map with {capacity} free cells")]
    TooManyEnemies {
        /// Configured enemy count.
        count: u32,
        /// Cells left once the player is placed.
        capacity: u64,
    },
    /// Fields must have a positive size.
    #[error("field size must be positive")]
    ZeroFieldSize,
    /// The sight range is not a positive number.
    #[error("visibility range must be positive (received {range})")]
    InvalidVisibilityRange {
        /// Configured range.
        range: f32,
    },
    /// The camera has no area.
    #[error("viewport must be non-empty (received {width}x{height})")]
    EmptyViewport {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// The wait probability lies outside `0.0..=1.0`.
    #[error("enemy wait chance must lie in 0.0..=1.0 (received {chance})")]
    InvalidWaitChance {
        /// Configured probability.
        chance: f64,
    },
}
