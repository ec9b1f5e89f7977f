#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic city map generator.
//!
//! The map starts out as road. Square blocks are laid on a regular lattice
//! separated by roads; each block gets a one-cell pavement border and is
//! filled either with a walled building that has a single door, or with a
//! grass park fenced by hedges with a gap in the middle of every side.
//! Blocks that cross the map edge are clipped.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shamble_core::{GridCoord, TileKind, TileMap};

/// Smallest block that still leaves room for a wall ring around an interior.
pub const MIN_BLOCK_SIZE: u32 = 5;

/// Parameters controlling the city layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityConfig {
    seed: u64,
    block_size: u32,
    road_width: u32,
    park_chance: f64,
}

impl CityConfig {
    /// Creates a configuration with the default lattice and the provided seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            block_size: 12,
            road_width: 2,
            park_chance: 0.25,
        }
    }

    /// Overrides the side length of a block, pavement included.
    #[must_use]
    pub const fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    /// Overrides the width of the roads between blocks.
    #[must_use]
    pub const fn with_road_width(mut self, road_width: u32) -> Self {
        self.road_width = road_width;
        self
    }

    /// Overrides the probability that a block becomes a park.
    #[must_use]
    pub fn with_park_chance(mut self, park_chance: f64) -> Self {
        self.park_chance = park_chance.clamp(0.0, 1.0);
        self
    }

    /// Seed feeding the layout stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Reasons a city could not be generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapGenError {
    /// The block is too small to hold a building.
    BlockTooSmall {
        /// Requested block size.
        block_size: u32,
    },
    /// The requested map has no cells or does not fit signed coordinates.
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for MapGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockTooSmall { block_size } => write!(
                f,
                "block size {block_size} is below the minimum of {MIN_BLOCK_SIZE}"
            ),
            Self::InvalidDimensions { width, height } => {
                write!(f, "cannot generate a {width}x{height} map")
            }
        }
    }
}

impl std::error::Error for MapGenError {}

/// Generates a city of the requested size.
pub fn generate_city(config: &CityConfig, width: u32, height: u32) -> Result<TileMap, MapGenError> {
    if config.block_size < MIN_BLOCK_SIZE {
        return Err(MapGenError::BlockTooSmall {
            block_size: config.block_size,
        });
    }
    let invalid = MapGenError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid);
    }
    let columns = i32::try_from(width).map_err(|_| invalid)?;
    let rows = i32::try_from(height).map_err(|_| invalid)?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut map = TileMap::filled(width, height, TileKind::Road);

    let road = i32::try_from(config.road_width).map_err(|_| invalid)?;
    let block = i32::try_from(config.block_size).map_err(|_| invalid)?;
    let period = usize::try_from(block + road).map_err(|_| invalid)?;

    for top in (road..rows).step_by(period) {
        for left in (road..columns).step_by(period) {
            let origin = GridCoord::new(left, top);
            fill_square(&mut map, origin, block, TileKind::Pavement);

            let lot = origin.offset(1, 1);
            let lot_size = block - 2;
            if rng.gen_bool(config.park_chance) {
                lay_park(&mut map, lot, lot_size);
            } else {
                let side = rng.gen_range(0..4);
                let offset = rng.gen_range(1..lot_size - 1);
                lay_building(&mut map, lot, lot_size, side, offset);
            }
        }
    }

    Ok(map)
}

fn lay_building(map: &mut TileMap, origin: GridCoord, size: i32, door_side: u8, door_offset: i32) {
    fill_square(map, origin, size, TileKind::Interior);
    for cell in perimeter(origin, size) {
        map.set(cell, TileKind::Wall);
    }

    let last = size - 1;
    let door = match door_side {
        0 => origin.offset(door_offset, 0),
        1 => origin.offset(last, door_offset),
        2 => origin.offset(door_offset, last),
        _ => origin.offset(0, door_offset),
    };
    map.set(door, TileKind::Interior);
}

fn lay_park(map: &mut TileMap, origin: GridCoord, size: i32) {
    fill_square(map, origin, size, TileKind::Grass);
    for cell in perimeter(origin, size) {
        map.set(cell, TileKind::Hedge);
    }

    let last = size - 1;
    let middle = size / 2;
    for gate in [
        origin.offset(middle, 0),
        origin.offset(last, middle),
        origin.offset(middle, last),
        origin.offset(0, middle),
    ] {
        map.set(gate, TileKind::Grass);
    }
}

fn fill_square(map: &mut TileMap, origin: GridCoord, size: i32, kind: TileKind) {
    for row in 0..size {
        for column in 0..size {
            map.set(origin.offset(column, row), kind);
        }
    }
}

fn perimeter(origin: GridCoord, size: i32) -> impl Iterator<Item = GridCoord> {
    let last = size - 1;
    (0..size).flat_map(move |step| {
        [
            origin.offset(step, 0),
            origin.offset(step, last),
            origin.offset(0, step),
            origin.offset(last, step),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perimeter_visits_every_border_cell() {
        let cells: std::collections::HashSet<_> = perimeter(GridCoord::new(0, 0), 4).collect();
        assert_eq!(cells.len(), 12);
        assert!(!cells.contains(&GridCoord::new(1, 1)));
        assert!(cells.contains(&GridCoord::new(3, 3)));
    }

    #[test]
    fn rejects_blocks_without_room_for_an_interior() {
        let config = CityConfig::new(1).with_block_size(4);
        assert_eq!(
            generate_city(&config, 16, 16),
            Err(MapGenError::BlockTooSmall { block_size: 4 })
        );
    }

    #[test]
    fn rejects_empty_maps() {
        assert_eq!(
            generate_city(&CityConfig::new(1), 0, 8),
            Err(MapGenError::InvalidDimensions {
                width: 0,
                height: 8
            })
        );
    }
}
