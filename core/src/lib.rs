#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Shamble engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The engine submits [`Command`]
//! values describing desired actor actions, the world executes those commands
//! via its `apply` entry point, and then reports [`Event`] values describing
//! what actually happened. Systems read immutable views such as [`TileMap`]
//! and respond with new commands.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that searches and offsets may step outside the
/// map; validity is always judged against a concrete [`TileMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: i32,
    row: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the coordinate shifted by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(
            self.column.saturating_add(columns),
            self.row.saturating_add(rows),
        )
    }

    /// Returns the neighbouring coordinate in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (columns, rows) = direction.delta();
        self.offset(columns, rows)
    }

    /// Euclidean distance between two coordinates measured in cells.
    #[must_use]
    pub fn distance(self, other: GridCoord) -> f32 {
        let columns = (self.column - other.column) as f32;
        let rows = (self.row - other.row) as f32;
        (columns * columns + rows * rows).sqrt()
    }
}

/// Cardinal movement directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Column and row delta covered by a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Discrete commands produced by the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCommand {
    /// Walk or attack toward decreasing columns.
    Left,
    /// Walk or attack toward decreasing rows.
    Up,
    /// Walk or attack toward increasing columns.
    Right,
    /// Walk or attack toward increasing rows.
    Down,
    /// Spend the turn without acting.
    Skip,
}

impl InputCommand {
    /// Direction associated with the command, or `None` for [`InputCommand::Skip`].
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Left => Some(Direction::West),
            Self::Up => Some(Direction::North),
            Self::Right => Some(Direction::East),
            Self::Down => Some(Direction::South),
            Self::Skip => None,
        }
    }
}

/// Classification of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Building floor.
    Interior,
    /// Building wall.
    Wall,
    /// Street surface.
    Road,
    /// Sidewalk bordering the streets.
    Pavement,
    /// Park lawn.
    Grass,
    /// Park hedge.
    Hedge,
    /// Sentinel returned for coordinates outside the map.
    Invalid,
}

impl TileKind {
    /// Reports whether the tile blocks both movement and line of sight.
    #[must_use]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Wall | Self::Hedge | Self::Invalid)
    }

    /// Index of the tile's image inside the tileset strip.
    ///
    /// `Invalid` has no image and is never drawn.
    #[must_use]
    pub const fn tileset_index(self) -> Option<u32> {
        match self {
            Self::Interior => Some(0),
            Self::Wall => Some(1),
            Self::Road => Some(2),
            Self::Pavement => Some(3),
            Self::Grass => Some(4),
            Self::Hedge => Some(5),
            Self::Invalid => None,
        }
    }

    /// Character used by the textual map notation accepted by [`TileMap::from_rows`].
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Interior => '.',
            Self::Wall => '#',
            Self::Road => '=',
            Self::Pavement => '_',
            Self::Grass => ',',
            Self::Hedge => '%',
            Self::Invalid => '?',
        }
    }

    /// Parses a character of the textual map notation.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Interior),
            '#' => Some(Self::Wall),
            '=' => Some(Self::Road),
            '_' => Some(Self::Pavement),
            ',' => Some(Self::Grass),
            '%' => Some(Self::Hedge),
            _ => None,
        }
    }
}

/// Dense, immutable-size grid of tile kinds stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl TileMap {
    /// Creates a map of the provided size with every cell set to `fill`.
    #[must_use]
    pub fn filled(width: u32, height: u32, fill: TileKind) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![fill; capacity],
        }
    }

    /// Parses a map from rows of the textual notation described by [`TileKind::symbol`].
    ///
    /// Every row must have the same length and contain only known symbols.
    pub fn from_rows(rows: &[&str]) -> Result<Self, TileMapError> {
        let height = u32::try_from(rows.len()).map_err(|_| TileMapError::TooLarge)?;
        let width = rows.first().map_or(0, |row| row.chars().count());
        let width = u32::try_from(width).map_err(|_| TileMapError::TooLarge)?;

        let mut tiles = Vec::with_capacity(rows.len() * width as usize);
        for (row_index, row) in rows.iter().enumerate() {
            let before = tiles.len();
            for (column_index, symbol) in row.chars().enumerate() {
                let kind = TileKind::from_symbol(symbol).ok_or(TileMapError::UnknownSymbol {
                    symbol,
                    column: column_index,
                    row: row_index,
                })?;
                tiles.push(kind);
            }
            if tiles.len() - before != width as usize {
                return Err(TileMapError::RaggedRow { row: row_index });
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Number of columns contained in the map.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the map.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell closest to the geometric center of the map.
    #[must_use]
    pub const fn center(&self) -> GridCoord {
        GridCoord::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Reports whether the coordinate lies inside the map.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Tile stored at the coordinate, or [`TileKind::Invalid`] outside the map.
    #[must_use]
    pub fn tile_at(&self, coord: GridCoord) -> TileKind {
        self.index(coord)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(TileKind::Invalid)
    }

    /// Reports whether the coordinate holds an obstacle. Out-of-bounds cells always do.
    #[must_use]
    pub fn is_obstacle(&self, coord: GridCoord) -> bool {
        self.tile_at(coord).is_obstacle()
    }

    /// Overwrites the tile at the coordinate. Out-of-bounds writes are ignored.
    pub fn set(&mut self, coord: GridCoord, kind: TileKind) {
        if let Some(slot) = self.index(coord).and_then(|index| self.tiles.get_mut(index)) {
            *slot = kind;
        }
    }

    /// Renders the map back into the textual notation, one string per row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        let width = self.width as usize;
        if width == 0 {
            return vec![String::new(); self.height as usize];
        }
        self.tiles
            .chunks(width)
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        let column = u32::try_from(coord.column()).ok()?;
        let row = u32::try_from(coord.row()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
    }
}

/// Reasons a textual map could not be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMapError {
    /// A character outside the notation was found.
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// A row differs in length from the first row.
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
    },
    /// The map does not fit the coordinate space.
    TooLarge,
}

impl fmt::Display for TileMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSymbol {
                symbol,
                column,
                row,
            } => write!(f, "unknown tile symbol {symbol:?} at column {column}, row {row}"),
            Self::RaggedRow { row } => write!(f, "row {row} differs in length from the first row"),
            Self::TooLarge => write!(f, "map dimensions exceed the coordinate space"),
        }
    }
}

impl Error for TileMapError {}

/// Half-open range of cells visible through the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileWindow {
    start: GridCoord,
    end: GridCoord,
}

impl TileWindow {
    /// Creates a window spanning `start` inclusive to `end` exclusive on both axes.
    #[must_use]
    pub const fn new(start: GridCoord, end: GridCoord) -> Self {
        Self { start, end }
    }

    /// First cell inside the window.
    #[must_use]
    pub const fn start(&self) -> GridCoord {
        self.start
    }

    /// Exclusive end of the window on both axes.
    #[must_use]
    pub const fn end(&self) -> GridCoord {
        self.end
    }

    /// Reports whether the coordinate lies inside the window.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.column() >= self.start.column()
            && coord.column() < self.end.column()
            && coord.row() >= self.start.row()
            && coord.row() < self.end.row()
    }

    /// Number of cells covered by the window.
    #[must_use]
    pub fn len(&self) -> usize {
        let columns = (self.end.column() - self.start.column()).max(0) as usize;
        let rows = (self.end.row() - self.start.row()).max(0) as usize;
        columns * rows
    }

    /// Reports whether the window covers no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the window column by column, each column top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> {
        let rows = self.start.row()..self.end.row();
        (self.start.column()..self.end.column())
            .flat_map(move |column| rows.clone().map(move |row| GridCoord::new(column, row)))
    }
}

/// Side of the turn cycle that is currently allowed to act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The player chooses and resolves one action.
    Player,
    /// Every enemy resolves one action.
    Ai,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifies any actor occupying the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorId {
    /// The single player character.
    Player,
    /// An AI-controlled enemy.
    Enemy(EnemyId),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places the player on the free field nearest to `near`.
    SpawnPlayer {
        /// Preferred cell for the player.
        near: GridCoord,
    },
    /// Places a new enemy on the free field nearest to `near`.
    SpawnEnemy {
        /// Preferred cell for the enemy.
        near: GridCoord,
    },
    /// Moves an actor one cell, or attacks whoever occupies the destination.
    Step {
        /// Actor performing the step.
        actor: ActorId,
        /// Direction of the step.
        direction: Direction,
    },
    /// Spends an actor's action without moving.
    Wait {
        /// Actor that waits.
        actor: ActorId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player was placed on the grid.
    PlayerSpawned {
        /// Cell the player occupies.
        cell: GridCoord,
    },
    /// Confirms that an enemy was placed on the grid.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Cell the enemy occupies.
        cell: GridCoord,
    },
    /// Reports that a spawn request could not be satisfied.
    SpawnRejected {
        /// Preferred cell supplied with the request.
        near: GridCoord,
        /// Reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that an actor moved between two cells.
    ActorMoved {
        /// Actor that moved.
        actor: ActorId,
        /// Cell occupied before the move.
        from: GridCoord,
        /// Cell occupied after the move.
        to: GridCoord,
    },
    /// Reports that an actor stepped into another actor.
    ActorAttacked {
        /// Actor that initiated the attack.
        attacker: ActorId,
        /// Actor occupying the destination.
        target: ActorId,
        /// Destination cell.
        cell: GridCoord,
    },
    /// Confirms that an actor spent its action waiting.
    ActorWaited {
        /// Actor that waited.
        actor: ActorId,
    },
    /// Reports that a step could not be performed.
    StepRejected {
        /// Actor that attempted the step.
        actor: ActorId,
        /// Direction of the attempted step.
        direction: Direction,
        /// Reason the step failed.
        reason: StepError,
    },
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// No free field exists within the search radius of the requested cell.
    NoFreeField {
        /// Largest ring radius that was scanned.
        radius: u32,
    },
    /// The player already exists.
    PlayerExists,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreeField { radius } => {
                write!(f, "no free field within {radius} cells")
            }
            Self::PlayerExists => write!(f, "the player has already been spawned"),
        }
    }
}

impl Error for SpawnError {}

/// Reasons a step request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepError {
    /// The destination is a wall, hedge, or lies outside the map.
    Obstacle,
    /// The actor does not exist.
    MissingActor,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Obstacle => write!(f, "the destination is blocked"),
            Self::MissingActor => write!(f, "the actor does not exist"),
        }
    }
}

impl Error for StepError {}
