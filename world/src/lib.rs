#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Shamble.
//!
//! The world owns the tile map, the bodies of every actor and the occupancy
//! grid that keeps them consistent. All mutations flow through [`apply`];
//! reads go through the [`query`] module.

mod occupancy;
mod search;

use shamble_core::{
    ActorId, Command, Direction, EnemyId, Event, GridCoord, SpawnError, StepError, TileMap,
};

use self::occupancy::OccupancyGrid;

pub use self::search::FREE_FIELD_SEARCH_RADIUS;

const INITIAL_FACING: Direction = Direction::East;

/// Represents the authoritative Shamble world state.
#[derive(Debug)]
pub struct World {
    tiles: TileMap,
    occupancy: OccupancyGrid,
    player: Option<Body>,
    enemies: Vec<EnemyBody>,
    next_enemy_id: u32,
}

impl World {
    /// Creates an empty world over the provided map.
    #[must_use]
    pub fn new(tiles: TileMap) -> Self {
        let occupancy = OccupancyGrid::new(tiles.width(), tiles.height());
        Self {
            tiles,
            occupancy,
            player: None,
            enemies: Vec::new(),
            next_enemy_id: 0,
        }
    }

    fn body(&self, actor: ActorId) -> Option<&Body> {
        match actor {
            ActorId::Player => self.player.as_ref(),
            ActorId::Enemy(id) => self
                .enemies
                .iter()
                .find(|enemy| enemy.id == id)
                .map(|enemy| &enemy.body),
        }
    }

    fn body_mut(&mut self, actor: ActorId) -> Option<&mut Body> {
        match actor {
            ActorId::Player => self.player.as_mut(),
            ActorId::Enemy(id) => self
                .enemies
                .iter_mut()
                .find(|enemy| enemy.id == id)
                .map(|enemy| &mut enemy.body),
        }
    }

    fn is_free_field(&self, cell: GridCoord) -> bool {
        !self.tiles.is_obstacle(cell) && self.occupancy.occupant(cell).is_none()
    }

    fn find_free_field(&self, origin: GridCoord) -> Result<GridCoord, SpawnError> {
        search::find_free_field(origin, |cell| self.is_free_field(cell))
    }

    fn step(&mut self, actor: ActorId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(from) = self.body(actor).map(|body| body.cell) else {
            tracing::warn!(?actor, reason = %StepError::MissingActor, "step rejected");
            out_events.push(Event::StepRejected {
                actor,
                direction,
                reason: StepError::MissingActor,
            });
            return;
        };

        if let Some(body) = self.body_mut(actor) {
            body.facing = direction;
        }

        let to = from.step(direction);
        if self.tiles.is_obstacle(to) {
            out_events.push(Event::StepRejected {
                actor,
                direction,
                reason: StepError::Obstacle,
            });
            return;
        }

        if let Some(target) = self.occupancy.occupant(to) {
            out_events.push(Event::ActorAttacked {
                attacker: actor,
                target,
                cell: to,
            });
            return;
        }

        self.occupancy.vacate(from);
        self.occupancy.occupy(actor, to);
        if let Some(body) = self.body_mut(actor) {
            body.cell = to;
        }
        out_events.push(Event::ActorMoved { actor, from, to });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnPlayer { near } => {
            if world.player.is_some() {
                out_events.push(Event::SpawnRejected {
                    near,
                    reason: SpawnError::PlayerExists,
                });
                return;
            }

            match world.find_free_field(near) {
                Ok(cell) => {
                    world.occupancy.occupy(ActorId::Player, cell);
                    world.player = Some(Body::at(cell));
                    out_events.push(Event::PlayerSpawned { cell });
                }
                Err(reason) => out_events.push(Event::SpawnRejected { near, reason }),
            }
        }
        Command::SpawnEnemy { near } => match world.find_free_field(near) {
            Ok(cell) => {
                let enemy = EnemyId::new(world.next_enemy_id);
                world.next_enemy_id = world.next_enemy_id.saturating_add(1);
                world.occupancy.occupy(ActorId::Enemy(enemy), cell);
                world.enemies.push(EnemyBody {
                    id: enemy,
                    body: Body::at(cell),
                });
                out_events.push(Event::EnemySpawned { enemy, cell });
            }
            Err(reason) => out_events.push(Event::SpawnRejected { near, reason }),
        },
        Command::Step { actor, direction } => world.step(actor, direction, out_events),
        Command::Wait { actor } => {
            if world.body(actor).is_some() {
                out_events.push(Event::ActorWaited { actor });
            } else {
                tracing::warn!(?actor, "wait requested for an actor that does not exist");
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use shamble_core::{ActorId, Direction, EnemyId, GridCoord, SpawnError, TileMap};

    /// Provides read-only access to the world's tile map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.tiles
    }

    /// Reports whether the cell holds a wall, a hedge, or lies outside the map.
    #[must_use]
    pub fn is_obstacle(world: &World, cell: GridCoord) -> bool {
        world.tiles.is_obstacle(cell)
    }

    /// Reports whether the cell is passable and not occupied by any actor.
    #[must_use]
    pub fn is_free_field(world: &World, cell: GridCoord) -> bool {
        world.is_free_field(cell)
    }

    /// Finds the free field nearest to `origin` by the expanding-ring scan.
    pub fn find_free_field(world: &World, origin: GridCoord) -> Result<GridCoord, SpawnError> {
        world.find_free_field(origin)
    }

    /// Cell currently occupied by the player, if it has been spawned.
    #[must_use]
    pub fn player_cell(world: &World) -> Option<GridCoord> {
        world.player.as_ref().map(|body| body.cell)
    }

    /// Cell currently occupied by the actor, if it exists.
    #[must_use]
    pub fn actor_cell(world: &World, actor: ActorId) -> Option<GridCoord> {
        world.body(actor).map(|body| body.cell)
    }

    /// Direction the actor last stepped or attacked toward.
    #[must_use]
    pub fn actor_facing(world: &World, actor: ActorId) -> Option<Direction> {
        world.body(actor).map(|body| body.facing)
    }

    /// Identifiers of every enemy in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemyId> {
        world.enemies.iter().map(|enemy| enemy.id).collect()
    }

    /// Enemy standing on the cell, if any.
    #[must_use]
    pub fn enemy_at(world: &World, cell: GridCoord) -> Option<EnemyId> {
        match world.occupancy.occupant(cell) {
            Some(ActorId::Enemy(enemy)) => Some(enemy),
            _ => None,
        }
    }

    /// Actor standing on the cell, enemies taking precedence over the player.
    #[must_use]
    pub fn actor_at(world: &World, cell: GridCoord) -> Option<ActorId> {
        if let Some(enemy) = enemy_at(world, cell) {
            return Some(ActorId::Enemy(enemy));
        }
        world.occupancy.occupant(cell)
    }

    /// Number of cells currently holding an actor.
    #[must_use]
    pub fn occupied_cells(world: &World) -> usize {
        world.occupancy.occupied_count()
    }
}

#[derive(Clone, Copy, Debug)]
struct Body {
    cell: GridCoord,
    facing: Direction,
}

impl Body {
    const fn at(cell: GridCoord) -> Self {
        Self {
            cell,
            facing: INITIAL_FACING,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct EnemyBody {
    id: EnemyId,
    body: Body,
}
