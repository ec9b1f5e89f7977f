#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based simulation engine for Shamble.
//!
//! [`Simulation`] owns the world, the actors that steer its bodies, the turn
//! scheduler, the fog of war and the camera. A frontend drives it once per
//! frame through the [`FrameHandler`] contract: deliver input, update, render.

mod actor;
mod animation;
mod camera;
mod config;
mod tileset;

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shamble_core::{Command, Event, GridCoord, InputCommand, SpawnError, TileWindow, TurnPhase};
use shamble_rendering::{Canvas, Color, FrameHandler, PixelRect, ResourceProvider};
use shamble_system_mapgen::{generate_city, CityConfig, MapGenError};
use shamble_system_turns::{PhaseChange, TurnError, TurnParticipants, TurnScheduler};
use shamble_system_visibility::{FogMap, Visibility};
use shamble_system_wander::{self as wander, Wander};
use shamble_world::{apply, query, World};
use thiserror::Error;

pub use self::actor::{
    Actor, ActorSprite, Enemy, Player, ENEMY_COLOR, IDLE_FRAME_DELAY, PLAYER_COLOR,
};
pub use self::animation::{Animation, AnimationState};
pub use self::camera::{grid_to_world, Camera};
pub use self::config::{ConfigError, SimulationConfig, DEFAULT_SEED};
pub use self::tileset::{tile_color, Tileset};

/// Resource name of the tile strip.
pub const TILESET_RESOURCE: &str = "tileset";
/// Resource name of the left-facing player strip.
pub const HERO_LEFT_RESOURCE: &str = "hero_l";
/// Resource name of the right-facing player strip.
pub const HERO_RIGHT_RESOURCE: &str = "hero_r";
/// Resource name of the left-facing enemy strip.
pub const ZOMBIE_LEFT_RESOURCE: &str = "zombie_l";
/// Resource name of the right-facing enemy strip.
pub const ZOMBIE_RIGHT_RESOURCE: &str = "zombie_r";

const LOADING_BAR_SIZE: Vec2 = Vec2::new(200.0, 16.0);
const LOADING_BAR_COLOR: Color = Color::from_rgb_u8(0x88, 0x88, 0x88);

/// Errors raised while building or advancing a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration was rejected.
    #[error("invalid simulation config")]
    Config(#[from] ConfigError),
    /// The map generator could not build a map.
    #[error("map generation failed: {0}")]
    MapGeneration(#[from] MapGenError),
    /// The player could not be placed on the map.
    #[error("could not place the player near {near:?}")]
    PlayerPlacement {
        /// Cell the search started from.
        near: GridCoord,
        /// Reason the world gave.
        #[source]
        reason: SpawnError,
    },
    /// The turn scheduler rejected a transition.
    #[error("turn scheduling failed")]
    Turn(#[from] TurnError),
}

/// Complete state of a running simulation.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    player: Player,
    enemies: Vec<Enemy>,
    scheduler: TurnScheduler,
    visibility: Visibility,
    fog: FogMap,
    camera: Camera,
    tileset: Option<Tileset>,
    events: Vec<Event>,
    last_phase_change: Option<PhaseChange>,
    visibility_refreshes: u64,
    ticks: u64,
}

impl Simulation {
    /// Generates a city from `config` and populates it.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let city = CityConfig::new(config.seed);
        let map = generate_city(&city, config.map_width, config.map_height)?;
        Self::with_world(config, World::new(map))
    }

    /// Populates a prepared world.
    ///
    /// The player is placed on the free field nearest the map center, then
    /// `config.enemy_count` enemies are placed near random cells. Enemies
    /// without a free field nearby are skipped.
    pub fn with_world(config: SimulationConfig, mut world: World) -> Result<Self, SimulationError> {
        config.validate()?;

        let tiles = query::tile_map(&world);
        let (width, height) = (tiles.width(), tiles.height());
        let center = tiles.center();

        let mut events = Vec::new();
        apply(&mut world, Command::SpawnPlayer { near: center }, &mut events);
        if let Some(Event::SpawnRejected { reason, .. }) = events.first() {
            return Err(SimulationError::PlayerPlacement {
                near: center,
                reason: *reason,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let enemies = spawn_enemies(&mut world, &config, &mut rng, width, height);

        let field_size = config.field_size as f32;
        let mut simulation = Self {
            visibility: Visibility::new(field_size, config.visibility_range),
            fog: FogMap::new(width, height),
            camera: Camera::new(config.viewport_width as f32, config.viewport_height as f32),
            config,
            world,
            player: Player::new(),
            enemies,
            scheduler: TurnScheduler::new(),
            tileset: None,
            events: Vec::new(),
            last_phase_change: None,
            visibility_refreshes: 0,
            ticks: 0,
        };

        simulation.player.take_turn();
        simulation.focus_camera();
        simulation.refresh_visibility();

        tracing::info!(
            width,
            height,
            enemies = simulation.enemies.len(),
            player = ?query::player_cell(&simulation.world),
            "simulation started"
        );
        Ok(simulation)
    }

    /// Configuration the simulation was built from.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only access to the world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The player actor.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Every enemy actor in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Current fog of war.
    #[must_use]
    pub const fn fog(&self) -> &FogMap {
        &self.fog
    }

    /// Current camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Currently active turn phase.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.scheduler.phase()
    }

    /// Number of rounds the enemies have been ordered to play.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.scheduler.round()
    }

    /// Number of ticks the current phase has lasted.
    #[must_use]
    pub const fn ticks_in_phase(&self) -> u64 {
        self.scheduler.ticks_in_phase()
    }

    /// Number of completed [`Simulation::update`] calls.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of fog refreshes performed, including the initial one.
    #[must_use]
    pub const fn visibility_refreshes(&self) -> u64 {
        self.visibility_refreshes
    }

    /// Phase change performed by the most recent update, if any.
    #[must_use]
    pub const fn last_phase_change(&self) -> Option<PhaseChange> {
        self.last_phase_change
    }

    /// Events produced by the most recent update.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Reports whether the simulation is waiting for the player to act.
    #[must_use]
    pub fn awaiting_player_input(&self) -> bool {
        self.scheduler.phase() == TurnPhase::Player && !self.player.is_turn_finished()
    }

    /// Cells currently covered by the camera.
    #[must_use]
    pub fn tile_window(&self) -> TileWindow {
        let tiles = query::tile_map(&self.world);
        self.camera
            .tile_window(self.field_size(), tiles.width(), tiles.height())
    }

    /// Routes an input command to the player.
    pub fn handle_input(&mut self, command: InputCommand) {
        if !self.player.handle_input(command) {
            tracing::trace!(?command, "input ignored outside the player's turn");
        }
    }

    /// Resizes the camera and recenters it on the player.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        self.focus_camera();
    }

    /// Attaches loaded images to the tileset and actor sprites.
    pub fn bind_resources(&mut self, resources: &dyn ResourceProvider) {
        let size = self.config.field_size;
        self.tileset = Some(Tileset::new(resources.resource(TILESET_RESOURCE), size, size));
        self.player.sprite_mut().bind(
            resources.resource(HERO_LEFT_RESOURCE),
            resources.resource(HERO_RIGHT_RESOURCE),
            size,
        );
        let zombie_left = resources.resource(ZOMBIE_LEFT_RESOURCE);
        let zombie_right = resources.resource(ZOMBIE_RIGHT_RESOURCE);
        for enemy in &mut self.enemies {
            enemy.sprite_mut().bind(zombie_left, zombie_right, size);
        }
    }

    /// Reports whether [`Simulation::bind_resources`] has run.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.tileset.is_some()
    }

    /// Advances sprite animations by `dt`.
    pub fn animate(&mut self, dt: Duration) {
        self.player.sprite_mut().update(dt);
        for enemy in &mut self.enemies {
            enemy.sprite_mut().update(dt);
        }
    }

    /// Runs one tick: player, camera, enemies, then the turn scheduler.
    pub fn update(&mut self) -> Result<(), SimulationError> {
        self.events.clear();

        self.player.update(&mut self.world, &mut self.events);
        self.focus_camera();
        for enemy in &mut self.enemies {
            enemy.update(&mut self.world, &mut self.events);
        }

        let field_size = self.field_size();
        let mut participants = Participants {
            world: &self.world,
            player: &mut self.player,
            enemies: &mut self.enemies,
            visibility: &self.visibility,
            fog: &mut self.fog,
            window: self.camera.tile_window(
                field_size,
                query::tile_map(&self.world).width(),
                query::tile_map(&self.world).height(),
            ),
            refreshes: &mut self.visibility_refreshes,
        };
        self.last_phase_change = self.scheduler.step(&mut participants)?;
        self.ticks = self.ticks.saturating_add(1);

        for event in &self.events {
            if let Event::ActorAttacked {
                attacker, target, ..
            } = event
            {
                tracing::debug!(?attacker, ?target, "attack");
            }
        }
        Ok(())
    }

    /// Draws tiles, actors and the fog overlay inside the camera window.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        let field_size = self.field_size();
        let window = self.tile_window();
        let tiles = query::tile_map(&self.world);
        let tileset = self
            .tileset
            .unwrap_or_else(|| Tileset::new(None, self.config.field_size, self.config.field_size));

        for cell in window.iter() {
            tileset.draw_tile(canvas, tiles.tile_at(cell), self.screen_position(cell));
        }

        self.player.render(&self.world, &self.camera, field_size, canvas);
        for enemy in &self.enemies {
            enemy.render(&self.world, &self.camera, field_size, canvas);
        }

        for cell in window.iter() {
            let position = self.screen_position(cell);
            canvas.fill_rect(
                PixelRect::from_origin_and_size(position, Vec2::splat(field_size)),
                Color::BLACK.with_alpha(self.fog.fog(cell)),
            );
        }
    }

    /// Draws the loading bar centered in the camera.
    pub fn render_loading(&self, canvas: &mut dyn Canvas, progress: f32) {
        let origin = ((self.camera.size() - LOADING_BAR_SIZE) / 2.0).floor();
        let filled = LOADING_BAR_SIZE.x * progress.clamp(0.0, 1.0);
        canvas.fill_rect(
            PixelRect::from_origin_and_size(origin, Vec2::new(filled, LOADING_BAR_SIZE.y)),
            LOADING_BAR_COLOR,
        );

        let Vec2 { x, y } = origin;
        let Vec2 {
            x: width,
            y: height,
        } = LOADING_BAR_SIZE;
        for edge in [
            PixelRect::new(x, y, width, 1.0),
            PixelRect::new(x, y + height - 1.0, width, 1.0),
            PixelRect::new(x, y, 1.0, height),
            PixelRect::new(x + width - 1.0, y, 1.0, height),
        ] {
            canvas.fill_rect(edge, LOADING_BAR_COLOR);
        }
    }

    fn field_size(&self) -> f32 {
        self.config.field_size as f32
    }

    fn screen_position(&self, cell: GridCoord) -> Vec2 {
        self.camera.world_to_screen(grid_to_world(cell, self.field_size()))
    }

    fn focus_camera(&mut self) {
        let Some(cell) = query::player_cell(&self.world) else {
            return;
        };
        let tiles = query::tile_map(&self.world);
        let world_size = Vec2::new(tiles.width() as f32, tiles.height() as f32) * self.field_size();
        self.camera.focus(grid_to_world(cell, self.field_size()), world_size);
    }

    fn refresh_visibility(&mut self) {
        let window = self.tile_window();
        let mut participants = Participants {
            world: &self.world,
            player: &mut self.player,
            enemies: &mut self.enemies,
            visibility: &self.visibility,
            fog: &mut self.fog,
            window,
            refreshes: &mut self.visibility_refreshes,
        };
        participants.refresh_visibility();
    }
}

impl FrameHandler for Simulation {
    fn on_input(&mut self, command: InputCommand) {
        self.handle_input(command);
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.resize(width, height);
    }

    fn frame(&mut self, dt: Duration, canvas: &mut dyn Canvas, resources: &dyn ResourceProvider) {
        if !resources.is_fully_loaded() {
            self.render_loading(canvas, resources.progress());
            return;
        }
        if !self.is_bound() {
            self.bind_resources(resources);
        }

        self.animate(dt);
        if let Err(error) = self.update() {
            tracing::error!(%error, "simulation update failed");
        }
        self.render(canvas);
    }
}

struct Participants<'a> {
    world: &'a World,
    player: &'a mut Player,
    enemies: &'a mut [Enemy],
    visibility: &'a Visibility,
    fog: &'a mut FogMap,
    window: TileWindow,
    refreshes: &'a mut u64,
}

impl TurnParticipants for Participants<'_> {
    fn player_turn_finished(&self) -> bool {
        self.player.is_turn_finished()
    }

    fn enemies_turn_finished(&self) -> bool {
        self.enemies.iter().all(Actor::is_turn_finished)
    }

    fn enemies_take_turn(&mut self) {
        for enemy in self.enemies.iter_mut() {
            enemy.take_turn();
        }
    }

    fn refresh_visibility(&mut self) {
        let Some(viewer) = query::player_cell(self.world) else {
            return;
        };
        let world = self.world;
        let written = self
            .visibility
            .refresh(self.fog, self.window, viewer, |cell| query::is_obstacle(world, cell));
        *self.refreshes = self.refreshes.saturating_add(1);
        tracing::trace!(?viewer, written, "fog refreshed");
    }

    fn player_take_turn(&mut self) {
        self.player.take_turn();
    }
}

fn spawn_enemies(
    world: &mut World,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
    width: u32,
    height: u32,
) -> Vec<Enemy> {
    let mut enemies = Vec::new();
    let mut events = Vec::new();
    let columns = i32::try_from(width).unwrap_or(i32::MAX);
    let rows = i32::try_from(height).unwrap_or(i32::MAX);

    let attempts = u64::from(config.enemy_count).min(u64::from(width) * u64::from(height));
    for _ in 0..attempts {
        let near = GridCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        events.clear();
        apply(world, Command::SpawnEnemy { near }, &mut events);

        match events.first() {
            Some(Event::EnemySpawned { enemy, .. }) => {
                let brain = Wander::new(wander::Config::new(rng.gen(), config.enemy_wait_chance));
                enemies.push(Enemy::new(*enemy, brain));
            }
            Some(Event::SpawnRejected { reason, .. }) => {
                tracing::warn!(?near, %reason, "enemy skipped");
            }
            _ => {}
        }
    }

    enemies
}
