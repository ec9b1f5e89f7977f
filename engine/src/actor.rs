//! Turn-taking actors that drive bodies owned by the world.

use std::time::Duration;

use glam::Vec2;
use shamble_core::{
    ActorId, Command, Direction, EnemyId, Event, GridCoord, InputCommand, StepError,
};
use shamble_rendering::{Canvas, Color, ImageHandle, PixelRect};
use shamble_system_wander::Wander;
use shamble_world::{apply, query, World};

use crate::{animation::Animation, camera::grid_to_world, Camera};

/// Delay between idle animation frames.
pub const IDLE_FRAME_DELAY: Duration = Duration::from_millis(200);

/// Color drawn for the player when its sprites are unavailable.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0x30, 0x60, 0xE0);

/// Color drawn for enemies when their sprites are unavailable.
pub const ENEMY_COLOR: Color = Color::from_rgb_u8(0x60, 0x90, 0x30);

/// Common behaviour of everything that takes turns on the grid.
pub trait Actor {
    /// Identity of the body this actor controls.
    fn id(&self) -> ActorId;

    /// Starts a new turn.
    fn take_turn(&mut self);

    /// Reports whether the current turn has been resolved.
    fn is_turn_finished(&self) -> bool;

    /// Resolves at most one action against the world.
    fn update(&mut self, world: &mut World, out_events: &mut Vec<Event>);

    /// Sprite used to draw the actor.
    fn sprite(&self) -> &ActorSprite;

    /// Mutable access to the sprite.
    fn sprite_mut(&mut self) -> &mut ActorSprite;

    /// Cell the actor's body occupies.
    fn position(&self, world: &World) -> Option<GridCoord> {
        query::actor_cell(world, self.id())
    }

    /// Draws the actor relative to `camera`.
    fn render(&self, world: &World, camera: &Camera, field_size: f32, canvas: &mut dyn Canvas) {
        let Some(cell) = self.position(world) else {
            return;
        };
        let screen = camera.world_to_screen(grid_to_world(cell, field_size));
        self.sprite().render(canvas, screen, field_size);
    }
}

/// Pair of looping idle animations for the two horizontal facings.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSprite {
    left: Animation,
    right: Animation,
    faces_left: bool,
    fallback: Color,
}

impl ActorSprite {
    /// Creates a sprite without images that draws a `fallback` square.
    #[must_use]
    pub fn new(fallback: Color) -> Self {
        Self {
            left: Animation::new(None, IDLE_FRAME_DELAY, 0, 0),
            right: Animation::new(None, IDLE_FRAME_DELAY, 0, 0),
            faces_left: false,
            fallback,
        }
    }

    /// Attaches the left- and right-facing strips and starts looping them.
    pub fn bind(&mut self, left: Option<ImageHandle>, right: Option<ImageHandle>, frame_size: u32) {
        self.left = Animation::new(left, IDLE_FRAME_DELAY, frame_size, frame_size);
        self.right = Animation::new(right, IDLE_FRAME_DELAY, frame_size, frame_size);
        self.left.start_looping(None);
        self.right.start_looping(None);
    }

    /// Reports whether the sprite currently faces left.
    #[must_use]
    pub const fn faces_left(&self) -> bool {
        self.faces_left
    }

    /// Turns toward `direction`. Vertical directions keep the horizontal facing.
    pub fn face(&mut self, direction: Direction) {
        match direction {
            Direction::West => self.faces_left = true,
            Direction::East => self.faces_left = false,
            Direction::North | Direction::South => {}
        }
    }

    /// Advances both animations.
    pub fn update(&mut self, dt: Duration) {
        self.left.update(dt);
        self.right.update(dt);
    }

    /// Draws the sprite with its upper-left corner at `position`.
    ///
    /// When only the opposite strip is loaded it is drawn mirrored.
    pub fn render(&self, canvas: &mut dyn Canvas, position: Vec2, field_size: f32) {
        let (facing, mirrored) = if self.faces_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        if facing.frame_count() > 0 {
            facing.render(canvas, position, false);
        } else if mirrored.frame_count() > 0 {
            mirrored.render(canvas, position, true);
        } else {
            let inset = field_size / 8.0;
            let size = field_size - 2.0 * inset;
            canvas.fill_rect(
                PixelRect::from_origin_and_size(position + inset, Vec2::splat(size)),
                self.fallback,
            );
        }
    }
}

/// Actor steered by player input.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    turn_finished: bool,
    intent: Option<InputCommand>,
    sprite: ActorSprite,
}

impl Player {
    /// Creates a player whose turn has not started yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            turn_finished: true,
            intent: None,
            sprite: ActorSprite::new(PLAYER_COLOR),
        }
    }

    /// Records the action to resolve on the next update.
    ///
    /// Input is only accepted while the player's turn is running; the most
    /// recent command wins. Returns whether the command was accepted.
    pub fn handle_input(&mut self, command: InputCommand) -> bool {
        if self.turn_finished {
            return false;
        }
        self.intent = Some(command);
        true
    }

    /// Pending action, if any.
    #[must_use]
    pub const fn intent(&self) -> Option<InputCommand> {
        self.intent
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for Player {
    fn id(&self) -> ActorId {
        ActorId::Player
    }

    fn take_turn(&mut self) {
        self.turn_finished = false;
        self.intent = None;
    }

    fn is_turn_finished(&self) -> bool {
        self.turn_finished
    }

    /// Walks, attacks or skips according to the pending intent.
    ///
    /// Walking into an obstacle turns the player but keeps the turn open.
    fn update(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        if self.turn_finished {
            return;
        }
        let Some(intent) = self.intent.take() else {
            return;
        };

        let command = match intent.direction() {
            Some(direction) => Command::Step {
                actor: ActorId::Player,
                direction,
            },
            None => Command::Wait {
                actor: ActorId::Player,
            },
        };

        let first = out_events.len();
        apply(world, command, out_events);
        let bumped = out_events[first..].iter().any(|event| {
            matches!(
                event,
                Event::StepRejected {
                    reason: StepError::Obstacle,
                    ..
                }
            )
        });

        if let Some(facing) = query::actor_facing(world, ActorId::Player) {
            self.sprite.face(facing);
        }
        if !bumped {
            self.turn_finished = true;
        }
    }

    fn sprite(&self) -> &ActorSprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut ActorSprite {
        &mut self.sprite
    }
}

/// Actor steered by a [`Wander`] brain.
#[derive(Debug)]
pub struct Enemy {
    id: EnemyId,
    turn_finished: bool,
    brain: Wander,
    sprite: ActorSprite,
}

impl Enemy {
    /// Creates an enemy that is idle until ordered to take a turn.
    #[must_use]
    pub fn new(id: EnemyId, brain: Wander) -> Self {
        Self {
            id,
            turn_finished: true,
            brain,
            sprite: ActorSprite::new(ENEMY_COLOR),
        }
    }

    /// Identifier of the body this enemy controls.
    #[must_use]
    pub const fn enemy_id(&self) -> EnemyId {
        self.id
    }
}

impl Actor for Enemy {
    fn id(&self) -> ActorId {
        ActorId::Enemy(self.id)
    }

    fn take_turn(&mut self) {
        self.turn_finished = false;
    }

    fn is_turn_finished(&self) -> bool {
        self.turn_finished
    }

    /// Chooses and resolves one action. Any outcome ends the turn.
    fn update(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        if self.turn_finished {
            return;
        }

        let actor = self.id();
        if let Some(cell) = query::actor_cell(world, actor) {
            let quarry = query::player_cell(world);
            let command = self.brain.choose(actor, cell, quarry, |candidate| {
                query::is_free_field(world, candidate)
            });
            apply(world, command, out_events);
            if let Some(facing) = query::actor_facing(world, actor) {
                self.sprite.face(facing);
            }
        }
        self.turn_finished = true;
    }

    fn sprite(&self) -> &ActorSprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut ActorSprite {
        &mut self.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shamble_core::TileMap;
    use shamble_system_wander::Config;

    fn world_with_player(rows: &[&str], at: GridCoord) -> World {
        let mut world = World::new(TileMap::from_rows(rows).expect("valid map"));
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnPlayer { near: at }, &mut events);
        assert_eq!(events, vec![Event::PlayerSpawned { cell: at }]);
        world
    }

    #[test]
    fn input_is_ignored_outside_the_players_turn() {
        let mut player = Player::new();
        assert!(!player.handle_input(InputCommand::Left));
        player.take_turn();
        assert!(player.handle_input(InputCommand::Left));
        assert!(player.handle_input(InputCommand::Up));
        assert_eq!(player.intent(), Some(InputCommand::Up));
    }

    #[test]
    fn walking_spends_the_turn() {
        let mut world = world_with_player(&["...", "...", "..."], GridCoord::new(1, 1));
        let mut player = Player::new();
        player.take_turn();
        let _ = player.handle_input(InputCommand::Left);

        let mut events = Vec::new();
        player.update(&mut world, &mut events);

        assert!(player.is_turn_finished());
        assert_eq!(player.position(&world), Some(GridCoord::new(0, 1)));
        assert!(player.sprite().faces_left());
    }

    #[test]
    fn bumping_into_an_obstacle_keeps_the_turn() {
        let mut world = world_with_player(&[".#.", "...", "..."], GridCoord::new(1, 1));
        let mut player = Player::new();
        player.take_turn();
        let _ = player.handle_input(InputCommand::Up);

        let mut events = Vec::new();
        player.update(&mut world, &mut events);

        assert!(!player.is_turn_finished());
        assert_eq!(player.intent(), None);
        assert_eq!(
            query::actor_facing(&world, ActorId::Player),
            Some(Direction::North)
        );
    }

    #[test]
    fn skipping_spends_the_turn_in_place() {
        let mut world = world_with_player(&["..", ".."], GridCoord::new(0, 0));
        let mut player = Player::new();
        player.take_turn();
        let _ = player.handle_input(InputCommand::Skip);

        let mut events = Vec::new();
        player.update(&mut world, &mut events);

        assert!(player.is_turn_finished());
        assert_eq!(
            events,
            vec![Event::ActorWaited {
                actor: ActorId::Player
            }]
        );
    }

    #[test]
    fn enemy_next_to_the_player_attacks() {
        let mut world = world_with_player(&["...", "...", "..."], GridCoord::new(1, 1));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                near: GridCoord::new(2, 1),
            },
            &mut events,
        );
        let enemy_id = EnemyId::new(0);
        let mut enemy = Enemy::new(enemy_id, Wander::new(Config::new(1, 0.0)));
        assert!(enemy.is_turn_finished());

        enemy.take_turn();
        events.clear();
        enemy.update(&mut world, &mut events);

        assert!(enemy.is_turn_finished());
        assert_eq!(
            events,
            vec![Event::ActorAttacked {
                attacker: ActorId::Enemy(enemy_id),
                target: ActorId::Player,
                cell: GridCoord::new(1, 1),
            }]
        );
        assert!(enemy.sprite().faces_left());
        assert_eq!(enemy.position(&world), Some(GridCoord::new(2, 1)));
    }

    #[test]
    fn sprite_without_images_draws_fallback_square() {
        struct Fills(Vec<(PixelRect, Color)>);
        impl Canvas for Fills {
            fn fill_rect(&mut self, rect: PixelRect, color: Color) {
                self.0.push((rect, color));
            }
            fn draw_image(&mut self, _: ImageHandle, _: PixelRect, _: PixelRect, _: bool) {}
        }

        let sprite = ActorSprite::new(ENEMY_COLOR);
        let mut canvas = Fills(Vec::new());
        sprite.render(&mut canvas, Vec2::new(32.0, 64.0), 32.0);
        assert_eq!(
            canvas.0,
            vec![(PixelRect::new(36.0, 68.0, 24.0, 24.0), ENEMY_COLOR)]
        );
    }

    #[test]
    fn sprite_mirrors_the_only_loaded_strip() {
        struct Images(Vec<bool>);
        impl Canvas for Images {
            fn fill_rect(&mut self, _: PixelRect, _: Color) {}
            fn draw_image(&mut self, _: ImageHandle, _: PixelRect, _: PixelRect, flip_x: bool) {
                self.0.push(flip_x);
            }
        }

        let mut sprite = ActorSprite::new(PLAYER_COLOR);
        sprite.bind(None, Some(ImageHandle::new(3, 64, 32)), 32);
        sprite.face(Direction::West);
        let mut canvas = Images(Vec::new());
        sprite.render(&mut canvas, Vec2::ZERO, 32.0);
        sprite.face(Direction::East);
        sprite.render(&mut canvas, Vec2::ZERO, 32.0);
        assert_eq!(canvas.0, vec![true, false]);
    }
}
