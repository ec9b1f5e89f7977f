#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wandering behaviour for enemies.
//!
//! An enemy standing next to its quarry steps into it. Otherwise it either
//! waits or picks a random cardinal direction, falling back to waiting when
//! the chosen cell is not free. All randomness comes from a seeded ChaCha
//! stream so identical seeds replay identical choices.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shamble_core::{ActorId, Command, Direction, GridCoord};

/// Probability that an idle enemy spends its turn standing still.
pub const DEFAULT_WAIT_CHANCE: f64 = 0.25;

/// Configuration parameters required to construct a wandering brain.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    wait_chance: f64,
}

impl Config {
    /// Creates a configuration using the provided seed and wait probability.
    ///
    /// The probability is clamped into `0.0..=1.0`.
    #[must_use]
    pub fn new(rng_seed: u64, wait_chance: f64) -> Self {
        Self {
            rng_seed,
            wait_chance: wait_chance.clamp(0.0, 1.0),
        }
    }
}

/// Per-enemy decision maker.
#[derive(Debug)]
pub struct Wander {
    rng: ChaCha8Rng,
    wait_chance: f64,
}

impl Wander {
    /// Creates a brain from the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            wait_chance: config.wait_chance,
        }
    }

    /// Chooses the command `actor` standing on `cell` issues this turn.
    ///
    /// `quarry` is the cell the enemy wants to attack when adjacent, and
    /// `is_free` reports whether a cell can be walked into.
    pub fn choose<F>(
        &mut self,
        actor: ActorId,
        cell: GridCoord,
        quarry: Option<GridCoord>,
        is_free: F,
    ) -> Command
    where
        F: Fn(GridCoord) -> bool,
    {
        if let Some(direction) = quarry.and_then(|quarry| adjacent_direction(cell, quarry)) {
            return Command::Step { actor, direction };
        }

        if self.rng.gen_bool(self.wait_chance) {
            return Command::Wait { actor };
        }

        match Direction::ALL.choose(&mut self.rng) {
            Some(&direction) if is_free(cell.step(direction)) => Command::Step { actor, direction },
            _ => Command::Wait { actor },
        }
    }
}

fn adjacent_direction(from: GridCoord, to: GridCoord) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|direction| from.step(*direction) == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shamble_core::EnemyId;

    const ENEMY: ActorId = ActorId::Enemy(EnemyId::new(0));

    #[test]
    fn adjacent_quarry_is_attacked() {
        let mut wander = Wander::new(Config::new(7, 1.0));
        let command = wander.choose(
            ENEMY,
            GridCoord::new(3, 3),
            Some(GridCoord::new(3, 2)),
            |_| true,
        );

        assert_eq!(
            command,
            Command::Step {
                actor: ENEMY,
                direction: Direction::North,
            }
        );
    }

    #[test]
    fn certain_wait_chance_always_waits() {
        let mut wander = Wander::new(Config::new(7, 1.0));
        for _ in 0..20 {
            let command = wander.choose(ENEMY, GridCoord::new(3, 3), None, |_| true);
            assert_eq!(command, Command::Wait { actor: ENEMY });
        }
    }

    #[test]
    fn enclosed_enemy_waits() {
        let mut wander = Wander::new(Config::new(11, 0.0));
        for _ in 0..20 {
            let command = wander.choose(ENEMY, GridCoord::new(1, 1), None, |_| false);
            assert_eq!(command, Command::Wait { actor: ENEMY });
        }
    }

    #[test]
    fn open_ground_always_steps_without_wait_chance() {
        let mut wander = Wander::new(Config::new(3, 0.0));
        for _ in 0..20 {
            let command = wander.choose(ENEMY, GridCoord::new(5, 5), None, |_| true);
            assert!(matches!(command, Command::Step { actor: ENEMY, .. }));
        }
    }

    #[test]
    fn identical_seeds_replay_identical_choices() {
        let mut first = Wander::new(Config::new(0x5eed, DEFAULT_WAIT_CHANCE));
        let mut second = Wander::new(Config::new(0x5eed, DEFAULT_WAIT_CHANCE));

        for _ in 0..50 {
            let cell = GridCoord::new(4, 4);
            assert_eq!(
                first.choose(ENEMY, cell, None, |_| true),
                second.choose(ENEMY, cell, None, |_| true)
            );
        }
    }

    #[test]
    fn distant_quarry_is_ignored() {
        assert_eq!(
            adjacent_direction(GridCoord::new(0, 0), GridCoord::new(1, 1)),
            None
        );
        assert_eq!(
            adjacent_direction(GridCoord::new(0, 0), GridCoord::new(-1, 0)),
            Some(Direction::West)
        );
    }
}
