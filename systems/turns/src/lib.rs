#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Two-phase turn scheduler alternating between the player and the enemies.
//!
//! The scheduler never touches actors directly. It asks a
//! [`TurnParticipants`] implementation whether each side has finished and
//! tells it when to start the next turn or refresh the fog.

use shamble_core::TurnPhase;
use thiserror::Error;

/// Callbacks the scheduler uses to observe and drive the actors.
pub trait TurnParticipants {
    /// Reports whether the player has resolved its current action.
    fn player_turn_finished(&self) -> bool;

    /// Reports whether every enemy has resolved its current action.
    ///
    /// Must return `true` when there are no enemies.
    fn enemies_turn_finished(&self) -> bool;

    /// Orders every enemy to begin a new turn.
    fn enemies_take_turn(&mut self);

    /// Recomputes the fog of war from the player's position.
    fn refresh_visibility(&mut self);

    /// Orders the player to begin a new turn.
    fn player_take_turn(&mut self);
}

/// Phase change performed by a single [`TurnScheduler::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseChange {
    /// The AI phase began.
    EnteredAi {
        /// Whether the enemies were ordered to act and the round counter advanced.
        round_advanced: bool,
    },
    /// The player phase began.
    EnteredPlayer {
        /// Whether the fog was refreshed and the player was ordered to act.
        turn_started: bool,
    },
}

/// Errors raised by invalid phase transitions.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    /// The requested phase is already active.
    #[error("turn phase {phase:?} is already active")]
    AlreadyInPhase {
        /// Phase that was requested.
        phase: TurnPhase,
    },
}

/// Turn-alternation state machine.
#[derive(Clone, Debug)]
pub struct TurnScheduler {
    phase: TurnPhase,
    round: u64,
    ticks_in_phase: u64,
}

impl TurnScheduler {
    /// Creates a scheduler in the player phase at round zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: TurnPhase::Player,
            round: 0,
            ticks_in_phase: 0,
        }
    }

    /// Currently active phase.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Number of AI phases in which the enemies were ordered to act.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Number of ticks the current phase has been active.
    ///
    /// Stalls are not treated as errors; this counter only makes them observable.
    #[must_use]
    pub const fn ticks_in_phase(&self) -> u64 {
        self.ticks_in_phase
    }

    /// Switches to `to`, rejecting a transition into the phase that is already active.
    pub fn transition(&mut self, to: TurnPhase) -> Result<(), TurnError> {
        if self.phase == to {
            return Err(TurnError::AlreadyInPhase { phase: to });
        }
        tracing::debug!(from = ?self.phase, to = ?to, round = self.round, "turn phase changed");
        self.phase = to;
        self.ticks_in_phase = 0;
        Ok(())
    }

    /// Advances the state machine by one tick.
    pub fn step<P>(&mut self, participants: &mut P) -> Result<Option<PhaseChange>, TurnError>
    where
        P: TurnParticipants + ?Sized,
    {
        self.ticks_in_phase = self.ticks_in_phase.saturating_add(1);

        match self.phase {
            TurnPhase::Player => {
                if !participants.player_turn_finished() {
                    return Ok(None);
                }
                self.transition(TurnPhase::Ai)?;
                let round_advanced = participants.enemies_turn_finished();
                if round_advanced {
                    participants.enemies_take_turn();
                    self.round = self.round.saturating_add(1);
                    tracing::debug!(round = self.round, "enemies take their turn");
                }
                Ok(Some(PhaseChange::EnteredAi { round_advanced }))
            }
            TurnPhase::Ai => {
                if !participants.enemies_turn_finished() {
                    return Ok(None);
                }
                self.transition(TurnPhase::Player)?;
                let turn_started = participants.player_turn_finished();
                if turn_started {
                    participants.refresh_visibility();
                    participants.player_take_turn();
                }
                Ok(Some(PhaseChange::EnteredPlayer { turn_started }))
            }
        }
    }
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_player_phase_at_round_zero() {
        let scheduler = TurnScheduler::new();
        assert_eq!(scheduler.phase(), TurnPhase::Player);
        assert_eq!(scheduler.round(), 0);
        assert_eq!(scheduler.ticks_in_phase(), 0);
    }

    #[test]
    fn transition_rejects_the_active_phase() {
        let mut scheduler = TurnScheduler::new();
        assert_eq!(
            scheduler.transition(TurnPhase::Player),
            Err(TurnError::AlreadyInPhase {
                phase: TurnPhase::Player
            })
        );
        assert_eq!(scheduler.transition(TurnPhase::Ai), Ok(()));
        assert_eq!(scheduler.phase(), TurnPhase::Ai);
    }

    #[test]
    fn transition_resets_phase_tick_counter() {
        let mut scheduler = TurnScheduler::new();
        scheduler.ticks_in_phase = 12;
        assert_eq!(scheduler.transition(TurnPhase::Ai), Ok(()));
        assert_eq!(scheduler.ticks_in_phase(), 0);
    }
}
