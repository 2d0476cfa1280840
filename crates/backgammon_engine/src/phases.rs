//! Turn phases derived from a game state.

use super::state::GameState;
use super::types::Color;
use serde::{Deserialize, Serialize};

/// Where the turn state machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No dice on the table; the player to move must roll.
    AwaitingRoll(Color),
    /// Dice rolled and at least one of them is playable.
    Moving(Color),
    /// Dice remain but none can be played; the only action is pass.
    Blocked(Color),
    /// A color has borne off all fifteen checkers.
    Finished(Color),
}

impl Phase {
    /// Computes the phase of `state`.
    pub fn of(state: &GameState) -> Self {
        let turn = state.turn();
        if let Some(winner) = state.winner() {
            Phase::Finished(winner)
        } else if state.moves_left().is_empty() {
            Phase::AwaitingRoll(turn)
        } else if state.is_blocked() {
            Phase::Blocked(turn)
        } else {
            Phase::Moving(turn)
        }
    }

    /// Returns the winner if the game is finished.
    pub fn winner(&self) -> Option<Color> {
        match self {
            Phase::Finished(color) => Some(*color),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::AwaitingRoll(color) => write!(f, "{color} to roll"),
            Phase::Moving(color) => write!(f, "{color} to move"),
            Phase::Blocked(color) => write!(f, "{color} is blocked and must pass"),
            Phase::Finished(color) => write!(f, "{color} wins"),
        }
    }
}
