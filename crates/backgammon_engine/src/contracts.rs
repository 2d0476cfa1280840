//! Contract-based validation for backgammon moves.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::{Move, MoveError};
use super::invariants::{BackgammonInvariants, InvariantSet};
use super::rules::validate_move;
use super::state::GameState;
use super::types::Color;
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// A move proposed on behalf of one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColoredMove {
    /// The mover.
    pub color: Color,
    /// The proposal.
    pub mv: Move,
}

/// Precondition: no winner yet.
pub struct GameNotOver;

impl GameNotOver {
    /// Fails once a winner exists.
    pub fn check(game: &GameState) -> Result<(), MoveError> {
        if game.is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the mover owns the turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails when `color` is not to move.
    pub fn check(color: Color, game: &GameState) -> Result<(), MoveError> {
        if game.turn() != color {
            Err(MoveError::NotYourTurn { color })
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: game running, mover's turn, and the board rules.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(game))]
    pub fn check(action: &ColoredMove, game: &GameState) -> Result<(), MoveError> {
        GameNotOver::check(game)?;
        PlayersTurn::check(action.color, game)?;
        validate_move(game, action.color, &action.mv)
    }
}

/// Contract for move actions.
///
/// Preconditions: game running, mover's turn, move legal.
/// Postconditions: every invariant in [`BackgammonInvariants`] holds.
pub struct MoveContract;

impl Contract<GameState, ColoredMove> for MoveContract {
    fn pre(game: &GameState, action: &ColoredMove) -> Result<(), MoveError> {
        LegalMove::check(action, game)
    }

    fn post(_before: &GameState, after: &GameState) -> Result<(), MoveError> {
        BackgammonInvariants::check_all(after).map_err(|violations| {
            let reason = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%reason, "Postcondition failed");
            MoveError::InvariantViolation { reason }
        })
    }
}
