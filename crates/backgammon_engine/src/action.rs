//! First-class action types for backgammon.
//!
//! Moves are proposals, not side effects. They can be validated against a
//! state independently of execution, serialized over the wire, and logged.

use super::types::{Color, Source, Target};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A proposed checker move: take from `from`, land on `to`, consuming `die`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Where the checker comes from.
    pub from: Source,
    /// Where the checker goes.
    pub to: Target,
    /// The die value spent on this move.
    pub die: u8,
}

impl Move {
    /// Creates a new move.
    pub fn new(from: Source, to: Target, die: u8) -> Self {
        Self { from, to, die }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.die)
    }
}

/// Every request a session can make of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Roll the dice.
    Roll,
    /// Play one checker.
    Move(Move),
    /// Give up the rest of a blocked turn.
    Pass,
    /// Revert the last move of the current turn.
    Undo,
    /// Discard one unplayable die value (scheduler only).
    ForfeitDie {
        /// The die value to discard.
        die: u8,
    },
    /// Pick up the top checker of a zone.
    Grab {
        /// The zone picked from.
        from: Source,
    },
    /// Drop the grabbed checker on a zone.
    Release {
        /// The zone dropped on; `None` cancels the grab.
        to: Option<Target>,
    },
}

/// Why a proposed move is illegal.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The die is not among the remaining values.
    #[display("die {die} is not available")]
    DieUnavailable {
        /// The requested die.
        die: u8,
    },

    /// Checkers are waiting on the bar and must enter first.
    #[display("checkers on the bar must enter first")]
    MustEnterFromBar,

    /// The bar is empty.
    #[display("no checker on the bar")]
    NothingOnBar,

    /// The source point does not hold one of the mover's checkers.
    #[display("no {color} checker on point {point}")]
    NoCheckerAtSource {
        /// The mover.
        color: Color,
        /// The empty or foreign point.
        point: u8,
    },

    /// The target does not match the die distance.
    #[display("{die} from {from} does not reach {to}")]
    WrongTarget {
        /// Proposed source.
        from: Source,
        /// Proposed target.
        to: Target,
        /// Proposed die.
        die: u8,
    },

    /// The target index lies outside the board.
    #[display("point {point} is off the board")]
    OffBoard {
        /// Offending index.
        point: i8,
    },

    /// Two or more opposing checkers hold the destination.
    #[display("point {point} is blocked")]
    PointBlocked {
        /// The made point.
        point: u8,
    },

    /// Bearing off needs every checker in the home quadrant.
    #[display("{color} still has checkers outside home")]
    NotAllHome {
        /// The mover.
        color: Color,
    },

    /// Over-rolled bear-off while a checker sits further back.
    #[display("a checker behind point {point} must move first")]
    CheckersBehind {
        /// The source point.
        point: u8,
    },

    /// The proposer is not the color to move.
    #[display("it is not {color}'s turn")]
    NotYourTurn {
        /// The proposer.
        color: Color,
    },

    /// A winner has been declared.
    #[display("game is already over")]
    GameOver,

    /// A post-condition failed after execution.
    #[display("invariant violation: {reason}")]
    InvariantViolation {
        /// Violated invariants.
        reason: String,
    },
}

/// Why a non-move transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum TransitionError {
    /// Dice were requested while moves remain.
    #[display("moves are still pending")]
    MovesPending,

    /// A move, pass or undo was requested before rolling.
    #[display("dice have not been rolled")]
    NotRolled,

    /// The requester does not own the turn.
    #[display("it is not {color}'s turn")]
    NotYourTurn {
        /// The requester.
        color: Color,
    },

    /// Pass requested while a legal move exists.
    #[display("a legal move is available")]
    NotBlocked,

    /// Undo requested with nothing to undo this turn.
    #[display("nothing to undo")]
    NothingToUndo,

    /// The opposing seat is not connected yet.
    #[display("waiting for the other player")]
    AwaitingPeer,

    /// A winner has been declared.
    #[display("game is already over")]
    GameOver,

    /// The requested die cannot be forfeited.
    #[display("die {die} cannot be forfeited")]
    CannotForfeit {
        /// The die value.
        die: u8,
    },

    /// Only the scheduler may perform this transition.
    #[display("transition reserved for the scheduler")]
    SchedulerOnly,

    /// Release without a grabbed checker.
    #[display("nothing is grabbed")]
    NothingGrabbed,
}

/// Reason an operation left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, derive_more::From)]
pub enum Rejection {
    /// The proposal fails the legality check.
    #[display("invalid move: {_0}")]
    InvalidMove(MoveError),

    /// The transition is not allowed in the current state.
    #[display("illegal transition: {_0}")]
    IllegalTransition(TransitionError),

    /// The request was built from an older state than the current one.
    #[display("stale request: based on revision {expected}, current is {actual}")]
    #[from(ignore)]
    Stale {
        /// Revision the request was based on.
        expected: u64,
        /// Current revision.
        actual: u64,
    },

    /// The owning session has shut down.
    #[display("session closed")]
    #[from(ignore)]
    SessionClosed,
}
