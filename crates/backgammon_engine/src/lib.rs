//! Backgammon rules engine.
//!
//! Pure game logic with no I/O: the board model, legality rules, the
//! turn/dice state machine, move execution with undo snapshots, and a greedy
//! opponent policy.
//!
//! # Example
//!
//! ```
//! use backgammon_engine::{Action, Color, GameState, Initiator, Move, ScriptedDice, Source, Target};
//!
//! let mut game = GameState::default();
//! let mut dice = ScriptedDice::new([(3, 1)]);
//! let white = Initiator::Player(Color::White);
//!
//! game.apply(white, Action::Roll, &mut dice)?;
//! game.apply(white, Action::Move(Move::new(Source::Point(16), Target::Point(19), 3)), &mut dice)?;
//! game.apply(white, Action::Move(Move::new(Source::Point(18), Target::Point(19), 1)), &mut dice)?;
//! assert_eq!(game.turn(), Color::Black);
//! # Ok::<(), backgammon_engine::Rejection>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod contracts;
mod dice;
mod executor;
mod invariants;
mod machine;
mod opponent;
mod phases;
mod rules;
mod state;
mod types;

pub use action::{Action, Move, MoveError, Rejection, TransitionError};
pub use board::{Board, Point, is_home_quadrant, target_point};
pub use contracts::{ColoredMove, Contract, GameNotOver, LegalMove, MoveContract, PlayersTurn};
pub use dice::{DiceSource, RandomDice, ScriptedDice};
pub use executor::{Execution, execute};
pub use invariants::{
    BackgammonInvariants, BoundedHistoryInvariant, CheckerConservationInvariant, Invariant,
    InvariantSet, InvariantViolation, SingleOwnerInvariant, WinnerConsistentInvariant,
};
pub use machine::Effect;
pub use opponent::{decide, scan_order};
pub use phases::Phase;
pub use rules::{
    candidate_move, check_bear_off, has_any_legal_move, is_valid_move, legal_moves, validate_move,
};
pub use state::{GameState, Grab, HISTORY_LIMIT, RoomId, Snapshot, Status};
pub use types::{
    CHECKERS_PER_COLOR, Color, DiceRoll, Initiator, Mode, POINT_COUNT, PerColor, Source, Target,
};
