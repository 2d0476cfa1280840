//! First-class invariants for backgammon.
//!
//! Invariants are logical properties that must hold for every reachable state.
//! They are testable independently and are checked as move post-conditions.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

// Implement InvariantSet for 4-tuples
impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        collect::<S, I4>(state, &mut violations);
        finish(violations)
    }
}

// Implement InvariantSet for 2-tuples
impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

pub mod bounded_history;
pub mod checker_conservation;
pub mod single_owner;
pub mod winner_consistent;

pub use bounded_history::BoundedHistoryInvariant;
pub use checker_conservation::CheckerConservationInvariant;
pub use single_owner::SingleOwnerInvariant;
pub use winner_consistent::WinnerConsistentInvariant;

/// All backgammon invariants as a composable set.
pub type BackgammonInvariants = (
    CheckerConservationInvariant,
    SingleOwnerInvariant,
    WinnerConsistentInvariant,
    BoundedHistoryInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Color, GameState};

    #[test]
    fn test_invariant_set_holds_for_opening() {
        let game = GameState::default();
        assert!(BackgammonInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        let mut board = Board::new();
        board.set_off(Color::White, 15);
        let game = GameState::from_position(board, Color::White, vec![]);

        let violations = BackgammonInvariants::check_all(&game).unwrap_err();
        // Conservation breaks (30 white checkers) and a winner is missing.
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        let game = GameState::default();
        type BoardOnly = (CheckerConservationInvariant, SingleOwnerInvariant);
        assert!(BoardOnly::check_all(&game).is_ok());
    }
}
