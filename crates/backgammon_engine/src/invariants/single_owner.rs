//! Single owner: no point holds checkers of both colors at rest.

use super::super::GameState;
use super::Invariant;

/// Invariant: every point is empty or held by one color.
pub struct SingleOwnerInvariant;

impl Invariant<GameState> for SingleOwnerInvariant {
    fn holds(game: &GameState) -> bool {
        game.board().points().iter().all(|point| !point.is_mixed())
    }

    fn description() -> &'static str {
        "No point holds checkers of both colors"
    }
}
