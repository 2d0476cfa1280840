//! Bounded history: undo never reaches past the current turn.

use super::super::{GameState, HISTORY_LIMIT};
use super::Invariant;

/// Invariant: the undo stack holds at most one entry per die played this turn.
pub struct BoundedHistoryInvariant;

impl Invariant<GameState> for BoundedHistoryInvariant {
    fn holds(game: &GameState) -> bool {
        let history = game.history();
        if history.len() > HISTORY_LIMIT {
            return false;
        }
        if game.dice().is_none() || game.is_over() {
            return history.is_empty();
        }
        // Each snapshot held strictly more dice than the state after it.
        history
            .iter()
            .map(|snap| snap.moves_left.len())
            .chain(std::iter::once(game.moves_left().len()))
            .collect::<Vec<_>>()
            .windows(2)
            .all(|pair| pair[0] > pair[1])
    }

    fn description() -> &'static str {
        "Undo history belongs to the current turn and shrinks the dice pool"
    }
}
