//! Checker conservation: every color always owns exactly fifteen checkers.

use super::super::{CHECKERS_PER_COLOR, Color, GameState};
use super::Invariant;
use strum::IntoEnumIterator;

/// Invariant: `bar + off + checkers on points == 15` for each color.
pub struct CheckerConservationInvariant;

impl Invariant<GameState> for CheckerConservationInvariant {
    fn holds(game: &GameState) -> bool {
        Color::iter().all(|color| game.board().checker_total(color) == usize::from(CHECKERS_PER_COLOR))
    }

    fn description() -> &'static str {
        "Each color has exactly 15 checkers across points, bar and off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;

    #[test]
    fn test_opening_conserves() {
        assert!(CheckerConservationInvariant::holds(&GameState::default()));
    }

    #[test]
    fn test_extra_bar_checker_violates() {
        let mut board = Board::new();
        board.set_bar(Color::Black, 1);
        let game = GameState::from_position(board, Color::White, vec![]);
        assert!(!CheckerConservationInvariant::holds(&game));
    }
}
