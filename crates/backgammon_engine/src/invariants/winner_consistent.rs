//! Winner consistency: a winner exists exactly when someone bore off fifteen.

use super::super::{Color, GameState, Status};
use super::Invariant;
use strum::IntoEnumIterator;

/// Invariant: `winner == Some(c)` iff `off[c] == 15`, and a winner means `Finished`.
pub struct WinnerConsistentInvariant;

impl Invariant<GameState> for WinnerConsistentInvariant {
    fn holds(game: &GameState) -> bool {
        let finished: Vec<Color> = Color::iter()
            .filter(|color| game.board().has_borne_off_all(*color))
            .collect();
        match game.winner() {
            Some(winner) => finished == [winner] && game.status() == Status::Finished,
            None => finished.is_empty() && game.status() != Status::Finished,
        }
    }

    fn description() -> &'static str {
        "Winner is set exactly when one color has borne off all checkers"
    }
}
