//! Backgammon legality rules.

mod bear_off;
mod mobility;
mod movement;

pub use bear_off::check_bear_off;
pub use mobility::{candidate_move, has_any_legal_move, legal_moves};
pub use movement::{is_valid_move, validate_move};
