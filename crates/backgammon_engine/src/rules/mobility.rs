//! Whole-turn mobility: which moves exist for the remaining dice.

use super::super::action::Move;
use super::super::board::target_point;
use super::super::state::GameState;
use super::super::types::{Color, POINT_COUNT, Source, Target};
use super::movement::is_valid_move;
use tracing::{debug, instrument};

/// Builds the only move `die` allows from `from`: onto a point, or off.
pub fn candidate_move(color: Color, from: Source, die: u8) -> Move {
    let landing = target_point(color, from, die);
    let to = if (0..POINT_COUNT as i8).contains(&landing) {
        Target::Point(landing as u8)
    } else {
        Target::Off
    };
    Move::new(from, to, die)
}

// Distinct die values in first-seen order.
fn distinct_dice(state: &GameState) -> Vec<u8> {
    let mut dice = Vec::with_capacity(2);
    for die in state.moves_left() {
        if !dice.contains(die) {
            dice.push(*die);
        }
    }
    dice
}

fn sources(state: &GameState, color: Color) -> Vec<Source> {
    if state.board().bar(color) > 0 {
        vec![Source::Bar]
    } else {
        state.board().owned_points(color).map(Source::Point).collect()
    }
}

/// Returns true if the player to move can play at least one remaining die.
///
/// Trivially true when no dice remain. Never mutates `state`.
#[instrument(skip(state), fields(turn = %state.turn(), moves_left = ?state.moves_left()))]
pub fn has_any_legal_move(state: &GameState) -> bool {
    if state.moves_left().is_empty() {
        return true;
    }
    let color = state.turn();
    let dice = distinct_dice(state);
    let found = sources(state, color).into_iter().any(|from| {
        dice.iter()
            .any(|die| is_valid_move(state, color, &candidate_move(color, from, *die)))
    });
    debug!(found, "Evaluated mobility");
    found
}

/// Every legal move for the player to move, sources in ascending order.
#[instrument(skip(state), fields(turn = %state.turn()))]
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    let color = state.turn();
    let dice = distinct_dice(state);
    sources(state, color)
        .into_iter()
        .flat_map(|from| dice.iter().map(move |die| candidate_move(color, from, *die)))
        .filter(|mv| is_valid_move(state, color, mv))
        .collect()
}
