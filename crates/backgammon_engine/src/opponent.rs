//! Greedy opponent policy.
//!
//! A non-lookahead heuristic built on the rules engine: roll when there are
//! no dice, pass when blocked, otherwise play the first remaining die from
//! the bar or from the first owned point in scan order. Deterministic for a
//! given board and dice.

use super::action::Action;
use super::rules::{candidate_move, is_valid_move};
use super::state::GameState;
use super::types::{Color, Source};
use tracing::{debug, instrument};

/// Order in which `color` scans its points: rearmost first for Black,
/// ascending for White.
pub fn scan_order(state: &GameState, color: Color) -> Vec<u8> {
    let owned = state.board().owned_points(color);
    match color {
        Color::White => owned.collect(),
        Color::Black => owned.rev().collect(),
    }
}

/// Chooses the next action for `color`, or `None` if it is not its move.
#[instrument(skip(state), fields(turn = %state.turn(), moves_left = ?state.moves_left()))]
pub fn decide(state: &GameState, color: Color) -> Option<Action> {
    if state.is_over() || state.turn() != color {
        return None;
    }
    if state.moves_left().is_empty() {
        return Some(Action::Roll);
    }
    if state.is_blocked() {
        return Some(Action::Pass);
    }

    let die = state.moves_left()[0];
    let sources: Vec<Source> = if state.board().bar(color) > 0 {
        vec![Source::Bar]
    } else {
        scan_order(state, color).into_iter().map(Source::Point).collect()
    };

    let choice = sources
        .into_iter()
        .map(|from| candidate_move(color, from, die))
        .find(|mv| is_valid_move(state, color, mv));

    match choice {
        Some(mv) => {
            debug!(mv = %mv, "Opponent picked move");
            Some(Action::Move(mv))
        }
        None if state.moves_left().len() > 1 => {
            debug!(die, "Opponent drops unplayable die");
            Some(Action::ForfeitDie { die })
        }
        None => Some(Action::Pass),
    }
}
