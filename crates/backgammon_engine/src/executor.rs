//! Applies one already-validated move to a state.

use super::action::Move;
use super::state::GameState;
use super::types::{Color, Source, Target};
use tracing::{debug, instrument};

/// Result of executing a single checker move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// The move that was played.
    pub mv: Move,
    /// True if a lone opposing checker was sent to the bar.
    pub hit: bool,
}

/// Moves one checker of `color` as described by `mv`.
///
/// The caller must have validated `mv`. Pushes a pre-move snapshot, lifts the
/// checker from the bar or the source stack, lands it (bearing off, hitting a
/// lone opposing checker, or stacking), and spends the die. Turn bookkeeping
/// happens afterwards in the state machine.
#[instrument(skip(state, mv), fields(color = %color, mv = %mv))]
pub fn execute(state: &mut GameState, color: Color, mv: &Move) -> Execution {
    let snapshot = state.snapshot();
    state.push_history(snapshot);

    match mv.from {
        Source::Bar => {
            let bar = state.board.bar_mut(color);
            *bar = bar.saturating_sub(1);
        }
        Source::Point(idx) => {
            if let Some(point) = state.board.point_mut(idx) {
                point.pop();
            }
        }
    }

    let mut hit = false;
    match mv.to {
        Target::Off => {
            *state.board.off_mut(color) += 1;
        }
        Target::Point(idx) => {
            let opponent = color.opponent();
            let mut displaced = false;
            if let Some(point) = state.board.point_mut(idx) {
                if point.len() == 1 && point.is_owned_by(opponent) {
                    point.pop();
                    displaced = true;
                }
                point.push(color);
            }
            if displaced {
                *state.board.bar_mut(opponent) += 1;
                hit = true;
                debug!(point = idx, "Hit sends checker to the bar");
            }
        }
    }

    if let Some(pos) = state.moves_left.iter().position(|d| *d == mv.die) {
        state.moves_left.remove(pos);
    }

    Execution { mv: *mv, hit }
}
