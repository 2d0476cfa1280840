//! Single-move validation.

use super::super::action::{Move, MoveError};
use super::super::board::target_point;
use super::super::state::GameState;
use super::super::types::{Color, POINT_COUNT, Source, Target};
use super::bear_off::check_bear_off;
use tracing::{debug, instrument};

/// Checks one proposed move for `color` against `state`.
///
/// Turn ownership and game-over are not considered here; those belong to
/// the move contract. Checks run in order: die availability, bar priority,
/// source ownership, then the destination rules.
///
/// # Errors
///
/// Returns the first [`MoveError`] that applies.
#[instrument(skip(state, mv), fields(mv = %mv))]
pub fn validate_move(state: &GameState, color: Color, mv: &Move) -> Result<(), MoveError> {
    let board = state.board();

    if !state.moves_left().contains(&mv.die) {
        return Err(MoveError::DieUnavailable { die: mv.die });
    }

    match mv.from {
        Source::Bar if board.bar(color) == 0 => return Err(MoveError::NothingOnBar),
        Source::Point(_) if board.bar(color) > 0 => return Err(MoveError::MustEnterFromBar),
        Source::Point(point) if !board.has_checker_at(color, mv.from) => {
            return Err(MoveError::NoCheckerAtSource { color, point });
        }
        _ => {}
    }

    let landing = target_point(color, mv.from, mv.die);
    match mv.to {
        Target::Off => check_bear_off(board, color, mv.from, landing),
        Target::Point(idx) => {
            if landing != idx as i8 {
                return Err(MoveError::WrongTarget {
                    from: mv.from,
                    to: mv.to,
                    die: mv.die,
                });
            }
            if !(0..POINT_COUNT as i8).contains(&landing) {
                return Err(MoveError::OffBoard { point: landing });
            }
            if board.point(idx).is_some_and(|p| p.blocks(color)) {
                debug!(point = idx, "Destination is a made point");
                return Err(MoveError::PointBlocked { point: idx });
            }
            Ok(())
        }
    }
}

/// Boolean form of [`validate_move`].
pub fn is_valid_move(state: &GameState, color: Color, mv: &Move) -> bool {
    validate_move(state, color, mv).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn opening(moves: Vec<u8>) -> GameState {
        GameState::from_position(Board::new(), Color::White, moves)
    }

    #[test]
    fn test_die_must_be_available() {
        let state = opening(vec![3, 5]);
        let mv = Move::new(Source::Point(0), Target::Point(4), 4);
        assert_eq!(
            validate_move(&state, Color::White, &mv),
            Err(MoveError::DieUnavailable { die: 4 })
        );
    }

    #[test]
    fn test_simple_step_is_legal() {
        let state = opening(vec![3, 5]);
        let mv = Move::new(Source::Point(0), Target::Point(3), 3);
        assert!(is_valid_move(&state, Color::White, &mv));
    }

    #[test]
    fn test_target_must_match_die() {
        let state = opening(vec![3, 5]);
        let mv = Move::new(Source::Point(0), Target::Point(4), 3);
        assert!(matches!(
            validate_move(&state, Color::White, &mv),
            Err(MoveError::WrongTarget { .. })
        ));
    }

    #[test]
    fn test_made_point_blocks() {
        // White 0 + 5 lands on Black's five-stack at 5.
        let state = opening(vec![5, 2]);
        let mv = Move::new(Source::Point(0), Target::Point(5), 5);
        assert_eq!(
            validate_move(&state, Color::White, &mv),
            Err(MoveError::PointBlocked { point: 5 })
        );
    }

    #[test]
    fn test_foreign_source_rejected() {
        let state = opening(vec![1, 2]);
        let mv = Move::new(Source::Point(5), Target::Point(6), 1);
        assert_eq!(
            validate_move(&state, Color::White, &mv),
            Err(MoveError::NoCheckerAtSource {
                color: Color::White,
                point: 5
            })
        );
    }

    #[test]
    fn test_bar_has_priority() {
        let mut board = Board::new();
        board.place(0, Color::White, 1).set_bar(Color::White, 1);
        let state = GameState::from_position(board, Color::White, vec![2, 4]);

        let from_point = Move::new(Source::Point(11), Target::Point(13), 2);
        assert_eq!(
            validate_move(&state, Color::White, &from_point),
            Err(MoveError::MustEnterFromBar)
        );

        let enter = Move::new(Source::Bar, Target::Point(1), 2);
        assert!(is_valid_move(&state, Color::White, &enter));
    }

    #[test]
    fn test_entry_onto_made_point_fails() {
        let mut board = Board::new();
        board.place(0, Color::White, 1).set_bar(Color::White, 1);
        let state = GameState::from_position(board, Color::White, vec![6, 6, 6, 6]);
        let enter = Move::new(Source::Bar, Target::Point(5), 6);
        assert_eq!(
            validate_move(&state, Color::White, &enter),
            Err(MoveError::PointBlocked { point: 5 })
        );
    }

    #[test]
    fn test_empty_bar_cannot_enter() {
        let state = opening(vec![1, 2]);
        let enter = Move::new(Source::Bar, Target::Point(0), 1);
        assert_eq!(
            validate_move(&state, Color::White, &enter),
            Err(MoveError::NothingOnBar)
        );
    }

    #[test]
    fn test_lone_opposing_checker_is_hittable() {
        let mut board = Board::empty();
        board
            .place(3, Color::White, 15)
            .place(7, Color::Black, 1)
            .place(20, Color::Black, 14);
        let state = GameState::from_position(board, Color::White, vec![4, 1]);
        let hit = Move::new(Source::Point(3), Target::Point(7), 4);
        assert!(is_valid_move(&state, Color::White, &hit));
    }
}
