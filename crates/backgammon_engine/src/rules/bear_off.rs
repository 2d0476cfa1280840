//! Bearing-off eligibility and the over-roll tie-break.

use super::super::action::MoveError;
use super::super::board::{Board, is_home_quadrant};
use super::super::types::{Color, POINT_COUNT, Source, Target};
use tracing::{debug, instrument};

/// Checks a bear-off of `color` from `from`, whose die lands on `landing`.
///
/// Exact bear-offs are always legal once every checker is home. An over-roll
/// is legal only when no checker of `color` sits between `from` and the
/// outer edge of the home quadrant. Any checker satisfying that is accepted,
/// even if another checker ties with it.
///
/// # Errors
///
/// [`MoveError::NotAllHome`], [`MoveError::WrongTarget`] when the die falls
/// short of the edge, or [`MoveError::CheckersBehind`].
#[instrument(skip(board))]
pub fn check_bear_off(board: &Board, color: Color, from: Source, landing: i8) -> Result<(), MoveError> {
    let Source::Point(point) = from else {
        return Err(MoveError::NotAllHome { color });
    };

    if !is_home_quadrant(color, board) {
        return Err(MoveError::NotAllHome { color });
    }

    // Signed index one pip beyond the last point.
    let edge: i8 = match color {
        Color::White => POINT_COUNT as i8,
        Color::Black => -1,
    };
    if landing == edge {
        return Ok(());
    }

    let overshoots = match color {
        Color::White => landing > edge,
        Color::Black => landing < edge,
    };
    if !overshoots {
        let die = (landing - point as i8).unsigned_abs();
        return Err(MoveError::WrongTarget {
            from,
            to: Target::Off,
            die,
        });
    }

    let behind: Vec<u8> = match color {
        Color::White => (*color.home_range().start()..point).collect(),
        Color::Black => (point + 1..=*color.home_range().end()).collect(),
    };
    if behind
        .iter()
        .any(|idx| board.point(*idx).is_some_and(|p| p.count_of(color) > 0))
    {
        debug!(point, "Over-roll refused: checker further back");
        return Err(MoveError::CheckersBehind { point });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::target_point;

    fn black_home(points: &[(u8, u8)]) -> Board {
        let mut board = Board::empty();
        let mut on_board = 0;
        for (idx, count) in points {
            board.place(*idx, Color::Black, *count);
            on_board += count;
        }
        board
            .set_off(Color::Black, 15 - on_board)
            .place(12, Color::White, 15);
        board
    }

    fn check(board: &Board, color: Color, point: u8, die: u8) -> Result<(), MoveError> {
        let from = Source::Point(point);
        check_bear_off(board, color, from, target_point(color, from, die))
    }

    #[test]
    fn test_exact_bear_off() {
        let board = black_home(&[(2, 1), (4, 1)]);
        assert_eq!(check(&board, Color::Black, 2, 3), Ok(()));
    }

    #[test]
    fn test_over_roll_from_rearmost() {
        let board = black_home(&[(2, 1), (4, 1)]);
        assert_eq!(check(&board, Color::Black, 4, 6), Ok(()));
    }

    #[test]
    fn test_over_roll_with_checker_behind() {
        let board = black_home(&[(2, 1), (4, 1)]);
        assert_eq!(
            check(&board, Color::Black, 2, 6),
            Err(MoveError::CheckersBehind { point: 2 })
        );
    }

    #[test]
    fn test_short_die_is_not_a_bear_off() {
        let board = black_home(&[(4, 2)]);
        assert!(matches!(
            check(&board, Color::Black, 4, 2),
            Err(MoveError::WrongTarget { .. })
        ));
    }

    #[test]
    fn test_requires_everyone_home() {
        let board = black_home(&[(4, 1), (9, 1)]);
        assert_eq!(
            check(&board, Color::Black, 4, 5),
            Err(MoveError::NotAllHome {
                color: Color::Black
            })
        );
    }

    #[test]
    fn test_white_over_roll_mirror() {
        let mut board = Board::empty();
        board
            .place(20, Color::White, 1)
            .place(22, Color::White, 1)
            .set_off(Color::White, 13)
            .place(10, Color::Black, 15);
        assert_eq!(check(&board, Color::White, 20, 6), Ok(()));
        assert_eq!(
            check(&board, Color::White, 22, 6),
            Err(MoveError::CheckersBehind { point: 22 })
        );
    }
}
