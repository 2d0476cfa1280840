//! The 24-point board, bars and off-zones.

use super::types::{CHECKERS_PER_COLOR, Color, POINT_COUNT, PerColor, Source};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A single point: a stack of checkers, top = last pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    checkers: Vec<Color>,
}

impl Point {
    /// Creates a point holding `count` checkers of `color`.
    pub fn stacked(color: Color, count: u8) -> Self {
        Self {
            checkers: vec![color; usize::from(count)],
        }
    }

    /// Color of the top checker, if any.
    pub fn owner(&self) -> Option<Color> {
        self.checkers.last().copied()
    }

    /// Number of checkers on the point.
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Returns true if no checker sits here.
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Number of checkers of `color` on the point.
    pub fn count_of(&self, color: Color) -> usize {
        self.checkers.iter().filter(|c| **c == color).count()
    }

    /// Returns true if the top checker belongs to `color`.
    pub fn is_owned_by(&self, color: Color) -> bool {
        self.owner() == Some(color)
    }

    /// Returns true if `color` cannot land here (two or more opposing checkers).
    pub fn blocks(&self, color: Color) -> bool {
        self.count_of(color.opponent()) >= 2
    }

    /// Returns true if holding checkers of both colors.
    pub fn is_mixed(&self) -> bool {
        match self.checkers.first() {
            Some(first) => self.checkers.iter().any(|c| c != first),
            None => false,
        }
    }

    /// The checkers, bottom first.
    pub fn checkers(&self) -> &[Color] {
        &self.checkers
    }

    pub(crate) fn push(&mut self, color: Color) {
        self.checkers.push(color);
    }

    pub(crate) fn pop(&mut self) -> Option<Color> {
        self.checkers.pop()
    }
}

/// Board position: points, bar counts and off counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    points: [Point; POINT_COUNT],
    bar: PerColor<u8>,
    off: PerColor<u8>,
}

/// Standard opening layout as `(index, color, count)`.
const OPENING: [(u8, Color, u8); 8] = [
    (0, Color::White, 2),
    (5, Color::Black, 5),
    (7, Color::Black, 3),
    (11, Color::White, 5),
    (12, Color::Black, 5),
    (16, Color::White, 3),
    (18, Color::White, 5),
    (23, Color::Black, 2),
];

impl Board {
    /// Creates the standard starting position.
    #[instrument]
    pub fn new() -> Self {
        let mut board = Self::empty();
        for (idx, color, count) in OPENING {
            board.points[usize::from(idx)] = Point::stacked(color, count);
        }
        board
    }

    /// Creates a board with no checkers at all.
    ///
    /// Useful for composing positions; fill it with [`Board::place`] and
    /// [`Board::set_bar`] / [`Board::set_off`].
    pub fn empty() -> Self {
        Self {
            points: std::array::from_fn(|_| Point::default()),
            bar: PerColor::default(),
            off: PerColor::default(),
        }
    }

    /// Replaces point `idx` with `count` checkers of `color`.
    pub fn place(&mut self, idx: u8, color: Color, count: u8) -> &mut Self {
        if let Some(point) = self.points.get_mut(usize::from(idx)) {
            *point = Point::stacked(color, count);
        }
        self
    }

    /// Sets the bar count for `color`.
    pub fn set_bar(&mut self, color: Color, count: u8) -> &mut Self {
        self.bar[color] = count;
        self
    }

    /// Sets the off count for `color`.
    pub fn set_off(&mut self, color: Color, count: u8) -> &mut Self {
        self.off[color] = count;
        self
    }

    /// Gets the point at `idx`.
    pub fn point(&self, idx: u8) -> Option<&Point> {
        self.points.get(usize::from(idx))
    }

    pub(crate) fn point_mut(&mut self, idx: u8) -> Option<&mut Point> {
        self.points.get_mut(usize::from(idx))
    }

    /// All 24 points.
    pub fn points(&self) -> &[Point; POINT_COUNT] {
        &self.points
    }

    /// Checkers waiting on `color`'s bar.
    pub fn bar(&self, color: Color) -> u8 {
        self.bar[color]
    }

    /// Checkers `color` has borne off.
    pub fn off(&self, color: Color) -> u8 {
        self.off[color]
    }

    pub(crate) fn bar_mut(&mut self, color: Color) -> &mut u8 {
        &mut self.bar[color]
    }

    pub(crate) fn off_mut(&mut self, color: Color) -> &mut u8 {
        &mut self.off[color]
    }

    /// Indices of points whose top checker is `color`, in ascending order.
    pub fn owned_points(&self, color: Color) -> impl DoubleEndedIterator<Item = u8> + '_ {
        (0..POINT_COUNT as u8).filter(move |idx| self.points[usize::from(*idx)].is_owned_by(color))
    }

    /// Checkers of `color` on the board, on the bar and borne off.
    pub fn checker_total(&self, color: Color) -> usize {
        let on_points: usize = self.points.iter().map(|p| p.count_of(color)).sum();
        on_points + usize::from(self.bar[color]) + usize::from(self.off[color])
    }

    /// Returns true if `color` has borne off every checker.
    pub fn has_borne_off_all(&self, color: Color) -> bool {
        self.off[color] >= CHECKERS_PER_COLOR
    }

    /// Returns true if `source` can supply a checker of `color`.
    pub fn has_checker_at(&self, color: Color, source: Source) -> bool {
        match source {
            Source::Bar => self.bar[color] > 0,
            Source::Point(idx) => self.point(idx).is_some_and(|p| p.is_owned_by(color)),
        }
    }

    /// Formats the board as a human-readable string.
    ///
    /// Points 12–23 run along the top, 11–0 along the bottom.
    pub fn display(&self) -> String {
        let cell = |idx: usize| {
            let point = &self.points[idx];
            match point.owner() {
                Some(color) => format!("{}{:<2}", color.glyph(), point.len()),
                None => " . ".to_string(),
            }
        };

        let mut out = String::new();
        let top: Vec<String> = (12..24).map(|i| format!("{i:>3}")).collect();
        out.push_str(&top.join(" "));
        out.push('\n');
        let top_cells: Vec<String> = (12..24).map(|i| format!("{:>3}", cell(i))).collect();
        out.push_str(&top_cells.join(" "));
        out.push('\n');
        out.push_str(&format!(
            "bar W:{} B:{}   off W:{} B:{}\n",
            self.bar.white, self.bar.black, self.off.white, self.off.black
        ));
        let bottom_cells: Vec<String> = (0..12).rev().map(|i| format!("{:>3}", cell(i))).collect();
        out.push_str(&bottom_cells.join(" "));
        out.push('\n');
        let bottom: Vec<String> = (0..12).rev().map(|i| format!("{i:>3}")).collect();
        out.push_str(&bottom.join(" "));
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if every checker of `color` sits in its home quadrant.
///
/// False while any checker waits on the bar. Borne-off checkers count as home.
#[instrument(skip(board))]
pub fn is_home_quadrant(color: Color, board: &Board) -> bool {
    if board.bar(color) > 0 {
        return false;
    }
    let home = color.home_range();
    (0..POINT_COUNT as u8)
        .filter(|idx| board.points[usize::from(*idx)].count_of(color) > 0)
        .all(|idx| home.contains(&idx))
}

/// Signed landing index for `color` moving `die` pips from `from`.
///
/// Entering from the bar lands on `die - 1` (White) or `24 - die` (Black).
/// There is no wrap: a result outside 0–23 is a bear-off candidate.
pub fn target_point(color: Color, from: Source, die: u8) -> i8 {
    from.origin(color) + color.direction() * die as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_layout_counts() {
        let board = Board::new();
        assert_eq!(board.point(0).map(Point::len), Some(2));
        assert_eq!(board.point(5).and_then(Point::owner), Some(Color::Black));
        assert_eq!(board.point(18).map(|p| p.count_of(Color::White)), Some(5));
        assert_eq!(board.point(23).map(|p| p.count_of(Color::Black)), Some(2));
        assert_eq!(board.checker_total(Color::White), 15);
        assert_eq!(board.checker_total(Color::Black), 15);
    }

    #[test]
    fn test_target_point_directions() {
        assert_eq!(target_point(Color::White, Source::Point(0), 6), 6);
        assert_eq!(target_point(Color::Black, Source::Point(5), 6), -1);
        assert_eq!(target_point(Color::White, Source::Bar, 3), 2);
        assert_eq!(target_point(Color::Black, Source::Bar, 3), 21);
        assert_eq!(target_point(Color::White, Source::Point(22), 5), 27);
    }

    #[test]
    fn test_home_quadrant_rejects_bar_and_stragglers() {
        let mut board = Board::empty();
        board.place(2, Color::Black, 10).set_off(Color::Black, 5);
        assert!(is_home_quadrant(Color::Black, &board));

        board.set_bar(Color::Black, 1);
        assert!(!is_home_quadrant(Color::Black, &board));

        board.set_bar(Color::Black, 0).place(6, Color::Black, 1);
        assert!(!is_home_quadrant(Color::Black, &board));
    }

    #[test]
    fn test_opening_is_not_home() {
        let board = Board::new();
        assert!(!is_home_quadrant(Color::White, &board));
        assert!(!is_home_quadrant(Color::Black, &board));
    }

    #[test]
    fn test_blocks_only_on_two_or_more() {
        let mut board = Board::empty();
        board.place(4, Color::Black, 1).place(9, Color::Black, 2);
        assert!(!board.point(4).is_some_and(|p| p.blocks(Color::White)));
        assert!(board.point(9).is_some_and(|p| p.blocks(Color::White)));
    }

    #[test]
    fn test_display_mentions_bar_and_off() {
        let text = Board::new().display();
        assert!(text.contains("bar W:0 B:0"));
        assert!(text.contains("W2"));
    }
}
