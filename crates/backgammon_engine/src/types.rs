//! Core domain types for backgammon.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of points on the board.
pub const POINT_COUNT: usize = 24;

/// Checkers each color owns for the whole game.
pub const CHECKERS_PER_COLOR: u8 = 15;

/// A checker color.
///
/// White travels toward higher point indices and bears off past 23.
/// Black travels toward lower point indices and bears off past 0.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Moves 0 → 23, home 18–23.
    White,
    /// Moves 23 → 0, home 0–5.
    Black,
}

impl Color {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Signed step applied to a point index per pip.
    pub fn direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Inclusive range of point indices forming this color's home quadrant.
    pub fn home_range(self) -> std::ops::RangeInclusive<u8> {
        match self {
            Color::White => 18..=23,
            Color::Black => 0..=5,
        }
    }

    /// Single-character marker used by the text board.
    pub fn glyph(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

/// A value kept once per color (bar counts, off counts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerColor<T> {
    /// White's value.
    pub white: T,
    /// Black's value.
    pub black: T,
}

impl<T> Index<Color> for PerColor<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

impl<T> IndexMut<Color> for PerColor<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

/// Where a checker is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The mover's bar.
    Bar,
    /// A board point, 0–23.
    Point(u8),
}

impl Source {
    /// Signed index of the source; the bar is `-1` for White and `24` for Black,
    /// one pip behind the entry points.
    pub fn origin(self, color: Color) -> i8 {
        match (self, color) {
            (Source::Point(idx), _) => idx as i8,
            (Source::Bar, Color::White) => -1,
            (Source::Bar, Color::Black) => 24,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Bar => write!(f, "bar"),
            Source::Point(idx) => write!(f, "{idx}"),
        }
    }
}

/// Where a checker is taken to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// A board point, 0–23.
    Point(u8),
    /// Borne off the board.
    Off,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Off => write!(f, "off"),
            Target::Point(idx) => write!(f, "{idx}"),
        }
    }
}

/// A pair of rolled dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    /// First die, 1–6.
    pub first: u8,
    /// Second die, 1–6.
    pub second: u8,
}

impl DiceRoll {
    /// Creates a roll from two die faces.
    pub fn new(first: u8, second: u8) -> Self {
        Self { first, second }
    }

    /// Returns true when both faces match.
    pub fn is_double(&self) -> bool {
        self.first == self.second
    }

    /// Expands the roll into usable move values: four for doubles, two otherwise.
    pub fn moves(&self) -> Vec<u8> {
        if self.is_double() {
            vec![self.first; 4]
        } else {
            vec![self.first, self.second]
        }
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Operating mode of a game session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Two players sharing one device.
    #[default]
    Local,
    /// Local player against the scripted opponent.
    Computer,
    /// Two devices synchronized through a relay.
    Network,
}

/// Who is asking for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Initiator {
    /// A seated player acting for one color; turn ownership is enforced.
    Player(Color),
    /// Internal scheduling (the opponent driver); turn ownership is not checked.
    Scheduler,
}

impl Initiator {
    /// Returns true if this initiator may act while `turn` is to move.
    pub fn owns_turn(self, turn: Color) -> bool {
        match self {
            Initiator::Player(color) => color == turn,
            Initiator::Scheduler => true,
        }
    }
}
