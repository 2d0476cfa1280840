//! Complete, serializable game state.

use super::board::Board;
use super::phases::Phase;
use super::types::{Color, DiceRoll, Mode, Source};
use serde::{Deserialize, Serialize};

/// Most snapshots kept for undo; a turn never plays more than four moves.
pub const HISTORY_LIMIT: usize = 4;

/// Identifier of a networked room.
pub type RoomId = String;

/// Board and remaining dice before one move, enough to reverse it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Position before the move.
    pub board: Board,
    /// Remaining die values before the move.
    pub moves_left: Vec<u8>,
}

/// A checker held by the pointer between pick and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grab {
    /// Zone the checker was picked from.
    pub from: Source,
    /// Color of the held checker.
    pub color: Color,
}

/// Session-level status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Networked game without a second seat yet.
    WaitingForPeer,
    /// Moves are being played.
    #[default]
    Playing,
    /// A winner exists; nothing more is accepted.
    Finished,
}

/// Complete game state, shared whole between networked peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) dice: Option<DiceRoll>,
    pub(crate) moves_left: Vec<u8>,
    pub(crate) grab: Option<Grab>,
    pub(crate) status: Status,
    pub(crate) winner: Option<Color>,
    pub(crate) mode: Mode,
    pub(crate) local_color: Color,
    pub(crate) room: Option<RoomId>,
    pub(crate) history: Vec<Snapshot>,
    pub(crate) blocked: bool,
}

impl GameState {
    /// Creates a new game from the opening position, White to move.
    pub fn new(mode: Mode, local_color: Color) -> Self {
        Self {
            board: Board::new(),
            turn: Color::White,
            dice: None,
            moves_left: Vec::new(),
            grab: None,
            status: match mode {
                Mode::Network => Status::WaitingForPeer,
                Mode::Local | Mode::Computer => Status::Playing,
            },
            winner: None,
            mode,
            local_color,
            room: None,
            history: Vec::new(),
            blocked: false,
        }
    }

    /// Creates a local game from an arbitrary position with dice already rolled.
    ///
    /// The blocked flag is evaluated immediately, as after a roll.
    pub fn from_position(board: Board, turn: Color, moves_left: Vec<u8>) -> Self {
        let mut state = Self::new(Mode::Local, Color::White);
        state.board = board;
        state.turn = turn;
        if let [first, .., last] = moves_left.as_slice() {
            state.dice = Some(DiceRoll::new(*first, *last));
        } else if let [only] = moves_left.as_slice() {
            state.dice = Some(DiceRoll::new(*only, *only));
        }
        state.moves_left = moves_left;
        state.refresh_blocked();
        state
    }

    /// Sets the room identifier.
    pub fn with_room(mut self, room: impl Into<RoomId>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Color to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The last rolled pair, if dice are on the table.
    pub fn dice(&self) -> Option<DiceRoll> {
        self.dice
    }

    /// Die values still to play, in order.
    pub fn moves_left(&self) -> &[u8] {
        &self.moves_left
    }

    /// Checker currently held by the pointer.
    pub fn grab(&self) -> Option<Grab> {
        self.grab
    }

    /// Session status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The winner, once a color has borne off all fifteen.
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Play mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Color controlled on this device.
    pub fn local_color(&self) -> Color {
        self.local_color
    }

    /// Room identifier for networked games.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Undo stack for the current turn.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Returns true if dice remain but none of them can be played.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Returns true once a winner exists.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Derived phase of the turn state machine.
    pub fn phase(&self) -> Phase {
        Phase::of(self)
    }

    /// Replaces everything with a peer's state, keeping local identity.
    ///
    /// Mode, local color and room id describe this device, not the game, so
    /// they survive. The held checker is dropped.
    pub fn overwrite_with(&mut self, remote: GameState) {
        let mode = self.mode;
        let local_color = self.local_color;
        let room = self.room.take().or(remote.room.clone());
        *self = remote;
        self.mode = mode;
        self.local_color = local_color;
        self.room = room;
        self.grab = None;
    }

    /// Records which color this device plays.
    pub fn seat(&mut self, color: Color) {
        self.local_color = color;
    }

    /// Marks whether the opposing seat is connected.
    ///
    /// Only meaningful before a winner exists.
    pub fn set_peer_connected(&mut self, connected: bool) {
        if self.winner.is_some() {
            return;
        }
        self.status = if connected {
            Status::Playing
        } else {
            Status::WaitingForPeer
        };
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            moves_left: self.moves_left.clone(),
        }
    }

    pub(crate) fn push_history(&mut self, snapshot: Snapshot) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(snapshot);
    }

    pub(crate) fn refresh_blocked(&mut self) {
        self.blocked = !super::rules::has_any_legal_move(self);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Mode::Local, Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_game_waits_for_peer() {
        let state = GameState::new(Mode::Network, Color::Black);
        assert_eq!(state.status(), Status::WaitingForPeer);
        assert_eq!(state.local_color(), Color::Black);
    }

    #[test]
    fn test_overwrite_keeps_local_identity() {
        let mut mine = GameState::new(Mode::Network, Color::Black).with_room("abc");
        let mut theirs = GameState::new(Mode::Network, Color::White);
        theirs.turn = Color::Black;
        theirs.status = Status::Playing;

        mine.overwrite_with(theirs);

        assert_eq!(mine.turn(), Color::Black);
        assert_eq!(mine.local_color(), Color::Black);
        assert_eq!(mine.room(), Some("abc"));
        assert_eq!(mine.status(), Status::Playing);
    }

    #[test]
    fn test_state_survives_json() {
        let state = GameState::default().with_room("r1");
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = GameState::default();
        for _ in 0..HISTORY_LIMIT + 2 {
            let snap = state.snapshot();
            state.push_history(snap);
        }
        assert_eq!(state.history().len(), HISTORY_LIMIT);
    }
}
