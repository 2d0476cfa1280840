//! Wire messages exchanged with the relay, JSON over WebSocket text frames.

use backgammon_engine::{Color, GameState, RoomId};
use serde::{Deserialize, Serialize};

/// Messages a peer sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Claim a seat in `room`. Must be the first message.
    Join {
        /// Room to join.
        room: RoomId,
    },
    /// Whole-state snapshot for the other seat.
    State {
        /// The sender's state after its latest accepted change.
        state: Box<GameState>,
    },
}

/// Messages the relay sends to a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Seat assigned after a join.
    Welcome {
        /// Room joined.
        room: RoomId,
        /// Color this peer plays.
        color: Color,
    },
    /// The other seat connected or left.
    PeerStatus {
        /// True while the other seat is occupied.
        connected: bool,
    },
    /// Snapshot relayed from the other seat.
    State {
        /// The other peer's state.
        state: Box<GameState>,
    },
    /// Both seats are taken.
    RoomFull {
        /// Room that refused the join.
        room: RoomId,
    },
    /// Protocol misuse.
    Error {
        /// What went wrong.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_wire_shape() {
        let json = serde_json::to_value(ClientMessage::Join {
            room: "den".to_string(),
        })
        .expect("serialize");
        assert_eq!(json, serde_json::json!({"type": "join", "room": "den"}));
    }

    #[test]
    fn test_welcome_parses() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type":"welcome","room":"den","color":"black"}"#)
                .expect("parse");
        assert_eq!(
            msg,
            ServerMessage::Welcome {
                room: "den".to_string(),
                color: Color::Black
            }
        );
    }
}
