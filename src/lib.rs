//! Strictly Backgammon - two-player backgammon on a strict rules engine
//!
//! The rules live in [`backgammon_engine`]; this crate wires them into a
//! running game.
//!
//! # Architecture
//!
//! - **Session**: an actor owning the game state; every mutation is queued
//! - **Driver**: the computer opponent, scheduled against state changes
//! - **Input**: pointer hit-testing that turns gestures into actions
//! - **Net**: a WebSocket room relay and the peer client that syncs with it
//! - **Terminal**: a line-oriented front end
//!
//! # Example
//!
//! ```no_run
//! use strictly_backgammon::{Color, GameState, Initiator, Action, Mode, RandomDice, Session};
//!
//! # async fn example() -> Result<(), strictly_backgammon::Rejection> {
//! let session = Session::spawn(GameState::new(Mode::Local, Color::White), Box::new(RandomDice::new()));
//! let accepted = session.propose(Initiator::Player(Color::White), Action::Roll).await?;
//! println!("{:?}", accepted.effect);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod driver;
mod input;
mod net;
mod session;
mod terminal;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError};

// Crate-level exports - Opponent driver
pub use driver::OpponentDriver;

// Crate-level exports - Pointer input
pub use input::{BoardLayout, PointerEvent, Zone};

// Crate-level exports - Networking
pub use net::{ClientMessage, NetError, PeerClient, Relay, ServerMessage};

// Crate-level exports - Session actor
pub use session::{Accepted, Origin, Published, Session, SessionHandle};

// Crate-level exports - Terminal client
pub use terminal::{Command, CommandError, Terminal, describe, infer_die, parse_command};

// Crate-level exports - Rules engine
pub use backgammon_engine::{
    Action, Board, Color, DiceRoll, DiceSource, Effect, GameState, Initiator, Mode, Move,
    MoveError, Phase, RandomDice, Rejection, RoomId, ScriptedDice, Source, Status, Target,
    TransitionError,
};
