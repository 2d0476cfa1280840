//! Networked play: a room relay and the peer client that talks to it.

mod peer;
mod protocol;
mod relay;

pub use peer::{NetError, PeerClient};
pub use protocol::{ClientMessage, ServerMessage};
pub use relay::Relay;
