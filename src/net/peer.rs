//! Peer client linking a local session to a relay room.

use super::protocol::{ClientMessage, ServerMessage};
use crate::session::SessionHandle;
use backgammon_engine::{Rejection, RoomId};
use derive_more::{Display, Error, From};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, instrument, warn};

/// Failures of the peer link.
#[derive(Debug, Display, Error, From)]
pub enum NetError {
    /// Transport failure.
    #[display("websocket error: {_0}")]
    WebSocket(tokio_tungstenite::tungstenite::Error),
    /// A frame that is not a valid protocol message.
    #[display("malformed message: {_0}")]
    Codec(serde_json::Error),
    /// The local session refused or went away.
    #[display("session error: {_0}")]
    Session(Rejection),
    /// The relay refused the join.
    #[display("room {room} is full")]
    #[from(ignore)]
    RoomFull {
        /// Room that was full.
        room: RoomId,
    },
}

/// Keeps one session in sync with the other seat of a room.
///
/// Every change accepted on this device is sent as a whole-state snapshot.
/// Every snapshot from the relay replaces the local state outright.
#[derive(Debug, Clone)]
pub struct PeerClient {
    session: SessionHandle,
    url: String,
    room: RoomId,
}

impl PeerClient {
    /// Creates a client for `room` on the relay at `url`.
    pub fn new(session: SessionHandle, url: impl Into<String>, room: impl Into<RoomId>) -> Self {
        Self {
            session,
            url: url.into(),
            room: room.into(),
        }
    }

    /// Connects, joins and syncs until the relay or the session closes.
    #[instrument(skip(self), fields(url = %self.url, room = %self.room))]
    pub async fn run(self) -> Result<(), NetError> {
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        info!("Connected to relay");
        let (mut sink, mut stream) = ws_stream.split();

        let join = ClientMessage::Join {
            room: self.room.clone(),
        };
        sink.send(encode(&join)?).await?;

        let mut updates = self.session.subscribe();
        let mut last_sent = updates.borrow_and_update().local_revision;

        loop {
            tokio::select! {
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let message: ServerMessage = serde_json::from_str(text.as_str())?;
                        self.handle(message).await?;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Relay closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                },
                changed = updates.changed() => {
                    if changed.is_err() {
                        info!("Session closed, leaving room");
                        break;
                    }
                    let published = updates.borrow_and_update().clone();
                    if published.local_revision > last_sent {
                        last_sent = published.local_revision;
                        debug!(revision = published.revision, "Sending snapshot");
                        let message = ClientMessage::State {
                            state: Box::new(published.state),
                        };
                        sink.send(encode(&message)?).await?;
                    }
                }
            }
        }

        if let Err(err) = sink.close().await {
            debug!(%err, "Close handshake failed");
        }
        Ok(())
    }

    async fn handle(&self, message: ServerMessage) -> Result<(), NetError> {
        match message {
            ServerMessage::Welcome { room, color } => {
                info!(room = %room, color = %color, "Seated");
                self.session.seat(color).await?;
            }
            ServerMessage::PeerStatus { connected } => {
                info!(connected, "Peer status changed");
                self.session.peer_connected(connected).await?;
            }
            ServerMessage::State { state } => {
                debug!(turn = %state.turn(), "Applying remote snapshot");
                self.session.apply_remote(*state).await?;
            }
            ServerMessage::RoomFull { room } => return Err(NetError::RoomFull { room }),
            ServerMessage::Error { message } => warn!(%message, "Relay reported an error"),
        }
        Ok(())
    }
}

fn encode(message: &ClientMessage) -> Result<Message, serde_json::Error> {
    Ok(Message::Text(serde_json::to_string(message)?.into()))
}
