//! Room relay.
//!
//! Seats at most two peers per room id and forwards whole-state snapshots
//! between them untouched. The last snapshot seen in a room is kept so a
//! peer joining a game in progress starts from it.

use super::protocol::{ClientMessage, ServerMessage};
use axum::Router;
use axum::extract::State as AxumState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use backgammon_engine::{Color, GameState, PerColor, RoomId};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument, warn};

type Outbox = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug, Clone)]
struct Seat {
    id: u64,
    outbox: Outbox,
}

#[derive(Debug, Default)]
struct Room {
    seats: PerColor<Option<Seat>>,
    latest: Option<Box<GameState>>,
}

impl Room {
    fn is_empty(&self) -> bool {
        self.seats.white.is_none() && self.seats.black.is_none()
    }

    fn free_color(&self) -> Option<Color> {
        if self.seats.white.is_none() {
            Some(Color::White)
        } else if self.seats.black.is_none() {
            Some(Color::Black)
        } else {
            None
        }
    }
}

/// Shared relay state.
#[derive(Debug, Clone, Default)]
pub struct Relay {
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
    next_id: Arc<AtomicU64>,
}

impl Relay {
    /// Creates an empty relay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Axum router exposing the relay on `/ws`.
    pub fn router(self) -> Router {
        Router::new()
            .route("/ws", get(ws_handler))
            .route("/healthz", get(healthz))
            .with_state(self)
    }

    /// Serves the relay until the listener fails.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        info!(addr = ?listener.local_addr().ok(), "Relay listening");
        axum::serve(listener, self.router()).await
    }

    /// Seats a new peer, or returns `None` if the room is full.
    async fn join(&self, room: &RoomId, outbox: Outbox) -> Option<(Color, u64)> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms.entry(room.clone()).or_default();
        let color = entry.free_color()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        entry.seats[color] = Some(Seat { id, outbox });
        let welcome = ServerMessage::Welcome {
            room: room.clone(),
            color,
        };
        send_to(&entry.seats[color], welcome);

        if entry.seats[color.opponent()].is_some() {
            for side in [color, color.opponent()] {
                send_to(&entry.seats[side], ServerMessage::PeerStatus { connected: true });
            }
        }
        if let Some(state) = &entry.latest {
            debug!(room = %room, to = %color, "Replaying game in progress");
            send_to(
                &entry.seats[color],
                ServerMessage::State {
                    state: state.clone(),
                },
            );
        }
        Some((color, id))
    }

    /// Records a snapshot and forwards it to the other seat in the room.
    async fn forward(&self, room: &RoomId, from: Color, state: Box<GameState>) {
        let mut rooms = self.rooms.lock().await;
        if let Some(entry) = rooms.get_mut(room) {
            entry.latest = Some(state.clone());
            send_to(&entry.seats[from.opponent()], ServerMessage::State { state });
        }
    }

    /// Frees a seat and tells whoever remains.
    async fn leave(&self, room: &RoomId, color: Color, id: u64) {
        let mut rooms = self.rooms.lock().await;
        let Some(entry) = rooms.get_mut(room) else {
            return;
        };
        if entry.seats[color].as_ref().map(|s| s.id) != Some(id) {
            return;
        }
        entry.seats[color] = None;
        send_to(
            &entry.seats[color.opponent()],
            ServerMessage::PeerStatus { connected: false },
        );
        if entry.is_empty() {
            rooms.remove(room);
            debug!(room = %room, "Room closed");
        }
    }
}

fn send_to(seat: &Option<Seat>, message: ServerMessage) {
    if let Some(seat) = seat {
        if seat.outbox.send(message).is_err() {
            debug!(seat = seat.id, "Seat outbox already closed");
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, AxumState(relay): AxumState<Relay>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, relay))
}

async fn healthz() -> &'static str {
    "ok"
}

#[instrument(skip_all)]
async fn handle_socket(socket: WebSocket, relay: Relay) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let write_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let payload = match serde_json::to_string(&message) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(%err, "Failed to encode relay message");
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let mut seat: Option<(RoomId, Color, u64)> = None;

    while let Some(Ok(message)) = receiver.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let inbound = match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(inbound) => inbound,
            Err(err) => {
                warn!(?err, "Invalid inbound message");
                send_error(&tx, format!("malformed message: {err}"));
                continue;
            }
        };

        match inbound {
            ClientMessage::Join { .. } if seat.is_some() => {
                send_error(&tx, "already joined".to_string());
            }
            ClientMessage::Join { room } => match relay.join(&room, tx.clone()).await {
                Some((color, id)) => {
                    info!(room = %room, color = %color, "Peer seated");
                    seat = Some((room, color, id));
                }
                None => {
                    info!(room = %room, "Room full, refusing peer");
                    if tx.send(ServerMessage::RoomFull { room }).is_err() {
                        debug!("Refused peer already gone");
                    }
                    break;
                }
            },
            ClientMessage::State { state } => match &seat {
                Some((room, color, _)) => {
                    debug!(room = %room, from = %color, "Forwarding snapshot");
                    relay.forward(room, *color, state).await;
                }
                None => send_error(&tx, "join a room first".to_string()),
            },
        }
    }

    if let Some((room, color, id)) = seat {
        info!(room = %room, color = %color, "Peer left");
        relay.leave(&room, color, id).await;
    }

    // Let queued messages (such as RoomFull) drain before the socket closes.
    drop(tx);
    if write_task.await.is_err() {
        debug!("Relay writer task ended abnormally");
    }
}

fn send_error(tx: &Outbox, message: String) {
    if tx.send(ServerMessage::Error { message }).is_err() {
        debug!("Peer gone before error could be sent");
    }
}
