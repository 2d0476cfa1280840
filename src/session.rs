//! Session actor: the single owner of a live game.
//!
//! Every mutation, whether from the terminal, the opponent driver or a
//! remote peer, travels through one mpsc queue and is applied in arrival
//! order. Accepted mutations bump a revision and are published on a `watch`
//! channel tagged with their origin, so the network link can forward local
//! changes without echoing remote ones.

use backgammon_engine::{Action, Color, DiceSource, Effect, GameState, Initiator, Rejection};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument, warn};

const REQUEST_BUFFER: usize = 64;

/// Where a published state change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Initial state, before any mutation.
    Initial,
    /// A proposal accepted on this device.
    Local,
    /// A snapshot received from the peer.
    Remote,
    /// Seat assignment or peer presence.
    System,
}

/// A published state with its revision.
#[derive(Debug, Clone)]
pub struct Published {
    /// Monotonic counter, bumped on every accepted change.
    pub revision: u64,
    /// Source of the change.
    pub origin: Origin,
    /// Revision of the latest change accepted on this device.
    ///
    /// `watch` keeps only the newest value, so a local change can be
    /// overtaken by a remote or system one before a subscriber looks.
    pub local_revision: u64,
    /// Full state after the change.
    pub state: GameState,
}

/// Accepted proposal as seen by the caller.
#[derive(Debug, Clone)]
pub struct Accepted {
    /// What the action did.
    pub effect: Effect,
    /// Revision after applying it.
    pub revision: u64,
}

enum Request {
    Propose {
        initiator: Initiator,
        based_on: Option<u64>,
        action: Action,
        reply: oneshot::Sender<Result<Accepted, Rejection>>,
    },
    ApplyRemote {
        state: Box<GameState>,
    },
    Seat {
        color: Color,
    },
    PeerConnected {
        connected: bool,
    },
    Shutdown,
}

/// Cloneable handle for talking to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    published: watch::Receiver<Published>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Propose { action, .. } => write!(f, "Propose({:?})", action),
            Request::ApplyRemote { .. } => write!(f, "ApplyRemote"),
            Request::Seat { color } => write!(f, "Seat({})", color),
            Request::PeerConnected { connected } => write!(f, "PeerConnected({})", connected),
            Request::Shutdown => write!(f, "Shutdown"),
        }
    }
}

impl SessionHandle {
    /// Submits an action on behalf of `initiator`.
    pub async fn propose(
        &self,
        initiator: Initiator,
        action: Action,
    ) -> Result<Accepted, Rejection> {
        self.send_proposal(initiator, None, action).await
    }

    /// Submits an action that is only valid against revision `based_on`.
    ///
    /// Rejected as [`Rejection::Stale`] if the state moved on meanwhile.
    pub async fn propose_at(
        &self,
        initiator: Initiator,
        based_on: u64,
        action: Action,
    ) -> Result<Accepted, Rejection> {
        self.send_proposal(initiator, Some(based_on), action).await
    }

    async fn send_proposal(
        &self,
        initiator: Initiator,
        based_on: Option<u64>,
        action: Action,
    ) -> Result<Accepted, Rejection> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Propose {
                initiator,
                based_on,
                action,
                reply,
            })
            .await
            .map_err(|_| Rejection::SessionClosed)?;
        response.await.map_err(|_| Rejection::SessionClosed)?
    }

    /// Replaces the game with a peer's snapshot (last write wins).
    pub async fn apply_remote(&self, state: GameState) -> Result<(), Rejection> {
        self.send(Request::ApplyRemote {
            state: Box::new(state),
        })
        .await
    }

    /// Records the color the relay assigned to this device.
    pub async fn seat(&self, color: Color) -> Result<(), Rejection> {
        self.send(Request::Seat { color }).await
    }

    /// Records whether the opposing seat is occupied.
    pub async fn peer_connected(&self, connected: bool) -> Result<(), Rejection> {
        self.send(Request::PeerConnected { connected }).await
    }

    /// Stops the actor; later requests fail with [`Rejection::SessionClosed`].
    pub async fn shutdown(&self) {
        if self.send(Request::Shutdown).await.is_err() {
            debug!("Session already closed");
        }
    }

    async fn send(&self, request: Request) -> Result<(), Rejection> {
        self.requests
            .send(request)
            .await
            .map_err(|_| Rejection::SessionClosed)
    }

    /// Latest published state.
    pub fn current(&self) -> Published {
        self.published.borrow().clone()
    }

    /// Fresh subscription to state changes.
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.published.clone()
    }
}

/// The actor owning one [`GameState`] and its dice.
pub struct Session {
    state: GameState,
    dice: Box<dyn DiceSource>,
    revision: u64,
    local_revision: u64,
    requests: mpsc::Receiver<Request>,
    published: watch::Sender<Published>,
}

impl Session {
    /// Spawns the actor on the current runtime and returns its handle.
    ///
    /// The actor stops on [`SessionHandle::shutdown`] or once every handle
    /// has been dropped.
    pub fn spawn(state: GameState, dice: Box<dyn DiceSource>) -> SessionHandle {
        let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
        let (published_tx, published_rx) = watch::channel(Published {
            revision: 0,
            origin: Origin::Initial,
            local_revision: 0,
            state: state.clone(),
        });

        let session = Session {
            state,
            dice,
            revision: 0,
            local_revision: 0,
            requests: rx,
            published: published_tx,
        };
        tokio::spawn(session.run());

        SessionHandle {
            requests: tx,
            published: published_rx,
        }
    }

    #[instrument(skip(self), fields(mode = ?self.state.mode()))]
    async fn run(mut self) {
        info!("Session started");
        while let Some(request) = self.requests.recv().await {
            debug!(?request, revision = self.revision, "Handling request");
            match request {
                Request::Propose {
                    initiator,
                    based_on,
                    action,
                    reply,
                } => {
                    let result = self.propose(initiator, based_on, action);
                    if reply.send(result).is_err() {
                        debug!("Proposer went away before the reply");
                    }
                }
                Request::ApplyRemote { state } => {
                    self.state.overwrite_with(*state);
                    self.publish(Origin::Remote);
                }
                Request::Seat { color } => {
                    self.state.seat(color);
                    self.publish(Origin::System);
                }
                Request::PeerConnected { connected } => {
                    self.state.set_peer_connected(connected);
                    self.publish(Origin::System);
                }
                Request::Shutdown => break,
            }
        }
        info!(revision = self.revision, "Session closed");
    }

    fn propose(
        &mut self,
        initiator: Initiator,
        based_on: Option<u64>,
        action: Action,
    ) -> Result<Accepted, Rejection> {
        match based_on {
            Some(expected) if expected != self.revision => {
                warn!(expected, actual = self.revision, "Stale proposal");
                return Err(Rejection::Stale {
                    expected,
                    actual: self.revision,
                });
            }
            _ => {}
        }

        let effect = self.state.apply(initiator, action, self.dice.as_mut())?;
        self.publish(Origin::Local);
        Ok(Accepted {
            effect,
            revision: self.revision,
        })
    }

    fn publish(&mut self, origin: Origin) {
        self.revision += 1;
        if origin == Origin::Local {
            self.local_revision = self.revision;
        }
        // send_replace keeps the value current even with no live receivers.
        self.published.send_replace(Published {
            revision: self.revision,
            origin,
            local_revision: self.local_revision,
            state: self.state.clone(),
        });
    }
}
