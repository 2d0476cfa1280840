//! Computer opponent driver.
//!
//! Watches the session and, whenever the computer's color has something to
//! do, waits the think delay and submits one decision. Any state change
//! during the wait cancels it and the driver starts over from the new state.

use crate::session::{Published, SessionHandle};
use backgammon_engine::{Color, Initiator, Rejection, decide};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Plays one color of a session with the greedy policy.
#[derive(Debug, Clone)]
pub struct OpponentDriver {
    session: SessionHandle,
    color: Color,
    think_delay: Duration,
}

impl OpponentDriver {
    /// Creates a driver for `color`.
    pub fn new(session: SessionHandle, color: Color, think_delay: Duration) -> Self {
        Self {
            session,
            color,
            think_delay,
        }
    }

    /// Runs the driver on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drives until the game is won or the session goes away.
    #[instrument(skip(self), fields(color = %self.color))]
    pub async fn run(self) {
        let mut updates = self.session.subscribe();
        info!("Opponent driver started");

        loop {
            let current = updates.borrow_and_update().clone();
            if current.state.is_over() {
                info!(winner = ?current.state.winner(), "Game over, driver stopping");
                return;
            }

            if decide(&current.state, self.color).is_none() {
                if updates.changed().await.is_err() {
                    break;
                }
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.think_delay) => {}
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!("State changed while thinking, rescheduling");
                    continue;
                }
            }

            match self.act(&mut updates).await {
                Ok(()) => {}
                Err(Rejection::SessionClosed) => break,
                Err(Rejection::Stale { expected, actual }) => {
                    debug!(expected, actual, "Decision overtaken, rescheduling");
                }
                Err(err) => {
                    warn!(error = %err, "Decision rejected, waiting for a change");
                    if updates.changed().await.is_err() {
                        break;
                    }
                }
            }
        }
        info!("Session closed, driver stopping");
    }

    /// Re-reads the latest state and submits one decision against it.
    async fn act(&self, updates: &mut watch::Receiver<Published>) -> Result<(), Rejection> {
        let latest = updates.borrow_and_update().clone();
        let Some(action) = decide(&latest.state, self.color) else {
            return Ok(());
        };

        debug!(?action, revision = latest.revision, "Submitting decision");
        self.session
            .propose_at(Initiator::Scheduler, latest.revision, action)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use backgammon_engine::{Action, GameState, Mode, Move, ScriptedDice, Source, Target};

    #[tokio::test]
    async fn test_driver_rolls_and_plays_its_turn() {
        let session = Session::spawn(
            GameState::new(Mode::Computer, Color::White),
            Box::new(ScriptedDice::new([(3, 1), (6, 5)])),
        );
        let driver =
            OpponentDriver::new(session.clone(), Color::Black, Duration::from_millis(5)).spawn();

        let white = Initiator::Player(Color::White);
        session.propose(white, Action::Roll).await.expect("roll");
        for (from, to, die) in [(16, 19, 3), (18, 19, 1)] {
            let mv = Move::new(Source::Point(from), Target::Point(to), die);
            session.propose(white, Action::Move(mv)).await.expect("move");
        }

        let mut rx = session.subscribe();
        let back_to_white = rx
            .wait_for(|p| p.state.turn() == Color::White)
            .await
            .expect("driver finished its turn")
            .clone();
        assert!(back_to_white.state.moves_left().is_empty());
        assert_eq!(back_to_white.state.board().checker_total(Color::Black), 15);

        driver.abort();
    }

    #[tokio::test]
    async fn test_driver_stops_on_shutdown() {
        let session = Session::spawn(
            GameState::new(Mode::Computer, Color::White),
            Box::new(ScriptedDice::new([(3, 1)])),
        );
        let driver =
            OpponentDriver::new(session.clone(), Color::Black, Duration::from_millis(5)).spawn();

        session.shutdown().await;

        tokio::time::timeout(Duration::from_secs(1), driver)
            .await
            .expect("driver exits after teardown")
            .expect("driver task did not panic");
    }
}
