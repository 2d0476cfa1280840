//! Turn and dice state machine.
//!
//! `READY → roll → moving → (moves exhausted | pass) → next player`, with
//! `Finished` reachable after any move and `Blocked` as a flag over `moving`.
//! Every transition is computed on a copy and committed only on success, so
//! a rejected request leaves the state exactly as it was.

use super::action::{Action, Move, MoveError, Rejection, TransitionError};
use super::contracts::{ColoredMove, Contract, MoveContract};
use super::dice::DiceSource;
use super::executor::{Execution, execute};
use super::rules::{legal_moves, validate_move};
use super::state::{GameState, Grab, Status};
use super::types::{DiceRoll, Initiator, Source, Target};
use tracing::{debug, info, instrument, warn};

/// What an accepted action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Dice were rolled.
    Rolled(DiceRoll),
    /// A checker moved.
    Moved(Execution),
    /// The turn passed to the other color.
    Passed,
    /// The last move of the turn was reverted.
    Undone,
    /// An unplayable die was discarded.
    Forfeited(u8),
    /// A checker was picked up.
    Grabbed(Source),
    /// The held checker was dropped; `None` if the grab was cancelled.
    Released(Option<Execution>),
}

impl GameState {
    /// Applies `action` for `initiator`, committing only if it is accepted.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] and leaves `self` unchanged.
    #[instrument(skip(self, dice), fields(turn = %self.turn))]
    pub fn apply(
        &mut self,
        initiator: Initiator,
        action: Action,
        dice: &mut dyn DiceSource,
    ) -> Result<Effect, Rejection> {
        let mut next = self.clone();
        let result = match action {
            Action::Roll => next.roll(initiator, dice).map(Effect::Rolled),
            Action::Move(mv) => next.play(initiator, mv).map(Effect::Moved),
            Action::Pass => next.pass(initiator).map(|()| Effect::Passed),
            Action::Undo => next.undo(initiator).map(|()| Effect::Undone),
            Action::ForfeitDie { die } => next.forfeit_die(initiator, die).map(Effect::Forfeited),
            Action::Grab { from } => next.grab_checker(initiator, from).map(Effect::Grabbed),
            Action::Release { to } => next.release_checker(initiator, to).map(Effect::Released),
        };
        match result {
            Ok(effect) => {
                *self = next;
                Ok(effect)
            }
            Err(rejection) => {
                warn!(%rejection, ?action, "Action rejected");
                Err(rejection)
            }
        }
    }

    fn ensure_running(&self, initiator: Initiator) -> Result<(), TransitionError> {
        if self.winner.is_some() {
            return Err(TransitionError::GameOver);
        }
        if self.status == Status::WaitingForPeer {
            return Err(TransitionError::AwaitingPeer);
        }
        if !initiator.owns_turn(self.turn) {
            let color = match initiator {
                Initiator::Player(color) => color,
                Initiator::Scheduler => self.turn,
            };
            return Err(TransitionError::NotYourTurn { color });
        }
        Ok(())
    }

    fn ensure_rolled(&self) -> Result<(), TransitionError> {
        if self.moves_left.is_empty() {
            Err(TransitionError::NotRolled)
        } else {
            Ok(())
        }
    }

    fn roll(&mut self, initiator: Initiator, dice: &mut dyn DiceSource) -> Result<DiceRoll, Rejection> {
        if self.winner.is_some() {
            return Err(TransitionError::GameOver.into());
        }
        if !self.moves_left.is_empty() {
            return Err(TransitionError::MovesPending.into());
        }
        self.ensure_running(initiator)?;

        let roll = dice.roll();
        self.dice = Some(roll);
        self.moves_left = roll.moves();
        self.history.clear();
        self.grab = None;
        self.refresh_blocked();
        info!(color = %self.turn, %roll, blocked = self.blocked, "Dice rolled");
        Ok(roll)
    }

    fn play(&mut self, initiator: Initiator, mv: Move) -> Result<Execution, Rejection> {
        let color = match initiator {
            Initiator::Player(color) => color,
            Initiator::Scheduler => self.turn,
        };
        let action = ColoredMove { color, mv };
        MoveContract::pre(self, &action)?;

        #[cfg(debug_assertions)]
        let before = self.clone();
        self.grab = None;
        let execution = execute(self, color, &mv);
        self.settle_after_move();

        #[cfg(debug_assertions)]
        MoveContract::post(&before, self)?;

        info!(%color, mv = %mv, hit = execution.hit, "Move played");
        Ok(execution)
    }

    /// Win check, then blocked check, then turn swap.
    fn settle_after_move(&mut self) {
        let mover = self.turn;
        if self.board.has_borne_off_all(mover) {
            info!(winner = %mover, "Game won");
            self.winner = Some(mover);
            self.status = Status::Finished;
            self.moves_left.clear();
            self.history.clear();
            self.blocked = false;
            return;
        }
        if self.moves_left.is_empty() {
            self.end_turn();
        } else {
            self.refresh_blocked();
            if self.blocked {
                debug!(color = %mover, moves_left = ?self.moves_left, "No legal move for remaining dice");
            }
        }
    }

    fn end_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.dice = None;
        self.moves_left.clear();
        self.history.clear();
        self.blocked = false;
        self.grab = None;
        debug!(next = %self.turn, "Turn passes");
    }

    fn pass(&mut self, initiator: Initiator) -> Result<(), Rejection> {
        self.ensure_running(initiator)?;
        self.ensure_rolled()?;
        if !self.blocked && initiator != Initiator::Scheduler {
            return Err(TransitionError::NotBlocked.into());
        }
        info!(color = %self.turn, "Turn passed");
        self.end_turn();
        Ok(())
    }

    fn undo(&mut self, initiator: Initiator) -> Result<(), Rejection> {
        self.ensure_running(initiator)?;
        let snapshot = self.history.pop().ok_or(TransitionError::NothingToUndo)?;
        self.board = snapshot.board;
        self.moves_left = snapshot.moves_left;
        self.blocked = false;
        self.grab = None;
        info!(color = %self.turn, moves_left = ?self.moves_left, "Move undone");
        Ok(())
    }

    fn forfeit_die(&mut self, initiator: Initiator, die: u8) -> Result<u8, Rejection> {
        if initiator != Initiator::Scheduler {
            return Err(TransitionError::SchedulerOnly.into());
        }
        self.ensure_running(initiator)?;
        let Some(pos) = self.moves_left.iter().position(|d| *d == die) else {
            return Err(TransitionError::CannotForfeit { die }.into());
        };
        if legal_moves(self).iter().any(|mv| mv.die == die) {
            return Err(TransitionError::CannotForfeit { die }.into());
        }
        self.moves_left.remove(pos);
        info!(color = %self.turn, die, "Die forfeited");
        self.settle_after_move();
        Ok(die)
    }

    fn grab_checker(&mut self, initiator: Initiator, from: Source) -> Result<Source, Rejection> {
        self.ensure_running(initiator)?;
        self.ensure_rolled()?;
        let color = self.turn;
        if !self.board.has_checker_at(color, from) {
            let err = match from {
                Source::Bar => MoveError::NothingOnBar,
                Source::Point(point) => MoveError::NoCheckerAtSource { color, point },
            };
            return Err(err.into());
        }
        self.grab = Some(Grab { from, color });
        debug!(%from, "Checker grabbed");
        Ok(from)
    }

    fn release_checker(
        &mut self,
        initiator: Initiator,
        to: Option<Target>,
    ) -> Result<Option<Execution>, Rejection> {
        self.ensure_running(initiator)?;
        let grab = self.grab.ok_or(TransitionError::NothingGrabbed)?;
        let Some(to) = to else {
            self.grab = None;
            return Ok(None);
        };
        let mv = self.resolve_drop(grab, to)?;
        self.play(initiator, mv).map(Some)
    }

    /// Picks the first remaining die, in order, that makes `grab → to` legal.
    fn resolve_drop(&self, grab: Grab, to: Target) -> Result<Move, MoveError> {
        let mut first_error = None;
        for die in &self.moves_left {
            let mv = Move::new(grab.from, to, *die);
            match validate_move(self, grab.color, &mv) {
                Ok(()) => return Ok(mv),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or(MoveError::DieUnavailable { die: 0 }))
    }
}
