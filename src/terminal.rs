//! Line-oriented terminal client.
//!
//! Reads commands from an async line source and proposes them to the
//! session, printing the board whenever someone else changes it.

use crate::input::{BoardLayout, PointerEvent};
use crate::session::{Origin, Published, SessionHandle};
use anyhow::Result;
use backgammon_engine::{
    Action, Color, GameState, Initiator, Mode, Move, Source, Target, is_valid_move, legal_moves,
};
use derive_more::{Display, Error};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument};

const HELP: &str = "commands: roll | move <from> <to> [die] | pass | undo | board | hint | \
                    pick <x> <y> | drop <x> <y> | quit   (use `bar` and `off` for those zones)";

/// One parsed terminal command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Roll the dice.
    Roll,
    /// Move a checker; the die is inferred when omitted.
    Move {
        /// Source zone.
        from: Source,
        /// Destination zone.
        to: Target,
        /// Die to spend.
        die: Option<u8>,
    },
    /// Pass a blocked turn.
    Pass,
    /// Take back the last move of this turn.
    Undo,
    /// Print the board.
    Board,
    /// List playable moves.
    Hint,
    /// Simulated pointer gesture.
    Pointer(PointerEvent),
    /// Leave the game.
    Quit,
}

/// A line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CommandError {
    /// Nothing typed.
    #[display("empty command")]
    Empty,
    /// First word is not a command.
    #[display("unknown command `{word}`")]
    Unknown {
        /// The word typed.
        word: String,
    },
    /// Wrong arguments.
    #[display("usage: {usage}")]
    Usage {
        /// Expected form.
        usage: &'static str,
    },
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((head, args)) = words.split_first() else {
        return Err(CommandError::Empty);
    };

    let command = match (head.to_ascii_lowercase().as_str(), args) {
        ("roll" | "r", []) => Command::Roll,
        ("pass" | "p", []) => Command::Pass,
        ("undo" | "u", []) => Command::Undo,
        ("board" | "b", []) => Command::Board,
        ("hint" | "h", []) => Command::Hint,
        ("quit" | "q" | "exit", []) => Command::Quit,
        ("move" | "m", [from, to, rest @ ..]) if rest.len() <= 1 => {
            let usage = CommandError::Usage {
                usage: "move <0-23|bar> <0-23|off> [die]",
            };
            let from = parse_source(from).ok_or(usage.clone())?;
            let to = parse_target(to).ok_or(usage.clone())?;
            let die = match rest.first() {
                Some(die) => Some(die.parse::<u8>().map_err(|_| usage.clone())?),
                None => None,
            };
            Command::Move { from, to, die }
        }
        ("pick" | "drop", [x, y]) => {
            let usage = CommandError::Usage {
                usage: "pick|drop <x> <y>",
            };
            let x = x.parse::<f32>().map_err(|_| usage.clone())?;
            let y = y.parse::<f32>().map_err(|_| usage)?;
            if head.eq_ignore_ascii_case("pick") {
                Command::Pointer(PointerEvent::Pick { x, y })
            } else {
                Command::Pointer(PointerEvent::Release { x, y })
            }
        }
        ("move" | "m", _) => {
            return Err(CommandError::Usage {
                usage: "move <0-23|bar> <0-23|off> [die]",
            });
        }
        ("pick" | "drop", _) => {
            return Err(CommandError::Usage {
                usage: "pick|drop <x> <y>",
            });
        }
        (word, _) => {
            return Err(CommandError::Unknown {
                word: word.to_string(),
            });
        }
    };
    Ok(command)
}

fn parse_source(token: &str) -> Option<Source> {
    if token.eq_ignore_ascii_case("bar") {
        return Some(Source::Bar);
    }
    token.parse::<u8>().ok().filter(|i| *i < 24).map(Source::Point)
}

fn parse_target(token: &str) -> Option<Target> {
    if token.eq_ignore_ascii_case("off") {
        return Some(Target::Off);
    }
    token.parse::<u8>().ok().filter(|i| *i < 24).map(Target::Point)
}

/// Picks the first remaining die that makes `from -> to` legal, falling back
/// to the first die so the engine reports why nothing fits.
pub fn infer_die(state: &GameState, color: Color, from: Source, to: Target) -> Option<u8> {
    state
        .moves_left()
        .iter()
        .copied()
        .find(|die| is_valid_move(state, color, &Move::new(from, to, *die)))
        .or_else(|| state.moves_left().first().copied())
}

/// Renders the board and a status line.
pub fn describe(state: &GameState) -> String {
    let mut out = state.board().display();
    out.push('\n');
    out.push_str(&format!("{}", state.phase()));
    if let Some(dice) = state.dice() {
        out.push_str(&format!("   dice {}   left {:?}", dice, state.moves_left()));
    }
    if let Some(grab) = state.grab() {
        out.push_str(&format!("   holding {} from {}", grab.color, grab.from));
    }
    if state.mode() == Mode::Network {
        out.push_str(&format!("   you are {} ({:?})", state.local_color(), state.status()));
    }
    out
}

/// Terminal front end for one session.
#[derive(Debug, Clone)]
pub struct Terminal {
    session: SessionHandle,
    layout: BoardLayout,
}

impl Terminal {
    /// Creates a terminal bound to `session`.
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
            layout: BoardLayout::default(),
        }
    }

    /// Runs until `quit`, end of input, or the end of the session.
    #[instrument(skip_all)]
    pub async fn run<R, W>(self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut updates = self.session.subscribe();
        let initial = updates.borrow_and_update().state.clone();
        writeln!(out, "{}\n{}", describe(&initial), HELP)?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("Input closed");
                        break;
                    };
                    match parse_command(&line) {
                        Ok(Command::Quit) => break,
                        Ok(command) => {
                            let seen = self.session.current();
                            self.execute(command, seen, out).await?;
                        }
                        Err(CommandError::Empty) => {}
                        Err(err) => writeln!(out, "{err}\n{HELP}")?,
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let published = updates.borrow_and_update().clone();
                    if published.origin != Origin::Local {
                        writeln!(out, "{}", describe(&published.state))?;
                    }
                    if let Some(winner) = published.state.winner() {
                        writeln!(out, "{winner} wins the game")?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Proposes `command` against the state in `seen`.
    ///
    /// The proposal carries the revision it was read at, so it is refused
    /// as stale if anything landed in between.
    async fn execute<W: Write>(
        &self,
        command: Command,
        seen: Published,
        out: &mut W,
    ) -> Result<()> {
        let Published {
            state, revision, ..
        } = seen;
        let color = match state.mode() {
            Mode::Local => state.turn(),
            Mode::Computer | Mode::Network => state.local_color(),
        };
        let initiator = Initiator::Player(color);

        let action = match command {
            Command::Roll => Action::Roll,
            Command::Pass => Action::Pass,
            Command::Undo => Action::Undo,
            Command::Move { from, to, die } => {
                let die = die.or_else(|| infer_die(&state, color, from, to));
                match die {
                    Some(die) => Action::Move(Move::new(from, to, die)),
                    None => {
                        writeln!(out, "roll first")?;
                        return Ok(());
                    }
                }
            }
            Command::Pointer(event) => match self.layout.translate(event) {
                Some(action) => action,
                None => {
                    writeln!(out, "nothing to pick there")?;
                    return Ok(());
                }
            },
            Command::Board => {
                writeln!(out, "{}", describe(&state))?;
                return Ok(());
            }
            Command::Hint => {
                let moves = legal_moves(&state);
                if moves.is_empty() {
                    writeln!(out, "no playable moves")?;
                } else {
                    let listed: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                    writeln!(out, "{}", listed.join(", "))?;
                }
                return Ok(());
            }
            Command::Quit => return Ok(()),
        };

        debug!(?action, color = %color, revision, "Proposing");
        match self.session.propose_at(initiator, revision, action).await {
            Ok(accepted) => {
                debug!(effect = ?accepted.effect, revision = accepted.revision, "Accepted");
                writeln!(out, "{}", describe(&self.session.current().state))?;
            }
            Err(rejection) => writeln!(out, "rejected: {rejection}")?,
        }
        Ok(())
    }
}
