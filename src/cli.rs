//! Command-line interface for strictly_backgammon.

use backgammon_engine::Color;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Strictly Backgammon - two-player backgammon with a rules engine
#[derive(Parser, Debug)]
#[command(name = "strictly_backgammon")]
#[command(about = "Backgammon in the terminal, against the computer or a peer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the room relay for networked games
    Relay {
        /// Port to bind to (defaults to the config value)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the config value)
        #[arg(long)]
        host: Option<String>,
    },

    /// Play on this terminal, hot-seat or against the computer
    Play {
        /// Who controls the second color
        #[arg(short, long, value_enum, default_value_t = PlayMode::Computer)]
        mode: PlayMode,

        /// Color you play against the computer
        #[arg(long, default_value = "white")]
        color: Color,

        /// Seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Join a room on a relay and play a remote peer
    Join {
        /// Room identifier shared with the other player
        #[arg(short, long)]
        room: String,

        /// Relay WebSocket URL (defaults to the config value)
        #[arg(long)]
        url: Option<String>,

        /// Seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Offline play modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayMode {
    /// Both colors from this terminal
    Local,
    /// The computer plays the other color
    Computer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play_defaults() {
        let cli = Cli::parse_from(["strictly_backgammon", "play"]);
        match cli.command {
            Command::Play { mode, color, seed } => {
                assert_eq!(mode, PlayMode::Computer);
                assert_eq!(color, Color::White);
                assert_eq!(seed, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_join() {
        let cli = Cli::parse_from([
            "strictly_backgammon",
            "--config",
            "bg.toml",
            "join",
            "--room",
            "den",
            "--url",
            "ws://host:1/ws",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("bg.toml")));
        match cli.command {
            Command::Join { room, url, .. } => {
                assert_eq!(room, "den");
                assert_eq!(url.as_deref(), Some("ws://host:1/ws"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
