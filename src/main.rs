//! Strictly Backgammon - Unified CLI
//!
//! Relay server, terminal play and networked play from one binary.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, PlayMode};
use strictly_backgammon::{
    AppConfig, Color, DiceSource, GameState, Mode, OpponentDriver, PeerClient, RandomDice, Relay,
    Session, Terminal,
};
use tokio::io::BufReader;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Relay { port, host } => run_relay(&config, host, port).await,
        Command::Play { mode, color, seed } => {
            run_play(config.with_dice_seed(seed), mode, color).await
        }
        Command::Join { room, url, seed } => run_join(config.with_dice_seed(seed), room, url).await,
    }
}

fn dice_for(config: &AppConfig) -> Box<dyn DiceSource> {
    match config.dice_seed() {
        Some(seed) => Box::new(RandomDice::seeded(*seed)),
        None => Box::new(RandomDice::new()),
    }
}

/// Run the room relay
#[instrument(skip(config))]
async fn run_relay(config: &AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.relay_host().clone());
    let port = port.unwrap_or(*config.relay_port());
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind relay to {addr}"))?;
    info!(%addr, "Starting relay");

    Relay::new().serve(listener).await?;
    Ok(())
}

/// Play on this terminal
#[instrument(skip(config))]
async fn run_play(config: AppConfig, mode: PlayMode, color: Color) -> Result<()> {
    let mode = match mode {
        PlayMode::Local => Mode::Local,
        PlayMode::Computer => Mode::Computer,
    };
    let session = Session::spawn(GameState::new(mode, color), dice_for(&config));

    let driver = (mode == Mode::Computer).then(|| {
        OpponentDriver::new(session.clone(), color.opponent(), config.think_delay()).spawn()
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let result = Terminal::new(session.clone())
        .run(stdin, &mut std::io::stdout())
        .await;

    session.shutdown().await;
    if let Some(driver) = driver {
        if let Err(err) = driver.await {
            warn!(%err, "Opponent driver ended abnormally");
        }
    }
    result
}

/// Play a remote peer through a relay
#[instrument(skip(config))]
async fn run_join(config: AppConfig, room: String, url: Option<String>) -> Result<()> {
    let url = url.unwrap_or_else(|| config.relay_url().clone());
    // Seat color is provisional until the relay assigns one.
    let state = GameState::new(Mode::Network, Color::White).with_room(room.clone());
    let session = Session::spawn(state, dice_for(&config));

    let client = PeerClient::new(session.clone(), url, room);
    let link_session = session.clone();
    let link = tokio::spawn(async move {
        let outcome = client.run().await;
        if outcome.is_err() {
            // Without a link the game cannot continue; end the terminal too.
            link_session.shutdown().await;
        }
        outcome
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let result = Terminal::new(session.clone())
        .run(stdin, &mut std::io::stdout())
        .await;

    session.shutdown().await;
    match link.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(%err, "Peer link failed"),
        Err(err) => warn!(%err, "Peer link ended abnormally"),
    }
    result
}
