//! Two peers playing through a relay on a loopback port.

use std::time::Duration;
use strictly_backgammon::{
    Action, Color, GameState, Initiator, Mode, Move, NetError, Origin, PeerClient, Published,
    Rejection, Relay, ScriptedDice, Session, SessionHandle, Source, Status, Target,
    TransitionError,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(10);

async fn start_relay() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(Relay::new().serve(listener));
    format!("ws://{addr}/ws")
}

fn network_session(room: &str, rolls: Vec<(u8, u8)>) -> SessionHandle {
    Session::spawn(
        GameState::new(Mode::Network, Color::White).with_room(room),
        Box::new(ScriptedDice::new(rolls)),
    )
}

fn link(session: &SessionHandle, url: &str, room: &str) -> JoinHandle<Result<(), NetError>> {
    tokio::spawn(PeerClient::new(session.clone(), url, room).run())
}

async fn wait_until(handle: &SessionHandle, what: impl Fn(&Published) -> bool) -> Published {
    let mut rx = handle.subscribe();
    let published = timeout(WAIT, rx.wait_for(|p| what(p)))
        .await
        .expect("timed out waiting for state")
        .expect("session closed");
    published.clone()
}

#[tokio::test]
async fn test_peers_sync_whole_state_through_relay() {
    let url = start_relay().await;

    let alice = network_session("den", vec![(3, 1)]);
    let alice_link = link(&alice, &url, "den");
    // Seat assignment is the first system change.
    wait_until(&alice, |p| p.origin == Origin::System).await;

    let bob = network_session("den", vec![(6, 5)]);
    let bob_link = link(&bob, &url, "den");

    let seated = wait_until(&bob, |p| {
        p.state.local_color() == Color::Black && p.state.status() == Status::Playing
    })
    .await;
    assert_eq!(seated.state.room(), Some("den"));
    wait_until(&alice, |p| p.state.status() == Status::Playing).await;
    assert_eq!(alice.current().state.local_color(), Color::White);

    // Bob cannot act on White's turn.
    let err = bob
        .propose(Initiator::Player(Color::Black), Action::Roll)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Rejection::IllegalTransition(TransitionError::NotYourTurn { .. })
    ));

    let white = Initiator::Player(Color::White);
    alice.propose(white, Action::Roll).await.expect("roll");
    alice
        .propose(white, Action::Move(Move::new(Source::Point(16), Target::Point(19), 3)))
        .await
        .expect("first move");

    let mirrored = wait_until(&bob, |p| p.origin == Origin::Remote && p.state.moves_left() == [1]).await;
    assert_eq!(mirrored.state.local_color(), Color::Black);
    assert_eq!(mirrored.state.board().point(19).map(|p| p.len()), Some(1));

    alice
        .propose(white, Action::Move(Move::new(Source::Point(18), Target::Point(19), 1)))
        .await
        .expect("second move");
    wait_until(&bob, |p| p.state.turn() == Color::Black).await;

    // Bob's roll travels back with Bob's dice.
    bob.propose(Initiator::Player(Color::Black), Action::Roll)
        .await
        .expect("bob rolls");
    let on_alice = wait_until(&alice, |p| {
        p.origin == Origin::Remote && p.state.turn() == Color::Black && !p.state.moves_left().is_empty()
    })
    .await;
    assert_eq!(on_alice.state.moves_left(), &[6, 5]);
    assert_eq!(on_alice.state.local_color(), Color::White);

    // A disconnect puts the remaining seat back to waiting.
    bob.shutdown().await;
    timeout(WAIT, bob_link)
        .await
        .expect("bob link ends")
        .expect("bob link task")
        .expect("bob link closes cleanly");
    wait_until(&alice, |p| p.state.status() == Status::WaitingForPeer).await;

    alice.shutdown().await;
    timeout(WAIT, alice_link)
        .await
        .expect("alice link ends")
        .expect("alice link task")
        .expect("alice link closes cleanly");
}

#[tokio::test]
async fn test_rejoining_peer_picks_up_game_in_progress() {
    let url = start_relay().await;

    let alice = network_session("again", vec![(3, 1)]);
    let _alice_link = link(&alice, &url, "again");
    wait_until(&alice, |p| p.origin == Origin::System).await;

    let bob = network_session("again", vec![(6, 5)]);
    let bob_link = link(&bob, &url, "again");
    wait_until(&alice, |p| p.state.status() == Status::Playing).await;

    let white = Initiator::Player(Color::White);
    alice.propose(white, Action::Roll).await.expect("roll");
    for mv in [
        Move::new(Source::Point(16), Target::Point(19), 3),
        Move::new(Source::Point(18), Target::Point(19), 1),
    ] {
        alice.propose(white, Action::Move(mv)).await.expect("move");
    }
    wait_until(&bob, |p| p.state.turn() == Color::Black).await;

    bob.shutdown().await;
    timeout(WAIT, bob_link)
        .await
        .expect("bob link ends")
        .expect("bob link task")
        .expect("bob link closes cleanly");
    wait_until(&alice, |p| p.state.status() == Status::WaitingForPeer).await;

    // A fresh device in the same seat starts from the game, not the opening.
    let bob_again = network_session("again", vec![(6, 5)]);
    let _bob_again_link = link(&bob_again, &url, "again");
    let resumed = wait_until(&bob_again, |p| {
        p.origin == Origin::Remote
            && p.state.turn() == Color::Black
            && p.state.status() == Status::Playing
    })
    .await;
    assert_eq!(resumed.state.local_color(), Color::Black);
    assert_eq!(resumed.state.board().point(19).map(|p| p.len()), Some(2));
    wait_until(&alice, |p| p.state.status() == Status::Playing).await;

    bob_again
        .propose(Initiator::Player(Color::Black), Action::Roll)
        .await
        .expect("rejoined seat rolls");
    let on_alice = wait_until(&alice, |p| {
        p.origin == Origin::Remote && p.state.moves_left() == [6, 5]
    })
    .await;
    assert_eq!(on_alice.state.turn(), Color::Black);
}

#[tokio::test]
async fn test_third_peer_is_refused() {
    let url = start_relay().await;

    let first = network_session("full", vec![(1, 2)]);
    let _first_link = link(&first, &url, "full");
    wait_until(&first, |p| p.origin == Origin::System).await;

    let second = network_session("full", vec![(1, 2)]);
    let _second_link = link(&second, &url, "full");
    wait_until(&second, |p| p.state.status() == Status::Playing).await;

    let third = network_session("full", vec![(1, 2)]);
    let outcome = timeout(WAIT, link(&third, &url, "full"))
        .await
        .expect("third link ends")
        .expect("third link task");
    assert!(matches!(outcome, Err(NetError::RoomFull { room }) if room == "full"));
    assert_eq!(third.current().state.status(), Status::WaitingForPeer);
}
