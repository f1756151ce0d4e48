//! Exercises the matcher and game runner together through mock players —
//! no real TCP sockets, since neither component does any I/O of its own
//! beyond the channels a `Player` already abstracts over.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use server::frame::Frame;
use server::player::{Player, OUT_QUEUE_CAPACITY};
use server::matcher;
use tokio::sync::mpsc;

fn mock_player(remaining: Duration) -> (mpsc::Sender<Frame>, mpsc::Receiver<Frame>, Player) {
    let (out_tx, out_rx) = mpsc::channel(OUT_QUEUE_CAPACITY);
    let (in_tx, in_rx) = mpsc::channel(4);
    let player = Player::new(out_tx, in_rx, remaining);
    (in_tx, out_rx, player)
}

/// With N even simultaneous waiters, the matcher pairs every one of them
/// into a game — observed here as every connection receiving a `start`
/// frame.
#[tokio::test]
async fn n_waiters_are_paired_into_n_over_two_games() {
    const N: usize = 8;
    let (waiting_tx, waiting_rx) = mpsc::channel(64);

    let mut inboxes = Vec::with_capacity(N);
    let mut outboxes = Vec::with_capacity(N);
    for _ in 0..N {
        let (in_tx, out_rx, player) = mock_player(Duration::from_secs(60));
        waiting_tx.send(player).await.unwrap();
        inboxes.push(in_tx);
        outboxes.push(out_rx);
    }

    let matcher = tokio::spawn(matcher::run(waiting_rx, Duration::from_secs(60)));

    // Whichever waiter is currently the "holder" gets probed for liveness
    // first; every candidate is paired directly and sees `start` right
    // away. Either way, the very first frame on this channel tells us
    // which case we're in, and answering any ping must be followed by the
    // `start` that pairing sends.
    for (in_tx, out_rx) in inboxes.iter().zip(outboxes.iter_mut()) {
        let first = out_rx.recv().await.unwrap();
        let start_frame = match first {
            Frame::Ping => {
                in_tx.send(Frame::Pong).await.unwrap();
                out_rx.recv().await.unwrap()
            }
            other => other,
        };
        assert!(matches!(start_frame, Frame::Start { .. }));
    }

    drop(waiting_tx);
    let _ = matcher.await;
}

/// `numPlayers` reflects open sessions: a simple property test of the
/// counter itself, since the full accounting lives in the HTTP layer's
/// connect/disconnect bookkeeping.
#[tokio::test]
async fn num_players_counter_tracks_connect_and_disconnect() {
    let num_players = Arc::new(AtomicUsize::new(0));

    num_players.fetch_add(1, Ordering::Relaxed);
    num_players.fetch_add(1, Ordering::Relaxed);
    assert_eq!(num_players.load(Ordering::Relaxed), 2);

    num_players.fetch_sub(1, Ordering::Relaxed);
    assert_eq!(num_players.load(Ordering::Relaxed), 1);
}
