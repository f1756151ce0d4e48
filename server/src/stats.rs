//! Periodic player-count push, one task per connection.
//!
//! Grounded on the spec's own framing: a pure side-channel that also
//! doubles as a keepalive so intermediaries (reverse proxies, browsers)
//! don't time out an otherwise-idle websocket while a player waits or
//! thinks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::frame::Frame;

const BROADCAST_PERIOD: Duration = Duration::from_secs(20);

/// Sends `stat{numPlayers}` once immediately and then every
/// [`BROADCAST_PERIOD`], until the outbound queue refuses the send — which
/// happens once the connection's sender task has torn down.
pub async fn run(out: mpsc::Sender<Frame>, num_players: Arc<AtomicUsize>) {
    loop {
        let count = num_players.load(Ordering::Relaxed);
        if out.send(Frame::Stat { num_players: count }).await.is_err() {
            return;
        }
        tokio::time::sleep(BROADCAST_PERIOD).await;
    }
}
