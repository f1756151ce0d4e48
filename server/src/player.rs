//! A connected player's session: the outbound send queue and the inbound
//! frame channel, whichever component currently holds the player reads
//! from.
//!
//! Grounded on the spec's own vocabulary (`Player.conn`, `Player.out`) and
//! the teacher's habit of giving each concurrent participant an owned,
//! non-shared handle rather than a reference into shared state.

use std::time::Duration;

use chess_core::Color;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::frame::Frame;

/// Outbound frames queued for a player but not yet written to the socket.
/// Capacity is small and bounded: a slow client blocks only its own sends,
/// never the opponent's, per the backpressure model.
pub const OUT_QUEUE_CAPACITY: usize = 8;

/// How long `alive()` waits for a `pong` before giving up on a waiter.
const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);

/// The floor below which a mover's remaining clock is never allowed to
/// drop after a successful move, so that a move which truly arrived in
/// time is never retroactively flagged as a timeout.
pub const CLOCK_FLOOR: Duration = Duration::from_millis(10);

/// A live connection, owned by whichever task currently needs to read
/// from or write to it: the matcher while waiting, a game runner once
/// paired.
pub struct Player {
    out: mpsc::Sender<Frame>,
    inbox: mpsc::Receiver<Frame>,
    pub color: Option<Color>,
    pub remaining: Duration,
}

impl Player {
    pub fn new(out: mpsc::Sender<Frame>, inbox: mpsc::Receiver<Frame>, remaining: Duration) -> Self {
        Player {
            out,
            inbox,
            color: None,
            remaining,
        }
    }

    /// Queues `frame` for delivery. `false` means the send side queue has
    /// already filled or the connection has already torn down the
    /// receiving end — the caller treats this exactly like any other
    /// write failure.
    pub async fn send(&self, frame: Frame) -> bool {
        self.out.send(frame).await.is_ok()
    }

    /// Reads the next frame from the peer with no deadline. Returns `None`
    /// on disconnect (read error or EOF upstream).
    pub async fn recv(&mut self) -> Option<Frame> {
        self.inbox.recv().await
    }

    /// Reads the next frame from the peer, but gives up once `deadline`
    /// elapses. `Ok(None)` is a clean disconnect; `Err(_)` is a timeout.
    pub async fn recv_before(
        &mut self,
        deadline: tokio::time::Instant,
    ) -> Result<Option<Frame>, tokio::time::error::Elapsed> {
        tokio::time::timeout_at(deadline, self.inbox.recv()).await
    }

    /// Sends `ping` and waits briefly for `pong`. A waiter that fails this
    /// probe has likely navigated away; the matcher discards it rather
    /// than pairing it into a new game.
    pub async fn alive(&mut self) -> bool {
        if !self.send(Frame::Ping).await {
            return false;
        }
        matches!(
            timeout(LIVENESS_TIMEOUT, self.inbox.recv()).await,
            Ok(Some(Frame::Pong))
        )
    }

    /// Drops this player's sender, the single signal the session's sender
    /// task (and transitively the connection) uses to tear itself down.
    pub fn close(self) {
        drop(self);
    }
}
