//! Pairs waiting players into games, two at a time.
//!
//! Grounded directly on the pseudocode in the service's design notes:
//! holds the oldest waiter, probes it for liveness only once a second
//! candidate arrives (amortizing the probe cost), and replaces a dead
//! holder with the candidate rather than discarding both.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::game;
use crate::player::Player;

/// Runs until the waiting-pool channel closes (which happens only at
/// process shutdown, since the HTTP layer holds a sender for the lifetime
/// of the server).
pub async fn run(mut waiting: mpsc::Receiver<Player>, time_limit: Duration) {
    let Some(mut hold) = waiting.recv().await else {
        return;
    };

    loop {
        let Some(cand) = waiting.recv().await else {
            hold.close();
            return;
        };

        if hold.alive().await {
            tokio::spawn(game::run(hold, cand, time_limit));
            hold = match waiting.recv().await {
                Some(next) => next,
                None => return,
            };
        } else {
            hold.close();
            hold = cand;
        }
    }
}
