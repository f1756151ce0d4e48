//! Process entry point: flag parsing, logging, and the listener. Startup
//! failures (bad bind address) are fatal and reported via `ServerError`,
//! matching the policy that only connection- and game-level errors are
//! recoverable.
//!
//! Grounded on the teacher's `main.rs` (`#[tokio::main]`,
//! `tracing_subscriber::fmt::init()`, spawning the server inside Tokio),
//! generalized from an HTTP+Bevy hybrid onto a plain axum/websocket
//! service.

use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};

use server::error::ServerError;
use server::http::{self, AppState};
use server::matcher;

/// The waiting pool's bound: the spec requires capacity at least 64,
/// with arrivals past that refused rather than queued indefinitely.
const WAITING_POOL_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "chess-server", about = "Real-time two-player chess service")]
struct Cli {
    /// Listen address for the HTTP/WS surface.
    #[arg(long = "http", default_value = "0.0.0.0:8000")]
    http: SocketAddr,

    /// Per-side sudden-death time limit, e.g. "5m" or "90s".
    #[arg(long = "time", default_value = "5m", value_parser = parse_duration)]
    time: Duration,
}

fn parse_duration(text: &str) -> Result<Duration, String> {
    humantime::parse_duration(text).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    info!(addr = %cli.http, time_limit = ?cli.time, "starting chess server");

    let listener = tokio::net::TcpListener::bind(cli.http)
        .await
        .map_err(|source| ServerError::Bind {
            addr: cli.http.to_string(),
            source,
        })?;

    let (waiting_tx, waiting_rx) = mpsc::channel(WAITING_POOL_CAPACITY);
    let num_players = Arc::new(AtomicUsize::new(0));

    tokio::spawn(matcher::run(waiting_rx, cli.time));

    let state = AppState {
        waiting: waiting_tx,
        num_players,
        time_limit: cli.time,
    };
    let app = http::router(state);

    if let Err(source) = axum::serve(listener, app).await {
        error!(%source, "server loop exited with an error");
        return Err(ServerError::Serve(source));
    }

    Ok(())
}
