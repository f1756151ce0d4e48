//! The HTTP/WS surface: upgrade endpoint plus the static collaborators the
//! spec treats as out-of-scope content served from placeholder bytes (the
//! real client page and assets are an explicit non-goal of the core).
//!
//! Grounded on the teacher's axum usage in `trilltino-XFChess`'s
//! `api.rs`/`main.rs` (router construction, `with_state`, `axum::serve`),
//! generalized from a REST API onto a websocket upgrade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::frame::Frame;
use crate::player::{Player, OUT_QUEUE_CAPACITY};
use crate::stats;

#[derive(Clone)]
pub struct AppState {
    pub waiting: mpsc::Sender<Player>,
    pub num_players: Arc<AtomicUsize>,
    pub time_limit: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chess.js", get(chess_js))
        .route("/chess.css", get(chess_css))
        .route("/bg.png", get(bg_png))
        .route("/favicon.ico", get(favicon))
        .route("/ws", get(ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<!doctype html><title>chess</title><p>client page is served elsewhere.</p>",
    )
}

async fn chess_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        "// client script is served elsewhere.\n",
    )
}

async fn chess_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], "")
}

async fn bg_png() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], &[] as &[u8])
}

async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Owns one connection end to end: tracks it in `numPlayers`, splits the
/// socket into a single writer loop and a single reader loop, hands a
/// `Player` to the waiting pool, and tears everything down the moment the
/// player's `out` queue closes — whichever component (matcher or game
/// runner) closed it.
async fn handle_socket(socket: WebSocket, state: AppState) {
    state.num_players.fetch_add(1, Ordering::Relaxed);

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Frame>(OUT_QUEUE_CAPACITY);
    let (stats_tx, mut stats_rx) = mpsc::channel::<Frame>(1);
    let (in_tx, in_rx) = mpsc::channel::<Frame>(OUT_QUEUE_CAPACITY);

    let stats_task = tokio::spawn(stats::run(stats_tx, state.num_players.clone()));

    let player = Player::new(out_tx, in_rx, state.time_limit);
    if state.waiting.try_send(player).is_err() {
        debug!("waiting pool full or closed; refusing connection");
        stats_task.abort();
        state.num_players.fetch_sub(1, Ordering::Relaxed);
        let _ = ws_tx.close().await;
        return;
    }

    let writer = async {
        loop {
            tokio::select! {
                frame = out_rx.recv() => {
                    match frame {
                        Some(frame) => {
                            if write_frame(&mut ws_tx, &frame).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                frame = stats_rx.recv() => {
                    if let Some(frame) = frame {
                        if write_frame(&mut ws_tx, &frame).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    };

    let reader = async {
        while let Some(Ok(message)) = ws_rx.next().await {
            match message {
                Message::Text(text) => match serde_json::from_str::<Frame>(&text) {
                    Ok(frame) => {
                        if in_tx.send(frame).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "dropping malformed frame"),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    };

    tokio::select! {
        _ = writer => {}
        _ = reader => {}
    }

    stats_task.abort();
    state.num_players.fetch_sub(1, Ordering::Relaxed);
}

async fn write_frame(
    ws_tx: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    frame: &Frame,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(frame).expect("Frame always serializes");
    ws_tx.send(Message::Text(text.into())).await
}
