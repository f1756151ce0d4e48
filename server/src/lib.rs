//! Matchmaking, per-game coordination, and the websocket transport for a
//! real-time two-player chess service. `chess_core` supplies the rules;
//! everything here is about pairing live connections and keeping two
//! clocks honest while they play.

pub mod error;
pub mod frame;
pub mod game;
pub mod http;
pub mod matcher;
pub mod player;
pub mod stats;

pub use error::ServerError;
pub use http::AppState;
pub use player::Player;
