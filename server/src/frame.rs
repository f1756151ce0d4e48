//! Wire frames: one JSON object per message, discriminated by `cmd`.
//!
//! Field names are stable and case-sensitive, matching the service's wire
//! contract exactly (`remainingA`/`remainingB`, not `remaining_a`). Fields
//! the sender never populates (a client's `move` frame has no `history` or
//! clocks yet) are `Option`/defaulted rather than required, since the same
//! type is used for both directions.

use chess_core::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorWire {
    White,
    Black,
}

impl From<Color> for ColorWire {
    fn from(color: Color) -> Self {
        match color {
            Color::White => ColorWire::White,
            Color::Black => ColorWire::Black,
        }
    }
}

/// A single board coordinate pair as sent over the wire: `ax`/`ay` or
/// `bx`/`by`, zero-indexed file/rank.
pub type Coord = (u8, u8);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum Frame {
    Start {
        color: ColorWire,
        turn: u32,
        #[serde(rename = "remainingA")]
        remaining_a: u64,
        #[serde(rename = "remainingB")]
        remaining_b: u64,
    },
    Move {
        turn: u32,
        ax: u8,
        ay: u8,
        bx: u8,
        by: u8,
        white: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        history: Option<String>,
        #[serde(
            rename = "remainingA",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        remaining_a: Option<u64>,
        #[serde(
            rename = "remainingB",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        remaining_b: Option<u64>,
    },
    Select {
        turn: u32,
        ax: u8,
        ay: u8,
        white: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        moves: Vec<Coord>,
    },
    Msg {
        text: String,
    },
    Ping,
    Pong,
    Stat {
        #[serde(rename = "numPlayers")]
        num_players: usize,
    },
}

/// Converts a `Duration` to the wire's nanosecond integer, saturating
/// rather than panicking on a duration too large to fit (never happens at
/// real game time scales, but the conversion shouldn't be able to crash a
/// session over it).
pub fn nanos(duration: std::time::Duration) -> u64 {
    duration.as_nanos().min(u64::MAX as u128) as u64
}
