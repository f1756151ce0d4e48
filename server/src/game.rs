//! The per-game coordinator: owns two `Player`s and one `Board`, relays
//! moves, and is the sole authority on both sides' clocks.
//!
//! Grounded on the teacher's `Engine::play`/`finalize_turn` for "validate,
//! then advance all derived state in one place," generalized here to also
//! own wall-clock timing and frame relay, which the teacher's offline
//! engine never needed.

use std::time::Duration;

use chess_core::{Board, Color, Square};
use tokio::time::Instant;
use tracing::{info, instrument};

use crate::frame::{nanos, ColorWire, Coord, Frame};
use crate::player::{Player, CLOCK_FLOOR};

/// Runs one game to completion: start frames, the alternating read/validate
/// loop, and the terminal announcement. Always closes both players' `out`
/// queues before returning, regardless of how the game ended.
#[instrument(skip_all)]
pub async fn run(p1: Player, p2: Player, time_limit: Duration) {
    let (mut white, mut black) = assign_colors(p1, p2, time_limit);

    if !send_start(&white, &black).await {
        white.close();
        black.close();
        return;
    }

    let mut board = Board::new();
    play(&mut board, &mut white, &mut black).await;

    white.close();
    black.close();
}

fn assign_colors(p1: Player, p2: Player, time_limit: Duration) -> (Player, Player) {
    let (mut white, mut black) = if rand::random::<bool>() { (p1, p2) } else { (p2, p1) };
    white.color = Some(Color::White);
    black.color = Some(Color::Black);
    white.remaining = time_limit;
    black.remaining = time_limit;
    (white, black)
}

async fn send_start(white: &Player, black: &Player) -> bool {
    let ok_white = white
        .send(Frame::Start {
            color: ColorWire::White,
            turn: 1,
            remaining_a: nanos(white.remaining),
            remaining_b: nanos(black.remaining),
        })
        .await;
    let ok_black = black
        .send(Frame::Start {
            color: ColorWire::Black,
            turn: 1,
            remaining_a: nanos(black.remaining),
            remaining_b: nanos(white.remaining),
        })
        .await;
    ok_white && ok_black
}

enum Outcome {
    Timeout { loser: Color },
    OpponentQuit,
}

/// The main game loop. Each outer iteration is one half-move: it fixes a
/// deadline for the side to move and keeps reading frames against that
/// same deadline — including illegal or out-of-turn ones, which are
/// silently ignored without pushing the deadline back, so a client cannot
/// pause its own clock by spamming junk frames.
async fn play(board: &mut Board, white: &mut Player, black: &mut Player) {
    loop {
        let side_to_move = board.side_to_move();
        let outcome = read_one_half_move(board, white, black, side_to_move).await;
        match outcome {
            None => continue,
            Some(Outcome::Timeout { loser }) => {
                let winner = loser.opposite();
                let text = format!("Out of time: {} wins!", color_name(winner));
                let _ = white.send(Frame::Msg { text: text.clone() }).await;
                let _ = black.send(Frame::Msg { text }).await;
                info!(?loser, "game ended on time");
                return;
            }
            Some(Outcome::OpponentQuit) => {
                let text = "Opponent quit... Reload?".to_string();
                let _ = white.send(Frame::Msg { text: text.clone() }).await;
                let _ = black.send(Frame::Msg { text }).await;
                info!("game ended on disconnect");
                return;
            }
        }
    }
}

/// Drives the read loop for a single half-move. Returns `None` once a
/// move was accepted and applied (the caller's outer loop re-derives the
/// new mover from the board and starts the next half-move), or `Some`
/// with the terminal reason once the game is over.
async fn read_one_half_move(
    board: &mut Board,
    white: &mut Player,
    black: &mut Player,
    side_to_move: Color,
) -> Option<Outcome> {
    let start_instant = Instant::now();
    let (mover, _waiter) = match side_to_move {
        Color::White => (&mut *white, &mut *black),
        Color::Black => (&mut *black, &mut *white),
    };
    let deadline = start_instant + mover.remaining;

    loop {
        match mover.recv_before(deadline).await {
            Err(_elapsed) => {
                mover.remaining = Duration::ZERO;
                return Some(Outcome::Timeout { loser: side_to_move });
            }
            Ok(None) => {
                return Some(Outcome::OpponentQuit);
            }
            Ok(Some(frame)) => match frame {
                Frame::Select { turn, ax, ay, white: is_white, .. }
                    if turn == board.turn() && is_white == (side_to_move == Color::White) =>
                {
                    if let Some(src) = Square::try_from_file_rank(ax, ay) {
                        let moves: Vec<Coord> = board
                            .candidate_moves(src)
                            .into_iter()
                            .map(square_to_coord)
                            .collect();
                        let _ = mover
                            .send(Frame::Select { turn, ax, ay, white: is_white, moves })
                            .await;
                    }
                    // select never consumes the read deadline's budget
                    // beyond the time already elapsed reading it.
                }
                Frame::Move { turn, ax, ay, bx, by, white: is_white, .. }
                    if turn == board.turn() && is_white == (side_to_move == Color::White) =>
                {
                    let applied = match (
                        Square::try_from_file_rank(ax, ay),
                        Square::try_from_file_rank(bx, by),
                    ) {
                        (Some(src), Some(dst)) => board.make_move(src, dst),
                        _ => false,
                    };
                    if applied {
                        let elapsed = start_instant.elapsed();
                        mover.remaining = mover.remaining.saturating_sub(elapsed).max(CLOCK_FLOOR);
                        let history = board.last_move().unwrap_or_default().to_string();
                        broadcast_move(
                            white,
                            black,
                            turn,
                            ax,
                            ay,
                            bx,
                            by,
                            is_white,
                            history,
                        )
                        .await;
                        return None;
                    }
                    // illegal move for an otherwise well-formed frame:
                    // silently ignored, keep waiting on the same deadline.
                }
                _ => {
                    // out-of-turn, wrong color, or a non-move/select frame
                    // (ping/pong/stat/malformed): ignored.
                }
            },
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn broadcast_move(
    white: &Player,
    black: &Player,
    turn: u32,
    ax: u8,
    ay: u8,
    bx: u8,
    by: u8,
    mover_is_white: bool,
    history: String,
) {
    let _ = white
        .send(Frame::Move {
            turn,
            ax,
            ay,
            bx,
            by,
            white: mover_is_white,
            history: Some(history.clone()),
            remaining_a: Some(nanos(white.remaining)),
            remaining_b: Some(nanos(black.remaining)),
        })
        .await;
    let _ = black
        .send(Frame::Move {
            turn,
            ax,
            ay,
            bx,
            by,
            white: mover_is_white,
            history: Some(history),
            remaining_a: Some(nanos(black.remaining)),
            remaining_b: Some(nanos(white.remaining)),
        })
        .await;
}

fn square_to_coord(square: Square) -> Coord {
    (square.file(), square.rank())
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::OUT_QUEUE_CAPACITY;
    use tokio::sync::mpsc;

    fn spawn_player(remaining: Duration) -> (mpsc::Sender<Frame>, mpsc::Receiver<Frame>, Player) {
        let (out_tx, out_rx) = mpsc::channel(OUT_QUEUE_CAPACITY);
        let (in_tx, in_rx) = mpsc::channel(4);
        let player = Player::new(out_tx, in_rx, remaining);
        (in_tx, out_rx, player)
    }

    #[tokio::test]
    async fn accepted_move_is_echoed_to_both_sides_with_swapped_clocks() {
        let (in_a, mut out_a, a) = spawn_player(Duration::from_secs(60));
        let (_in_b, mut out_b, b) = spawn_player(Duration::from_secs(60));

        let runner = tokio::spawn(run(a, b, Duration::from_secs(60)));

        let start_a = out_a.recv().await.unwrap();
        let start_b = out_b.recv().await.unwrap();
        let (a_is_white, b_is_white) = match (start_a, start_b) {
            (Frame::Start { color: ca, .. }, Frame::Start { color: cb, .. }) => {
                (ca == ColorWire::White, cb == ColorWire::White)
            }
            _ => panic!("expected start frames"),
        };
        assert_ne!(a_is_white, b_is_white);

        let (mover_in, mover_out, src, dst) = if a_is_white {
            (&in_a, &mut out_a, (4u8, 1u8), (4u8, 3u8))
        } else {
            (&_in_b, &mut out_b, (4u8, 1u8), (4u8, 3u8))
        };

        mover_in
            .send(Frame::Move {
                turn: 1,
                ax: src.0,
                ay: src.1,
                bx: dst.0,
                by: dst.1,
                white: true,
                history: None,
                remaining_a: None,
                remaining_b: None,
            })
            .await
            .unwrap();

        let echoed = mover_out.recv().await.unwrap();
        match echoed {
            Frame::Move { history, .. } => assert_eq!(history.as_deref(), Some("e4")),
            other => panic!("expected a move echo, got {other:?}"),
        }

        drop(in_a);
        drop(_in_b);
        runner.abort();
    }

    #[tokio::test]
    async fn timeout_ends_the_game_with_a_loss_message() {
        let (_in_a, mut out_a, a) = spawn_player(Duration::from_millis(30));
        let (_in_b, mut out_b, b) = spawn_player(Duration::from_millis(30));

        let runner = tokio::spawn(run(a, b, Duration::from_millis(30)));

        let _ = out_a.recv().await.unwrap();
        let _ = out_b.recv().await.unwrap();

        let msg_a = out_a.recv().await.unwrap();
        let msg_b = out_b.recv().await.unwrap();
        assert!(matches!(msg_a, Frame::Msg { .. }));
        assert!(matches!(msg_b, Frame::Msg { .. }));

        assert!(out_a.recv().await.is_none());
        assert!(out_b.recv().await.is_none());

        let _ = runner.await;
    }
}
