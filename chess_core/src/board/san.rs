//! Standard Algebraic Notation: formatting the move just played, and
//! resolving a SAN string typed by a player back into a `from -> to` pair.
//!
//! Grounded on the teacher's `move_parsing::parse_input_string` (strip
//! `+`/`#`/`x`, handle the `=` promotion suffix) and `matches_move`
//! (disambiguation by filtering every legal move of the named piece kind).

use crate::color::Color;
use crate::error::IllegalMoveError;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

use super::Board;

pub(super) fn format_normal(board: &Board, from: Square, to: Square, piece: Piece) -> String {
    let is_capture = board.squares[to.index() as usize].is_some()
        || (piece.kind == PieceKind::Pawn && Some(to) == board.ep_target);

    let mut san = String::new();
    if piece.kind == PieceKind::Pawn {
        if is_capture {
            san.push(from.file_char());
            san.push('x');
        }
        san.push_str(&to.to_string());
        if to.rank() == piece.color.promotion_rank() {
            san.push_str("=Q");
        }
    } else {
        san.push_str(piece.kind.san_letter());
        san.push_str(&disambiguation(board, from, to, piece));
        if is_capture {
            san.push('x');
        }
        san.push_str(&to.to_string());
    }
    san
}

/// Finds every other piece of the same kind and color that could also
/// legally reach `to`, and returns the minimal file/rank/both prefix that
/// tells them apart from `from`. Empty when `from` is the only one.
fn disambiguation(board: &Board, from: Square, to: Square, piece: Piece) -> String {
    let mut conflicts = Vec::new();
    for (idx, occupant) in board.squares.iter().enumerate() {
        let Some(candidate_piece) = occupant else { continue };
        if *candidate_piece != piece {
            continue;
        }
        let candidate = Square::from_index(idx as u8);
        if candidate == from {
            continue;
        }
        if !board.pseudo_legal_destinations(candidate, piece).contains(to) {
            continue;
        }
        let mut scratch = board.clone();
        scratch.relocate_piece(candidate, to, piece);
        if !scratch.king_in_check(piece.color) {
            conflicts.push(candidate);
        }
    }

    if conflicts.is_empty() {
        return String::new();
    }
    let same_file = conflicts.iter().any(|c| c.file() == from.file());
    let same_rank = conflicts.iter().any(|c| c.rank() == from.rank());
    if !same_file {
        from.file_char().to_string()
    } else if !same_rank {
        from.rank_char().to_string()
    } else {
        from.to_string()
    }
}

/// Resolves a typed SAN string to the `from -> to` pair it names, filtering
/// to legal moves of the side to move. Ambiguous or unmatched strings are
/// reported as errors rather than guessed at.
pub(super) fn resolve(board: &Board, text: &str) -> Result<(Square, Square), IllegalMoveError> {
    let mut chars: Vec<char> = text.trim().chars().collect();
    while matches!(chars.last(), Some('+') | Some('#') | Some('!') | Some('?')) {
        chars.pop();
    }
    let trimmed: String = chars.iter().collect();
    if trimmed.eq_ignore_ascii_case("O-O") || trimmed == "0-0" {
        return Ok(castling_squares(board.side_to_move, super::CastleSide::Kingside));
    }
    if trimmed.eq_ignore_ascii_case("O-O-O") || trimmed == "0-0-0" {
        return Ok(castling_squares(board.side_to_move, super::CastleSide::Queenside));
    }

    if chars.len() >= 2 && chars[chars.len() - 2] == '=' {
        chars.truncate(chars.len() - 2);
    }
    if chars.is_empty() {
        return Err(IllegalMoveError::MalformedSan);
    }

    let piece_kind = if chars[0].is_ascii_uppercase() {
        PieceKind::from_san_letter(chars[0]).ok_or(IllegalMoveError::MalformedSan)?
    } else {
        PieceKind::Pawn
    };
    let body: Vec<char> = if piece_kind == PieceKind::Pawn {
        chars
    } else {
        chars[1..].to_vec()
    };
    let body: Vec<char> = body.into_iter().filter(|&c| c != 'x').collect();
    if body.len() < 2 {
        return Err(IllegalMoveError::MalformedSan);
    }

    let dest_text: String = body[body.len() - 2..].iter().collect();
    let to = Square::parse(&dest_text).ok_or(IllegalMoveError::MalformedSan)?;
    let disambiguator = &body[..body.len() - 2];
    let disambig_file = disambiguator.iter().copied().find(|c| ('a'..='h').contains(c));
    let disambig_rank = disambiguator.iter().copied().find(|c| ('1'..='8').contains(c));

    let mut legal_matches = Vec::new();
    for (idx, occupant) in board.squares.iter().enumerate() {
        let Some(candidate_piece) = occupant else { continue };
        if candidate_piece.kind != piece_kind || candidate_piece.color != board.side_to_move {
            continue;
        }
        let from = Square::from_index(idx as u8);
        if let Some(f) = disambig_file {
            if from.file_char() != f {
                continue;
            }
        }
        if let Some(r) = disambig_rank {
            if from.rank_char() != r {
                continue;
            }
        }
        if !board.pseudo_legal_destinations(from, *candidate_piece).contains(to) {
            continue;
        }
        let mut scratch = board.clone();
        scratch.relocate_piece(from, to, *candidate_piece);
        if !scratch.king_in_check(candidate_piece.color) {
            legal_matches.push(from);
        }
    }

    match legal_matches.as_slice() {
        [] => Err(IllegalMoveError::NoSuchSanMove),
        [single] => Ok((*single, to)),
        _ => Err(IllegalMoveError::AmbiguousSan),
    }
}

fn castling_squares(color: Color, side: super::CastleSide) -> (Square, Square) {
    let rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    let king_from = Square::try_from_file_rank(4, rank).unwrap();
    let king_to_file = match side {
        super::CastleSide::Kingside => 6,
        super::CastleSide::Queenside => 2,
    };
    (king_from, Square::try_from_file_rank(king_to_file, rank).unwrap())
}
