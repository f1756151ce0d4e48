//! FEN emission, grounded on the teacher's `Engine::to_string`.
//!
//! The halfmove clock is not tracked by this board (there is no fifty-move
//! rule in a clock-terminated game) and is always emitted as `0`.

use crate::color::Color;
use crate::piece::PieceKind;
use crate::square::Square;

use super::Board;

pub(super) fn to_fen(board: &Board) -> String {
    let mut fields = Vec::with_capacity(6);
    fields.push(placement_field(board));
    fields.push(match board.side_to_move {
        Color::White => "w".to_string(),
        Color::Black => "b".to_string(),
    });
    fields.push(castling_field(board));
    fields.push(
        board
            .ep_target
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    fields.push("0".to_string());
    fields.push(board.fullmove_number().to_string());
    fields.join(" ")
}

fn placement_field(board: &Board) -> String {
    let mut ranks = Vec::with_capacity(8);
    for rank in (0..8).rev() {
        let mut rank_text = String::new();
        let mut empty_run = 0u8;
        for file in 0..8 {
            let square = Square::try_from_file_rank(file, rank).unwrap();
            match board.piece_at(square) {
                Some(piece) => {
                    if empty_run > 0 {
                        rank_text.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    rank_text.push(piece.kind.fen_char(piece.color));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            rank_text.push_str(&empty_run.to_string());
        }
        ranks.push(rank_text);
    }
    ranks.join("/")
}

fn castling_field(board: &Board) -> String {
    let mut field = String::new();
    for (color, kingside_char, queenside_char) in
        [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')]
    {
        let rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        let king_from = Square::try_from_file_rank(4, rank).unwrap();
        let king_present = !board.moved.contains(king_from)
            && matches!(board.piece_at(king_from), Some(p) if p.kind == PieceKind::King && p.color == color);

        let kingside_rook = Square::try_from_file_rank(7, rank).unwrap();
        if king_present
            && !board.moved.contains(kingside_rook)
            && matches!(board.piece_at(kingside_rook), Some(p) if p.kind == PieceKind::Rook && p.color == color)
        {
            field.push(kingside_char);
        }

        let queenside_rook = Square::try_from_file_rank(0, rank).unwrap();
        if king_present
            && !board.moved.contains(queenside_rook)
            && matches!(board.piece_at(queenside_rook), Some(p) if p.kind == PieceKind::Rook && p.color == color)
        {
            field.push(queenside_char);
        }
    }
    if field.is_empty() {
        "-".to_string()
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn starting_position_fen_matches_standard() {
        let board = Board::new();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn castling_rights_drop_once_a_rook_moves() {
        let mut board = Board::new();
        board.make_move(Square::parse("h2").unwrap(), Square::parse("h4").unwrap());
        board.make_move(Square::parse("a7").unwrap(), Square::parse("a6").unwrap());
        board.make_move(Square::parse("h1").unwrap(), Square::parse("h3").unwrap());
        assert!(board.to_fen().contains("Qkq"));
        assert!(!board.to_fen().split(' ').nth(2).unwrap().contains('K'));
    }
}
