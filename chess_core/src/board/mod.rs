//! The board: legal-move generation, move application, and position
//! queries, built around a mailbox of squares plus a pair of bitboards
//! for fast occupancy and castling-rights checks.
//!
//! Grounded on the teacher's `game_engine::Engine` (`play`, `perform_move`,
//! `validate_move_safety`, `finalize_turn`), translated from its
//! six-bitboards-per-color representation onto a plain
//! `[Option<Piece>; 64]` mailbox, since nothing here needs bitboard-speed
//! move generation at this scale.

mod fen;
mod movegen;
mod san;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::IllegalMoveError;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

pub use movegen::CastleSide;

/// A chess position together with enough history to answer "is this the
/// third repetition" style questions and to print the SAN of the last
/// move played.
#[derive(Debug, Clone)]
pub struct Board {
    squares: [Option<Piece>; 64],
    occupied: Bitboard,
    /// Squares a piece has ever moved away from. Castling rights are
    /// derived from this rather than stored as a separate flag pair, the
    /// way the teacher derives `CastlingRights` from board state rather
    /// than tracking it imperatively everywhere.
    moved: Bitboard,
    side_to_move: Color,
    ep_target: Option<Square>,
    check: bool,
    stalemate: bool,
    history: Vec<String>,
}

impl Board {
    /// The standard starting position, White to move.
    pub fn new() -> Self {
        let mut squares = [None; 64];
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back_rank.iter().enumerate() {
            squares[Square::try_from_file_rank(file as u8, 0).unwrap().index() as usize] =
                Some(Piece::new(*kind, Color::White));
            squares[Square::try_from_file_rank(file as u8, 7).unwrap().index() as usize] =
                Some(Piece::new(*kind, Color::Black));
        }
        for file in 0..8 {
            squares[Square::try_from_file_rank(file, 1).unwrap().index() as usize] =
                Some(Piece::new(PieceKind::Pawn, Color::White));
            squares[Square::try_from_file_rank(file, 6).unwrap().index() as usize] =
                Some(Piece::new(PieceKind::Pawn, Color::Black));
        }

        let mut occupied = Bitboard::EMPTY;
        for (idx, occupant) in squares.iter().enumerate() {
            if occupant.is_some() {
                occupied.set(Square::from_index(idx as u8));
            }
        }

        Board {
            squares,
            occupied,
            moved: Bitboard::EMPTY,
            side_to_move: Color::White,
            ep_target: None,
            check: false,
            stalemate: false,
            history: Vec::new(),
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The half-move count to play next, 1-based: 1 before any move, 2
    /// after White's first move, and so on.
    pub fn turn(&self) -> u32 {
        self.history.len() as u32 + 1
    }

    /// The full-move number, as printed in the sixth FEN field:
    /// `(turn() + 1) / 2`.
    pub fn fullmove_number(&self) -> u32 {
        (self.turn() + 1) / 2
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.check && self.stalemate
    }

    /// True when the side to move has no legal move and is not in check —
    /// a drawn position, not to be confused with checkmate.
    pub fn is_stalemate_draw(&self) -> bool {
        !self.check && self.stalemate
    }

    pub fn last_move(&self) -> Option<&str> {
        self.history.last().map(|s| s.as_str())
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    /// Attempts `from -> to`, returning why it was rejected if it was.
    /// Never mutates the board on rejection.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<(), IllegalMoveError> {
        let piece = self.piece_at(from).ok_or(IllegalMoveError::NoPieceAtSquare)?;
        if piece.color != self.side_to_move {
            return Err(IllegalMoveError::NotYourPiece);
        }

        if piece.kind == PieceKind::King {
            for side in [CastleSide::Kingside, CastleSide::Queenside] {
                if self.castle_destination(self.side_to_move, side) == Some(to) {
                    if !self.can_castle(self.side_to_move, side) {
                        return Err(IllegalMoveError::CastlingNotAllowed);
                    }
                    self.commit_castle(self.side_to_move, side);
                    return Ok(());
                }
            }
        }

        let pseudo = self.pseudo_legal_destinations(from, piece);
        if !pseudo.contains(to) {
            return Err(IllegalMoveError::IllegalDestination);
        }

        let mut scratch = self.clone();
        scratch.relocate_piece(from, to, piece);
        if scratch.king_in_check(piece.color) {
            return Err(IllegalMoveError::WouldLeaveKingInCheck);
        }

        self.commit_normal_move(from, to, piece);
        Ok(())
    }

    /// `true` if the move was legal and applied, `false` otherwise — the
    /// boolean-returning counterpart callers that don't need the reason
    /// can use.
    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        self.try_move(from, to).is_ok()
    }

    pub fn try_move_san(&mut self, text: &str) -> Result<(), IllegalMoveError> {
        let (from, to) = san::resolve(self, text)?;
        self.try_move(from, to)
    }

    pub fn make_move_san(&mut self, text: &str) -> bool {
        self.try_move_san(text).is_ok()
    }

    pub fn to_fen(&self) -> String {
        fen::to_fen(self)
    }

    fn commit_normal_move(&mut self, from: Square, to: Square, piece: Piece) {
        let san_text = san::format_normal(self, from, to, piece);

        let is_double_push = piece.kind == PieceKind::Pawn
            && (from.rank() as i8 - to.rank() as i8).abs() == 2;

        self.relocate_piece(from, to, piece);
        self.moved.set(from);

        if piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank() {
            self.place_piece(to, Piece::new(PieceKind::Queen, piece.color));
        }

        self.ep_target = if is_double_push {
            from.offset(0, piece.color.pawn_direction())
        } else {
            None
        };

        self.finish_turn(san_text);
    }

    fn commit_castle(&mut self, color: Color, side: CastleSide) {
        let rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        let king_from = Square::try_from_file_rank(4, rank).unwrap();
        let (rook_from_file, rook_to_file, king_to_file) = match side {
            CastleSide::Kingside => (7, 5, 6),
            CastleSide::Queenside => (0, 3, 2),
        };
        let rook_from = Square::try_from_file_rank(rook_from_file, rank).unwrap();
        let rook_to = Square::try_from_file_rank(rook_to_file, rank).unwrap();
        let king_to = Square::try_from_file_rank(king_to_file, rank).unwrap();

        let king = self.piece_at(king_from).expect("king present to castle");
        let rook = self.piece_at(rook_from).expect("rook present to castle");

        self.remove_piece(king_from);
        self.remove_piece(rook_from);
        self.place_piece(king_to, king);
        self.place_piece(rook_to, rook);
        self.moved.set(king_from);
        self.moved.set(rook_from);
        self.ep_target = None;

        let san_text = match side {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
        .to_string();
        self.finish_turn(san_text);
    }

    /// Flips the side to move, recomputes check/stalemate for the new side
    /// to move, and appends the move's SAN (with any `+`/`#` suffix) to
    /// history. The full-move counter is derived from `history.len()`, not
    /// tracked here.
    fn finish_turn(&mut self, mut san_text: String) {
        self.side_to_move = self.side_to_move.opposite();

        self.check = self.king_in_check(self.side_to_move);
        self.stalemate = !self.any_legal_move_exists();

        if self.check {
            san_text.push(if self.stalemate { '#' } else { '+' });
        }
        self.history.push(san_text);
    }

    fn any_legal_move_exists(&self) -> bool {
        for (idx, occupant) in self.squares.iter().enumerate() {
            if let Some(piece) = occupant {
                if piece.color == self.side_to_move {
                    let from = Square::from_index(idx as u8);
                    if !self.candidate_moves(from).is_empty() {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;

    fn sq(text: &str) -> Square {
        Square::parse(text).unwrap()
    }

    #[test]
    fn fools_mate_ends_in_checkmate() {
        let mut board = Board::new();
        assert!(board.make_move(sq("f2"), sq("f3")));
        assert!(board.make_move(sq("e7"), sq("e5")));
        assert!(board.make_move(sq("g2"), sq("g4")));
        assert!(board.make_move(sq("d8"), sq("h4")));
        assert!(board.is_checkmate());
        assert_eq!(board.last_move(), Some("Qh4#"));
    }

    #[test]
    fn illegal_move_leaves_board_untouched() {
        let mut board = Board::new();
        let before = board.to_fen();
        let err = board.try_move(sq("e2"), sq("e5")).unwrap_err();
        assert_eq!(err, IllegalMoveError::IllegalDestination);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn pinned_piece_cannot_move_and_expose_king() {
        // White king e1, white bishop e2 pinned by a black rook on e8.
        let mut board = Board::new();
        board.squares = [None; 64];
        board.occupied = Bitboard::EMPTY;
        board.place_piece(sq("e1"), Piece::new(PieceKind::King, Color::White));
        board.place_piece(sq("e2"), Piece::new(PieceKind::Bishop, Color::White));
        board.place_piece(sq("e8"), Piece::new(PieceKind::Rook, Color::Black));
        board.place_piece(sq("a8"), Piece::new(PieceKind::King, Color::Black));
        board.side_to_move = Color::White;

        assert!(board.candidate_moves(sq("e2")).is_empty());
        let err = board.try_move(sq("e2"), sq("d3")).unwrap_err();
        assert_eq!(err, IllegalMoveError::WouldLeaveKingInCheck);
    }

    #[test]
    fn kingside_castle_moves_both_king_and_rook() {
        let mut board = Board::new();
        board.squares = [None; 64];
        board.occupied = Bitboard::EMPTY;
        board.place_piece(sq("e1"), Piece::new(PieceKind::King, Color::White));
        board.place_piece(sq("h1"), Piece::new(PieceKind::Rook, Color::White));
        board.place_piece(sq("a8"), Piece::new(PieceKind::King, Color::Black));
        board.side_to_move = Color::White;

        assert!(board.make_move(sq("e1"), sq("g1")));
        assert_eq!(board.piece_at(sq("g1")).unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_at(sq("f1")).unwrap().kind, PieceKind::Rook);
        assert!(board.piece_at(sq("e1")).is_none());
        assert!(board.piece_at(sq("h1")).is_none());
        assert_eq!(board.last_move(), Some("O-O"));
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let mut board = Board::new();
        assert!(board.make_move(sq("e2"), sq("e4")));
        assert!(board.make_move(sq("a7"), sq("a6")));
        assert!(board.make_move(sq("e4"), sq("e5")));
        assert!(board.make_move(sq("d7"), sq("d5")));
        assert!(board.make_move(sq("e5"), sq("d6")));
        assert!(board.piece_at(sq("d5")).is_none());
        assert_eq!(board.piece_at(sq("d6")).unwrap().color, Color::White);
    }

    #[test]
    fn pawn_reaching_last_rank_always_promotes_to_queen() {
        let mut board = Board::new();
        board.squares = [None; 64];
        board.occupied = Bitboard::EMPTY;
        board.place_piece(sq("e1"), Piece::new(PieceKind::King, Color::White));
        board.place_piece(sq("a8"), Piece::new(PieceKind::King, Color::Black));
        board.place_piece(sq("e7"), Piece::new(PieceKind::Pawn, Color::White));
        board.side_to_move = Color::White;

        assert!(board.make_move(sq("e7"), sq("e8")));
        assert_eq!(board.piece_at(sq("e8")).unwrap().kind, PieceKind::Queen);
    }
}
