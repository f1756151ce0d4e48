//! Pseudo-legal pattern generation and check detection.
//!
//! A compact lookup table keyed by (piece-kind, offset) would also satisfy
//! the legality contract, but a direct ray/offset walk over the mailbox is
//! simpler to get right and fast enough at this scale.

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

use super::Board;

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];

impl Board {
    /// Squares this piece attacks from `from`, ignoring whose turn it is.
    ///
    /// For sliding pieces the ray stops at (and includes) the first
    /// occupied square in each direction, friend or foe — a piece always
    /// attacks the square it would capture on, and attacks no further.
    /// Pawns only attack their two diagonal squares, never the square they
    /// push to.
    pub(super) fn piece_attack_squares(&self, from: Square, piece: Piece) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        match piece.kind {
            PieceKind::Rook => self.slide(from, &ROOK_DIRS, &mut attacks),
            PieceKind::Bishop => self.slide(from, &BISHOP_DIRS, &mut attacks),
            PieceKind::Queen => {
                self.slide(from, &ROOK_DIRS, &mut attacks);
                self.slide(from, &BISHOP_DIRS, &mut attacks);
            }
            PieceKind::Knight => {
                for &(df, dr) in &KNIGHT_OFFSETS {
                    if let Some(to) = from.offset(df, dr) {
                        attacks.set(to);
                    }
                }
            }
            PieceKind::King => {
                for &(df, dr) in &KING_OFFSETS {
                    if let Some(to) = from.offset(df, dr) {
                        attacks.set(to);
                    }
                }
            }
            PieceKind::Pawn => {
                let dir = piece.color.pawn_direction();
                for df in [-1i8, 1] {
                    if let Some(to) = from.offset(df, dir) {
                        attacks.set(to);
                    }
                }
            }
        }
        attacks
    }

    fn slide(&self, from: Square, dirs: &[(i8, i8)], attacks: &mut Bitboard) {
        for &(df, dr) in dirs {
            let mut current = from;
            while let Some(next) = current.offset(df, dr) {
                attacks.set(next);
                if self.squares[next.index() as usize].is_some() {
                    break;
                }
                current = next;
            }
        }
    }

    /// Whether `by` attacks `square` in the current position.
    ///
    /// Locates every piece of color `by` and asks whether it pseudo-legally
    /// attacks `square`.
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        for (idx, occupant) in self.squares.iter().enumerate() {
            if let Some(piece) = occupant {
                if piece.color == by {
                    let from = Square::from_index(idx as u8);
                    if self.piece_attack_squares(from, *piece).contains(square) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub(super) fn king_square(&self, color: Color) -> Square {
        self.squares
            .iter()
            .enumerate()
            .find_map(|(idx, occupant)| match occupant {
                Some(p) if p.kind == PieceKind::King && p.color == color => {
                    Some(Square::from_index(idx as u8))
                }
                _ => None,
            })
            .expect("a king of each color is always on the board")
    }

    /// Pseudo-legal destinations for the piece at `from`: matches the
    /// piece's movement pattern and never lands on a square occupied by a
    /// piece of the same color. Does not yet filter out moves that leave
    /// the mover's own king in check — see `candidate_moves` for that.
    pub(super) fn pseudo_legal_destinations(&self, from: Square, piece: Piece) -> Bitboard {
        if piece.kind == PieceKind::Pawn {
            return self.pawn_destinations(from, piece.color);
        }
        let attacks = self.piece_attack_squares(from, piece);
        let own = self.color_occupancy(piece.color);
        attacks & !own
    }

    fn pawn_destinations(&self, from: Square, color: Color) -> Bitboard {
        let mut moves = Bitboard::EMPTY;
        let dir = color.pawn_direction();

        if let Some(one_step) = from.offset(0, dir) {
            if self.squares[one_step.index() as usize].is_none() {
                moves.set(one_step);
                if from.rank() == color.pawn_start_rank() {
                    if let Some(two_step) = from.offset(0, dir * 2) {
                        if self.squares[two_step.index() as usize].is_none() {
                            moves.set(two_step);
                        }
                    }
                }
            }
        }

        for df in [-1i8, 1] {
            if let Some(to) = from.offset(df, dir) {
                let is_enemy_capture = self.squares[to.index() as usize]
                    .map(|p| p.color != color)
                    .unwrap_or(false);
                let is_en_passant = self.ep_target == Some(to);
                if is_enemy_capture || is_en_passant {
                    moves.set(to);
                }
            }
        }

        moves
    }

    pub(super) fn color_occupancy(&self, color: Color) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for (idx, occupant) in self.squares.iter().enumerate() {
            if let Some(p) = occupant {
                if p.color == color {
                    bb.set(Square::from_index(idx as u8));
                }
            }
        }
        bb
    }

    /// Whether the king of `color` is currently attacked by the opponent.
    pub(super) fn king_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opposite())
    }

    /// Legal destinations for the piece at `from`, for the side to move.
    /// Empty if the square holds no piece or a piece of the other color.
    pub fn candidate_moves(&self, from: Square) -> Vec<Square> {
        let Some(piece) = self.squares[from.index() as usize] else {
            return Vec::new();
        };
        if piece.color != self.side_to_move {
            return Vec::new();
        }

        let mut legal = Vec::new();
        for to in self.pseudo_legal_destinations(from, piece).squares() {
            if self.simulate_is_legal(from, to, piece) {
                legal.push(to);
            }
        }

        if piece.kind == PieceKind::King {
            for side in [CastleSide::Kingside, CastleSide::Queenside] {
                if let Some(to) = self.castle_destination(self.side_to_move, side) {
                    if self.can_castle(self.side_to_move, side) {
                        legal.push(to);
                    }
                }
            }
        }

        legal
    }

    /// Applies `from -> to` on a scratch copy and checks whether the
    /// mover's own king survives in check. Never mutates `self`.
    fn simulate_is_legal(&self, from: Square, to: Square, piece: Piece) -> bool {
        let mut scratch = self.clone();
        scratch.relocate_piece(from, to, piece);
        !scratch.king_in_check(piece.color)
    }

    /// Moves a piece from `from` to `to` on the board, handling captures
    /// (including en passant) but none of the turn bookkeeping — used both
    /// by legality simulation and by the real move application.
    pub(super) fn relocate_piece(&mut self, from: Square, to: Square, piece: Piece) {
        if piece.kind == PieceKind::Pawn && Some(to) == self.ep_target && self.squares[to.index() as usize].is_none() {
            let captured_rank = from.rank();
            if let Some(captured_square) = Square::try_from_file_rank(to.file(), captured_rank) {
                self.remove_piece(captured_square);
            }
        } else if self.squares[to.index() as usize].is_some() {
            self.remove_piece(to);
        }

        self.remove_piece(from);
        self.place_piece(to, piece);
    }

    pub(super) fn place_piece(&mut self, square: Square, piece: Piece) {
        self.squares[square.index() as usize] = Some(piece);
        self.occupied.set(square);
    }

    pub(super) fn remove_piece(&mut self, square: Square) {
        self.squares[square.index() as usize] = None;
        self.occupied.clear(square);
    }

    pub(super) fn castle_destination(&self, color: Color, side: CastleSide) -> Option<Square> {
        let rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        let file = match side {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        };
        Square::try_from_file_rank(file, rank)
    }

    /// Castling rights are derived, not stored: legal iff neither the king
    /// nor the relevant rook has ever moved, the squares between them are
    /// empty, the king is not currently in check, and every square it
    /// crosses (including its destination) is unattacked.
    pub(super) fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        let rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        let king_from = Square::try_from_file_rank(4, rank).unwrap();
        let rook_file = match side {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        };
        let rook_from = Square::try_from_file_rank(rook_file, rank).unwrap();

        if self.moved.contains(king_from) || self.moved.contains(rook_from) {
            return false;
        }
        match self.squares[king_from.index() as usize] {
            Some(p) if p.kind == PieceKind::King && p.color == color => {}
            _ => return false,
        }
        match self.squares[rook_from.index() as usize] {
            Some(p) if p.kind == PieceKind::Rook && p.color == color => {}
            _ => return false,
        }

        let between: Vec<u8> = match side {
            CastleSide::Kingside => vec![5, 6],
            CastleSide::Queenside => vec![1, 2, 3],
        };
        for file in &between {
            let square = Square::try_from_file_rank(*file, rank).unwrap();
            if self.squares[square.index() as usize].is_some() {
                return false;
            }
        }

        if self.king_in_check(color) {
            return false;
        }

        let crossed_files: [u8; 2] = match side {
            CastleSide::Kingside => [5, 6],
            CastleSide::Queenside => [3, 2],
        };
        for file in crossed_files {
            let square = Square::try_from_file_rank(file, rank).unwrap();
            if self.is_square_attacked(square, color.opposite()) {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}
