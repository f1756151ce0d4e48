use chess_core::{Board, Color, PieceKind, Square};

fn sq(text: &str) -> Square {
    Square::parse(text).unwrap()
}

#[test]
fn fools_mate_is_checkmate_after_five_half_moves() {
    let mut board = Board::new();
    for (from, to) in [
        ("f2", "f3"),
        ("e7", "e5"),
        ("g2", "g4"),
        ("d8", "h4"),
    ] {
        assert!(board.make_move(sq(from), sq(to)));
    }
    assert!(board.is_checkmate());
    assert_eq!(board.side_to_move(), Color::Black);
    assert_eq!(board.last_move(), Some("Qh4#"));
}

#[test]
fn scholars_mate_is_checkmate_after_seven_half_moves() {
    let mut board = Board::new();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("f1", "c4"),
        ("b8", "c6"),
        ("d1", "h5"),
        ("g8", "f6"),
        ("h5", "f7"),
    ] {
        assert!(board.make_move(sq(from), sq(to)));
    }
    assert!(board.is_checkmate());
    assert_eq!(board.last_move(), Some("Qxf7#"));
}

#[test]
fn kingside_castling_after_opening_moves() {
    let mut board = Board::new();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("g1", "f3"),
        ("b8", "c6"),
        ("f1", "c4"),
        ("f8", "c5"),
        ("e1", "g1"),
    ] {
        assert!(board.make_move(sq(from), sq(to)));
    }
    assert_eq!(board.piece_at(sq("g1")).unwrap().kind, PieceKind::King);
    assert_eq!(board.piece_at(sq("f1")).unwrap().kind, PieceKind::Rook);
    assert!(!board.is_check());
    assert_eq!(board.last_move(), Some("O-O"));
}

#[test]
fn en_passant_after_a_two_square_advance() {
    let mut board = Board::new();
    for (from, to) in [
        ("e2", "e4"),
        ("a7", "a6"),
        ("e4", "e5"),
        ("d7", "d5"),
        ("e5", "d6"),
    ] {
        assert!(board.make_move(sq(from), sq(to)));
    }
    assert!(board.piece_at(sq("d5")).is_none());
    let survivor = board.piece_at(sq("d6")).unwrap();
    assert_eq!(survivor.kind, PieceKind::Pawn);
    assert_eq!(survivor.color, Color::White);
}

#[test]
fn promotion_always_produces_a_queen() {
    let mut board = Board::new();
    for (from, to) in [
        ("g2", "g4"),
        ("h7", "h5"),
        ("g4", "g5"),
        ("h5", "h4"),
        ("g5", "g6"),
        ("h4", "h3"),
        ("g6", "f7"),
        ("b7", "b6"),
    ] {
        assert!(board.make_move(sq(from), sq(to)));
    }
    assert!(board.make_move(sq("f7"), sq("g8")));
    let promoted = board.piece_at(sq("g8")).unwrap();
    assert_eq!(promoted.kind, PieceKind::Queen);
    assert_eq!(promoted.color, Color::White);
}

#[test]
fn candidate_moves_matches_what_actually_succeeds() {
    let board = Board::new();
    for file in 0..8u8 {
        let from = Square::try_from_file_rank(file, 1).unwrap();
        for to in board.candidate_moves(from) {
            let mut probe = board.clone();
            assert!(probe.make_move(from, to));
        }
    }
}

#[test]
fn illegal_move_does_not_change_the_fen() {
    let mut board = Board::new();
    let before = board.to_fen();
    assert!(!board.make_move(sq("a1"), sq("a5")));
    assert_eq!(board.to_fen(), before);
}

#[test]
fn history_grows_by_exactly_one_per_accepted_move() {
    let mut board = Board::new();
    assert!(board.last_move().is_none());
    assert!(board.make_move(sq("e2"), sq("e4")));
    assert_eq!(board.last_move(), Some("e4"));
    assert!(board.make_move(sq("e7"), sq("e5")));
    assert_eq!(board.last_move(), Some("e5"));
    assert_eq!(board.turn(), 3);
}

#[test]
fn move_san_ignores_trailing_annotation_glyphs() {
    let mut board = Board::new();
    assert!(board.make_move_san("e4!"));
    assert_eq!(board.last_move(), Some("e4"));
    assert!(board.make_move_san("e5?!"));
    assert_eq!(board.last_move(), Some("e5"));
}
