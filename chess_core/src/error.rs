use thiserror::Error;

/// Why a move or SAN string was rejected.
///
/// All variants are reported without mutating the board: the engine is
/// deterministic and side-effect-free on rejection (any tentative mutation
/// performed while checking legality is reverted before the caller sees
/// this error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMoveError {
    #[error("no piece at the source square")]
    NoPieceAtSquare,
    #[error("the piece at the source square does not belong to the side to move")]
    NotYourPiece,
    #[error("the destination is not a legal destination for this piece")]
    IllegalDestination,
    #[error("that move would leave the mover's own king in check")]
    WouldLeaveKingInCheck,
    #[error("castling is not allowed in this position")]
    CastlingNotAllowed,
    #[error("more than one piece can make this move; disambiguate with file or rank")]
    AmbiguousSan,
    #[error("no legal move matches this SAN string")]
    NoSuchSanMove,
    #[error("the SAN string is malformed")]
    MalformedSan,
}
