use thiserror::Error;

/// Recoverable outcomes reported back to the caller. None of them touch the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("piece {piece} has already been placed {limit} times")]
    PieceExhausted { piece: u8, limit: u8 },
    #[error("no legal placement for piece {piece}")]
    NoLegalPlacement { piece: u8 },
    #[error("piece id {0} is outside 0..=9")]
    InvalidPiece(u8),
    #[error("lookahead depth must be at least 1")]
    InvalidDepth,
    #[error("a {rows}x{cols} board cannot hold a 4x3 piece")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("seen limit must be at least 1")]
    InvalidSeenLimit,
}
