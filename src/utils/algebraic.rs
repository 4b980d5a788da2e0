//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and the internal
//! square ordinals used by the rules engine, FEN, PGN and the console.

use thiserror::Error;

use crate::game_state::chess_types::{square_file, square_rank, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid algebraic square: {0:?}")]
    InvalidSquare(String),
    #[error("square index out of bounds: {0}")]
    SquareOutOfBounds(Square),
    #[error("invalid long algebraic move: {0:?}")]
    InvalidMove(String),
    #[error("invalid promotion piece character: {0:?}")]
    InvalidPromotion(char),
}

/// Convert algebraic notation (for example: "e4") to a square index.
pub fn algebraic_to_square(square: &str) -> Result<Square, NotationError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(NotationError::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to algebraic notation (for example: "e4").
pub fn square_to_algebraic(square: Square) -> Result<String, NotationError> {
    if square > 63 {
        return Err(NotationError::SquareOutOfBounds(square));
    }

    let file_char = char::from(b'a' + square_file(square));
    let rank_char = char::from(b'1' + square_rank(square));
    Ok(format!("{file_char}{rank_char}"))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic, NotationError};

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), 0);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), 63);
        assert_eq!(algebraic_to_square("E4").expect("uppercase file should parse"), 28);
        assert_eq!(square_to_algebraic(0).expect("0 should convert"), "a1");
        assert_eq!(square_to_algebraic(63).expect("63 should convert"), "h8");
    }

    #[test]
    fn rejects_off_board_input() {
        assert!(matches!(algebraic_to_square("i1"), Err(NotationError::InvalidSquare(_))));
        assert!(matches!(algebraic_to_square("a9"), Err(NotationError::InvalidSquare(_))));
        assert_eq!(square_to_algebraic(64), Err(NotationError::SquareOutOfBounds(64)));
    }
}
