//! Compact, URL-fragment-safe move encoding.
//!
//! Every move is two symbols from a 64-character square alphabet (source,
//! then destination) optionally followed by one symbol from a disjoint
//! 4-character promotion alphabet. A game is the plain concatenation of its
//! moves, so the empty string is the starting position.
//!
//! ```text
//! square:    abcdefgh ijklmnop qrstuvwx yzABCDEF GHIJKLMN OPQRSTUV WXYZ0123 456789-_
//!            rank 1   rank 2   rank 3   rank 4   rank 5   rank 6   rank 7   rank 8
//! promotion: ~ queen   @ rook   $ bishop   = knight
//! ```

use thiserror::Error;

use crate::game_state::chess_types::{ChessMove, PieceKind, Square};

/// Square symbols, indexed by square ordinal (`a1 == 0`).
pub const SQUARE_ALPHABET: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("cannot encode {0}")]
    OutOfRange(String),
    #[error("invalid symbol {symbol:?} at offset {offset}")]
    InvalidSymbol { symbol: char, offset: usize },
    #[error("move string ends after the source square at offset {offset}")]
    TruncatedMove { offset: usize },
}

#[inline]
pub fn square_symbol(square: Square) -> Result<char, CodecError> {
    SQUARE_ALPHABET
        .get(square as usize)
        .map(|&b| char::from(b))
        .ok_or_else(|| CodecError::OutOfRange(format!("square index {square}")))
}

/// Inverse of `square_symbol`; `None` for characters outside the alphabet.
#[inline]
pub fn symbol_square(symbol: char) -> Option<Square> {
    let index = match symbol {
        'a'..='z' => symbol as u32 - 'a' as u32,
        'A'..='Z' => symbol as u32 - 'A' as u32 + 26,
        '0'..='9' => symbol as u32 - '0' as u32 + 52,
        '-' => 62,
        '_' => 63,
        _ => return None,
    };
    Some(index as Square)
}

#[inline]
pub fn promotion_symbol(kind: PieceKind) -> Result<char, CodecError> {
    match kind {
        PieceKind::Queen => Ok('~'),
        PieceKind::Rook => Ok('@'),
        PieceKind::Bishop => Ok('$'),
        PieceKind::Knight => Ok('='),
        PieceKind::Pawn | PieceKind::King => {
            Err(CodecError::OutOfRange(format!("promotion to {kind:?}")))
        }
    }
}

#[inline]
pub fn symbol_promotion(symbol: char) -> Option<PieceKind> {
    match symbol {
        '~' => Some(PieceKind::Queen),
        '@' => Some(PieceKind::Rook),
        '$' => Some(PieceKind::Bishop),
        '=' => Some(PieceKind::Knight),
        _ => None,
    }
}

/// Encode one move as two or three symbols.
pub fn encode_move(mv: ChessMove) -> Result<String, CodecError> {
    let mut out = String::with_capacity(3);
    out.push(square_symbol(mv.from)?);
    out.push(square_symbol(mv.to)?);
    if let Some(kind) = mv.promotion {
        out.push(promotion_symbol(kind)?);
    }
    Ok(out)
}

pub fn encode_moves<'a, I>(moves: I) -> Result<String, CodecError>
where
    I: IntoIterator<Item = &'a ChessMove>,
{
    let mut out = String::new();
    for mv in moves {
        out.push_str(&encode_move(*mv)?);
    }
    Ok(out)
}

/// Decode a concatenated move string.
///
/// Square positions must hold square symbols. After each destination a single
/// promotion symbol is consumed if present; anything else is left for the
/// next move's source.
pub fn decode_moves(encoded: &str) -> Result<Vec<ChessMove>, CodecError> {
    let mut moves = Vec::with_capacity(encoded.len() / 2);
    let mut symbols = encoded.char_indices().peekable();

    while let Some((from_offset, from_symbol)) = symbols.next() {
        let from = symbol_square(from_symbol).ok_or(CodecError::InvalidSymbol {
            symbol: from_symbol,
            offset: from_offset,
        })?;

        let (to_offset, to_symbol) = symbols
            .next()
            .ok_or(CodecError::TruncatedMove { offset: from_offset })?;
        let to = symbol_square(to_symbol).ok_or(CodecError::InvalidSymbol {
            symbol: to_symbol,
            offset: to_offset,
        })?;

        let promotion = symbols.peek().and_then(|&(_, ch)| symbol_promotion(ch));
        if promotion.is_some() {
            symbols.next();
        }

        moves.push(ChessMove { from, to, promotion });
    }

    Ok(moves)
}

/// Byte length of `mv`'s encoding; used to strip the last move off a link.
#[inline]
pub fn encoded_len(mv: ChessMove) -> usize {
    if mv.promotion.is_some() {
        3
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PROMOTION_KINDS;

    #[test]
    fn square_alphabet_is_a_bijection() {
        let mut seen = std::collections::HashSet::new();
        for square in 0..64u8 {
            let symbol = square_symbol(square).expect("square in range");
            assert!(seen.insert(symbol), "duplicate symbol {symbol:?}");
            assert_eq!(symbol_square(symbol), Some(square));
        }
    }

    #[test]
    fn alphabets_are_disjoint_and_fragment_safe() {
        for kind in PROMOTION_KINDS {
            let symbol = promotion_symbol(kind).expect("promotion kind");
            assert_eq!(symbol_square(symbol), None, "{symbol:?} collides with a square");
            assert_eq!(symbol_promotion(symbol), Some(kind));
        }
        let fragment_safe = |c: char| c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:@/?".contains(c);
        assert!(SQUARE_ALPHABET.iter().all(|&b| fragment_safe(char::from(b))));
        assert!(PROMOTION_KINDS
            .iter()
            .all(|&k| fragment_safe(promotion_symbol(k).expect("promotion kind"))));
    }

    #[test]
    fn every_representable_move_round_trips() {
        let promotions = [None, Some(PieceKind::Rook), Some(PieceKind::Knight), Some(PieceKind::Bishop), Some(PieceKind::Queen)];
        for from in 0..64u8 {
            for to in 0..64u8 {
                for promotion in promotions {
                    let mv = ChessMove { from, to, promotion };
                    let encoded = encode_move(mv).expect("representable move");
                    assert_eq!(encoded.len(), encoded_len(mv));
                    assert_eq!(decode_moves(&encoded), Ok(vec![mv]));
                }
            }
        }
    }

    #[test]
    fn encoding_examples() {
        assert_eq!(encode_move(ChessMove::new(12, 28)).expect("e2e4"), "mC");
        assert_eq!(
            encode_move(ChessMove::with_promotion(48, 56, PieceKind::Queen)).expect("a7a8q"),
            "W4~"
        );
    }

    #[test]
    fn encode_rejects_out_of_range_values() {
        assert!(matches!(encode_move(ChessMove::new(64, 0)), Err(CodecError::OutOfRange(_))));
        assert!(matches!(encode_move(ChessMove::new(0, 200)), Err(CodecError::OutOfRange(_))));
        assert!(matches!(
            encode_move(ChessMove::with_promotion(48, 56, PieceKind::King)),
            Err(CodecError::OutOfRange(_))
        ));
        assert!(matches!(
            encode_move(ChessMove::with_promotion(48, 56, PieceKind::Pawn)),
            Err(CodecError::OutOfRange(_))
        ));
    }

    #[test]
    fn empty_string_is_the_starting_position() {
        assert_eq!(decode_moves(""), Ok(Vec::new()));
    }

    #[test]
    fn decode_reports_invalid_symbols_with_offset() {
        assert_eq!(
            decode_moves("#mC"),
            Err(CodecError::InvalidSymbol { symbol: '#', offset: 0 })
        );
        assert_eq!(
            decode_moves("mC~~"),
            Err(CodecError::InvalidSymbol { symbol: '~', offset: 3 })
        );
        assert_eq!(
            decode_moves("m~"),
            Err(CodecError::InvalidSymbol { symbol: '~', offset: 1 })
        );
    }

    #[test]
    fn decode_reports_truncated_move() {
        assert_eq!(decode_moves("mCU"), Err(CodecError::TruncatedMove { offset: 2 }));
    }

    #[test]
    fn promotion_lookahead_leaves_square_symbols_alone() {
        let moves = decode_moves("W4~U0").expect("valid string");
        assert_eq!(
            moves,
            vec![
                ChessMove::with_promotion(48, 56, PieceKind::Queen),
                ChessMove::new(46, 52),
            ]
        );
        assert_eq!(encode_moves(&moves).expect("encodable"), "W4~U0");
    }
}
