//! Long algebraic move notation (`e2e4`, `a7a8q`).
//!
//! Purely syntactic: a parsed move is not checked against any position.

use crate::game_state::chess_types::{ChessMove, PieceKind};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic, NotationError};

pub fn chess_move_to_long_algebraic(mv: ChessMove) -> Result<String, NotationError> {
    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.from)?);
    out.push_str(&square_to_algebraic(mv.to)?);
    if let Some(kind) = mv.promotion {
        out.push(promotion_to_char(kind)?);
    }
    Ok(out)
}

pub fn long_algebraic_to_chess_move(long_algebraic: &str) -> Result<ChessMove, NotationError> {
    let text = long_algebraic.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(NotationError::InvalidMove(long_algebraic.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = text[4..].chars().next().map(char_to_promotion).transpose()?;

    Ok(ChessMove { from, to, promotion })
}

pub fn promotion_to_char(kind: PieceKind) -> Result<char, NotationError> {
    match kind {
        PieceKind::Knight => Ok('n'),
        PieceKind::Bishop => Ok('b'),
        PieceKind::Rook => Ok('r'),
        PieceKind::Queen => Ok('q'),
        PieceKind::Pawn => Err(NotationError::InvalidPromotion('p')),
        PieceKind::King => Err(NotationError::InvalidPromotion('k')),
    }
}

pub fn char_to_promotion(ch: char) -> Result<PieceKind, NotationError> {
    match ch.to_ascii_lowercase() {
        'n' => Ok(PieceKind::Knight),
        'b' => Ok(PieceKind::Bishop),
        'r' => Ok(PieceKind::Rook),
        'q' => Ok(PieceKind::Queen),
        _ => Err(NotationError::InvalidPromotion(ch)),
    }
}
