//! Successor-state construction for a single move.
//!
//! `apply_move` does not check legality; it trusts the caller to pass a move
//! produced by the generator. Castling, en passant and double pushes are
//! recognised from the board rather than carried as move flags.

use thiserror::Error;

use crate::game_state::{chess_types::*, game_state::GameState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("no piece on from-square {0}")]
    EmptySource(Square),
    #[error("square {0} is outside the board")]
    OffBoard(Square),
    #[error("only a pawn reaching the last rank may promote")]
    UnexpectedPromotion,
}

pub fn apply_move(game_state: &GameState, mv: ChessMove) -> Result<GameState, ApplyError> {
    if mv.from > 63 {
        return Err(ApplyError::OffBoard(mv.from));
    }
    if mv.to > 63 {
        return Err(ApplyError::OffBoard(mv.to));
    }

    let moving = game_state
        .piece_on(mv.from)
        .ok_or(ApplyError::EmptySource(mv.from))?;
    let mover = moving.color;
    let enemy = mover.opposite();
    let from_mask = 1u64 << mv.from;
    let to_mask = 1u64 << mv.to;

    let is_pawn = moving.kind == PieceKind::Pawn;
    let is_capture = game_state.occupancy_by_color[enemy.index()] & to_mask != 0;
    let is_en_passant = is_pawn
        && game_state.en_passant_square == Some(mv.to)
        && square_file(mv.from) != square_file(mv.to)
        && !is_capture;

    if mv.promotion.is_some() && !(is_pawn && matches!(square_rank(mv.to), 0 | 7)) {
        return Err(ApplyError::UnexpectedPromotion);
    }

    let mut next = game_state.clone();

    next.pieces[mover.index()][moving.kind.index()] &= !from_mask;

    if is_capture {
        for kind in ALL_PIECE_KINDS {
            next.pieces[enemy.index()][kind.index()] &= !to_mask;
        }
    } else if is_en_passant {
        // The captured pawn sits beside the mover, on the from-rank.
        let captured_sq = square_rank(mv.from) * 8 + square_file(mv.to);
        next.pieces[enemy.index()][PieceKind::Pawn.index()] &= !(1u64 << captured_sq);
    }

    let placed = mv.promotion.unwrap_or(moving.kind);
    next.pieces[mover.index()][placed.index()] |= to_mask;

    if moving.kind == PieceKind::King && mv.from.abs_diff(mv.to) == 2 {
        match mv.to {
            6 => move_rook(&mut next, mover, 7, 5),
            2 => move_rook(&mut next, mover, 0, 3),
            62 => move_rook(&mut next, mover, 63, 61),
            58 => move_rook(&mut next, mover, 56, 59),
            _ => {}
        }
    }

    update_castling_rights(&mut next, mv.from, mv.to);

    next.en_passant_square = if is_pawn && mv.from.abs_diff(mv.to) == 16 {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    if is_pawn || is_capture || is_en_passant {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if mover == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy;
    next.refresh_derived();

    Ok(next)
}

fn move_rook(game_state: &mut GameState, color: Color, from: Square, to: Square) {
    let rooks = &mut game_state.pieces[color.index()][PieceKind::Rook.index()];
    *rooks &= !(1u64 << from);
    *rooks |= 1u64 << to;
}

/// Any move touching a king or rook home square clears the matching rights.
fn update_castling_rights(game_state: &mut GameState, from: Square, to: Square) {
    for square in [from, to] {
        game_state.castling_rights &= match square {
            0 => !CASTLE_LIGHT_QUEENSIDE,
            4 => !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            7 => !CASTLE_LIGHT_KINGSIDE,
            56 => !CASTLE_DARK_QUEENSIDE,
            60 => !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE),
            63 => !CASTLE_DARK_KINGSIDE,
            _ => !0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_move, ApplyError};
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;

    #[test]
    fn double_push_sets_en_passant_square() {
        let game = GameState::new_game();
        let next = apply_move(&game, ChessMove::new(12, 28)).expect("e2e4 should apply");
        assert_eq!(next.en_passant_square, Some(20));
        assert_eq!(next.side_to_move, Color::Dark);
        assert_eq!(
            next.get_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let next = apply_move(&game, ChessMove::new(36, 43)).expect("exd6 should apply");
        assert_eq!(next.piece_on(35), None);
        assert_eq!(next.piece_on(43), Some(Piece::new(Color::Light, PieceKind::Pawn)));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let next = apply_move(&game, ChessMove::new(4, 6)).expect("O-O should apply");
        assert_eq!(next.piece_on(5), Some(Piece::new(Color::Light, PieceKind::Rook)));
        assert_eq!(next.piece_on(7), None);
        assert_eq!(next.castling_rights, CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE);
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let game = GameState::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        let next = apply_move(&game, ChessMove::with_promotion(48, 56, PieceKind::Knight))
            .expect("a8=N should apply");
        assert_eq!(next.piece_on(56), Some(Piece::new(Color::Light, PieceKind::Knight)));
        assert_eq!(next.bitboard(Color::Light, PieceKind::Pawn), 0);
    }

    #[test]
    fn rejects_empty_source_and_stray_promotion() {
        let game = GameState::new_game();
        assert_eq!(apply_move(&game, ChessMove::new(20, 28)), Err(ApplyError::EmptySource(20)));
        assert_eq!(
            apply_move(&game, ChessMove::with_promotion(12, 20, PieceKind::Queen)),
            Err(ApplyError::UnexpectedPromotion)
        );
    }
}
