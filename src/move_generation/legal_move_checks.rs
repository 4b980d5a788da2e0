use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::leaper_attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::slider_attacks::{bishop_attacks, rook_attacks};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.bitboard(color, PieceKind::King);
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

/// A side without a king (only possible in hand-built FENs) is never in check.
#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let attacker = |kind| game_state.bitboard(attacker_color, kind);

    // A pawn of the attacker hits `square` iff a defender pawn on `square`
    // would hit that pawn.
    if pawn_attacks(attacker_color.opposite(), square) & attacker(PieceKind::Pawn) != 0 {
        return true;
    }
    if knight_attacks(square) & attacker(PieceKind::Knight) != 0 {
        return true;
    }
    if king_attacks(square) & attacker(PieceKind::King) != 0 {
        return true;
    }

    let diagonal = attacker(PieceKind::Bishop) | attacker(PieceKind::Queen);
    if bishop_attacks(square, game_state.occupancy_all) & diagonal != 0 {
        return true;
    }

    let straight = attacker(PieceKind::Rook) | attacker(PieceKind::Queen);
    rook_attacks(square, game_state.occupancy_all) & straight != 0
}
