use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::leaper_attacks::king_attacks;

struct CastlingPath {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    must_be_empty: u64,
    must_be_safe: [Square; 2],
}

const LIGHT_CASTLING: [CastlingPath; 2] = [
    CastlingPath {
        right: CASTLE_LIGHT_KINGSIDE,
        king_from: 4,
        king_to: 6,
        must_be_empty: (1 << 5) | (1 << 6),
        must_be_safe: [5, 6],
    },
    CastlingPath {
        right: CASTLE_LIGHT_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        must_be_empty: (1 << 1) | (1 << 2) | (1 << 3),
        must_be_safe: [3, 2],
    },
];

const DARK_CASTLING: [CastlingPath; 2] = [
    CastlingPath {
        right: CASTLE_DARK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        must_be_empty: (1 << 61) | (1 << 62),
        must_be_safe: [61, 62],
    },
    CastlingPath {
        right: CASTLE_DARK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        must_be_empty: (1 << 57) | (1 << 58) | (1 << 59),
        must_be_safe: [59, 58],
    },
];

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let king_bb = game_state.bitboard(side, PieceKind::King);
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    let mut targets = king_attacks(from) & !own_occ;
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        targets &= targets - 1;
        out.push(ChessMove::new(from, to));
    }

    generate_castling_moves(game_state, from, out);
}

fn generate_castling_moves(game_state: &GameState, king_from: Square, out: &mut Vec<ChessMove>) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();

    // Cannot castle out of check.
    if is_square_attacked(game_state, king_from, enemy) {
        return;
    }

    let paths = match side {
        Color::Light => &LIGHT_CASTLING,
        Color::Dark => &DARK_CASTLING,
    };

    for path in paths {
        if king_from == path.king_from
            && game_state.castling_rights & path.right != 0
            && game_state.bitboard(side, PieceKind::Rook) & rook_home(path) != 0
            && game_state.occupancy_all & path.must_be_empty == 0
            && path
                .must_be_safe
                .iter()
                .all(|&sq| !is_square_attacked(game_state, sq, enemy))
        {
            out.push(ChessMove::new(path.king_from, path.king_to));
        }
    }
}

fn rook_home(path: &CastlingPath) -> u64 {
    let rank_base = path.king_from - square_file(path.king_from);
    let rook_file = if path.king_to > path.king_from { 7 } else { 0 };
    1u64 << (rank_base + rook_file)
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::chess_types::ChessMove;
    use crate::game_state::game_state::GameState;

    #[test]
    fn both_castles_available_on_open_back_rank() {
        let game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_king_moves(&game, &mut out);
        assert!(out.contains(&ChessMove::new(4, 6)));
        assert!(out.contains(&ChessMove::new(4, 2)));
    }

    #[test]
    fn castling_through_attacked_square_is_not_generated() {
        // Black rook on f8 covers f1.
        let game =
            GameState::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_king_moves(&game, &mut out);
        assert!(!out.contains(&ChessMove::new(4, 6)));
        assert!(out.contains(&ChessMove::new(4, 2)));
    }
}
