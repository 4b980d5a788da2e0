use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::leaper_attacks::pawn_attacks;

/// Pseudo-legal pawn moves: pushes, double pushes, captures, en passant and
/// all four promotions for moves onto the last rank.
pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let (forward, start_rank, promotion_rank): (i8, u8, u8) = match side {
        Color::Light => (8, 1, 7),
        Color::Dark => (-8, 6, 0),
    };

    let mut pawns = game_state.bitboard(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        // Pawns parked on their last rank (only reachable via FEN) cannot push.
        let one_step = from as i8 + forward;
        if !(0..64).contains(&one_step) {
            continue;
        }
        let one_step = one_step as Square;
        if (1u64 << one_step) & empty != 0 {
            push_pawn_move(out, from, one_step, promotion_rank);

            let two_step = (one_step as i8 + forward) as Square;
            if square_rank(from) == start_rank && (1u64 << two_step) & empty != 0 {
                out.push(ChessMove::new(from, two_step));
            }
        }

        let mut targets = pawn_attacks(side, from) & enemy_occ;
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;
            push_pawn_move(out, from, to, promotion_rank);
        }

        if let Some(ep) = game_state.en_passant_square {
            // An occupied target was already emitted as an ordinary capture.
            if pawn_attacks(side, from) & (1u64 << ep) & empty != 0 {
                out.push(ChessMove::new(from, ep));
            }
        }
    }
}

fn push_pawn_move(out: &mut Vec<ChessMove>, from: Square, to: Square, promotion_rank: u8) {
    if square_rank(to) == promotion_rank {
        for kind in PROMOTION_KINDS {
            out.push(ChessMove::with_promotion(from, to, kind));
        }
    } else {
        out.push(ChessMove::new(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_has_sixteen_pawn_moves() {
        let mut out = Vec::new();
        generate_pawn_moves(&GameState::new_game(), &mut out);
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn promotion_expands_to_four_moves() {
        let game = GameState::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, &mut out);
        // a7-a8 and axb8, each with four promotion choices.
        assert_eq!(out.len(), 8);
        assert!(out.contains(&ChessMove::with_promotion(48, 57, PieceKind::Queen)));
    }

    #[test]
    fn en_passant_target_is_generated() {
        let game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, &mut out);
        assert!(out.contains(&ChessMove::new(36, 43)));
    }
}
