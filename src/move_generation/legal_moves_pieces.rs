//! Pseudo-legal knight, bishop, rook and queen moves.
//!
//! All four share one shape: for every piece of the kind, take its attack map,
//! drop squares held by the own side, and emit a move per remaining target.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::leaper_attacks::knight_attacks;
use crate::moves::slider_attacks::{bishop_attacks, queen_attacks, rook_attacks};

pub fn generate_knight_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Knight, |sq, _| knight_attacks(sq), out);
}

pub fn generate_bishop_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Bishop, bishop_attacks, out);
}

pub fn generate_rook_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Rook, rook_attacks, out);
}

pub fn generate_queen_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    generate_piece_moves(game_state, PieceKind::Queen, queen_attacks, out);
}

fn generate_piece_moves<F>(game_state: &GameState, kind: PieceKind, attacks_of: F, out: &mut Vec<ChessMove>)
where
    F: Fn(Square, u64) -> u64,
{
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut pieces = game_state.bitboard(side, kind);
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        pieces &= pieces - 1;

        let mut targets = attacks_of(from, game_state.occupancy_all) & !own_occ;
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;
            out.push(ChessMove::new(from, to));
        }
    }
}
