//! Full legal move generation pipeline.
//!
//! Runs piece-wise pseudo-legal generation, applies every candidate, and drops
//! the ones that leave the mover's own king in check.

use tracing::error;

use crate::game_state::{chess_types::ChessMove, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::{
    generate_bishop_moves, generate_knight_moves, generate_queen_moves, generate_rook_moves,
};

/// A legal move together with the position it leads to.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub chess_move: ChessMove,
    pub game_after_move: GameState,
}

pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<ChessMove> {
    let mut pseudo = Vec::<ChessMove>::with_capacity(64);
    generate_pawn_moves(game_state, &mut pseudo);
    generate_knight_moves(game_state, &mut pseudo);
    generate_bishop_moves(game_state, &mut pseudo);
    generate_rook_moves(game_state, &mut pseudo);
    generate_queen_moves(game_state, &mut pseudo);
    generate_king_moves(game_state, &mut pseudo);
    pseudo
}

pub fn generate_legal_successors(game_state: &GameState) -> Vec<GeneratedMove> {
    let pseudo = generate_pseudo_legal_moves(game_state);
    let mut legal = Vec::with_capacity(pseudo.len());

    for mv in pseudo {
        let next = match apply_move(game_state, mv) {
            Ok(next) => next,
            Err(err) => {
                error!(?mv, %err, "pseudo-legal generator produced an unplayable move");
                continue;
            }
        };

        if is_king_in_check(&next, game_state.side_to_move) {
            continue;
        }

        legal.push(GeneratedMove {
            chess_move: mv,
            game_after_move: next,
        });
    }

    legal
}

pub fn generate_legal_moves(game_state: &GameState) -> Vec<ChessMove> {
    generate_legal_successors(game_state)
        .into_iter()
        .map(|generated| generated.chess_move)
        .collect()
}
