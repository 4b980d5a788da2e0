//! Perft node counting, used to validate the legal move generator against
//! published reference counts.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::{generate_legal_moves, generate_legal_successors};

pub fn perft(game_state: &GameState, depth: u8) -> u64 {
    match depth {
        0 => 1,
        1 => generate_legal_moves(game_state).len() as u64,
        _ => generate_legal_successors(game_state)
            .iter()
            .map(|generated| perft(&generated.game_after_move, depth - 1))
            .sum(),
    }
}
