//! Random legal games for reproducible starting links and property tests.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::game_state::chess_types::ChessMove;
use crate::rules::rules_engine::RulesEngine;

/// Play up to `plies` uniformly random legal moves from the initial position,
/// stopping early once the game is over.
pub fn random_game<R: RulesEngine, G: Rng + ?Sized>(rules: &R, plies: usize, rng: &mut G) -> Vec<ChessMove> {
    let mut positions = vec![rules.initial_position()];
    let mut moves = Vec::with_capacity(plies);

    while moves.len() < plies {
        let refs: Vec<&R::Position> = positions.iter().collect();
        if !rules.status(&refs).is_in_progress() {
            break;
        }

        let Some(current) = positions.last() else {
            break;
        };
        let legal = rules.legal_moves(current);
        let Some(&mv) = legal.choose(rng) else {
            break;
        };
        let Ok(next) = rules.make_move(current, mv) else {
            break;
        };

        moves.push(mv);
        positions.push(next);
    }

    debug!(plies = moves.len(), "random game generated");
    moves
}
