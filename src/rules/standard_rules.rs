//! `RulesEngine` implementation backed by the bitboard `GameState`.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::game_status::evaluate_status;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, generate_legal_successors};
use crate::rules::rules_engine::{GameStatus, RulesEngine, RulesError};
use crate::utils::algebraic::square_to_algebraic;
use crate::utils::fen_parser::FenError;

/// Orthodox chess from a fixed initial position (the standard one by default).
#[derive(Debug, Clone)]
pub struct StandardRules {
    initial: GameState,
}

impl Default for StandardRules {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardRules {
    pub fn new() -> Self {
        Self {
            initial: GameState::new_game(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self {
            initial: GameState::from_fen(fen)?,
        })
    }
}

impl RulesEngine for StandardRules {
    type Position = GameState;

    fn initial_position(&self) -> GameState {
        self.initial.clone()
    }

    fn make_move(&self, position: &GameState, mv: ChessMove) -> Result<GameState, RulesError> {
        if let Some(generated) = generate_legal_successors(position)
            .into_iter()
            .find(|generated| generated.chess_move == mv)
        {
            return Ok(generated.game_after_move);
        }
        Err(RulesError::IllegalMove(explain_illegal(position, mv)))
    }

    fn legal_moves(&self, position: &GameState) -> Vec<ChessMove> {
        generate_legal_moves(position)
    }

    fn status(&self, positions: &[&GameState]) -> GameStatus {
        evaluate_status(positions)
    }

    fn active_color(&self, position: &GameState) -> Color {
        position.side_to_move
    }

    fn piece_on(&self, position: &GameState, square: Square) -> Option<Piece> {
        if square > 63 {
            return None;
        }
        position.piece_on(square)
    }

    fn en_passant_target(&self, position: &GameState) -> Option<Square> {
        position.en_passant_square
    }

    fn is_in_check(&self, position: &GameState, color: Color) -> bool {
        is_king_in_check(position, color)
    }
}

fn explain_illegal(position: &GameState, mv: ChessMove) -> String {
    let name = |sq: Square| square_to_algebraic(sq).unwrap_or_else(|_| format!("#{sq}"));
    match (mv.from < 64).then(|| position.piece_on(mv.from)).flatten() {
        None => format!("no piece on {}", name(mv.from)),
        Some(piece) if piece.color != position.side_to_move => format!(
            "{} on {} does not belong to the side to move",
            piece,
            name(mv.from)
        ),
        Some(piece) => match mv.promotion {
            Some(kind) => format!(
                "{} cannot move from {} to {} promoting to {:?}",
                piece,
                name(mv.from),
                name(mv.to),
                kind
            ),
            None => format!("{} cannot move from {} to {}", piece, name(mv.from), name(mv.to)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::StandardRules;
    use crate::game_state::chess_types::*;
    use crate::rules::rules_engine::{GameStatus, RulesEngine, RulesError};

    #[test]
    fn make_move_accepts_legal_and_explains_illegal() {
        let rules = StandardRules::new();
        let start = rules.initial_position();

        let next = rules.make_move(&start, ChessMove::new(12, 28)).expect("e2e4 is legal");
        assert_eq!(rules.active_color(&next), Color::Dark);
        assert_eq!(rules.en_passant_target(&next), Some(20));

        assert_eq!(
            rules.make_move(&start, ChessMove::new(12, 36)),
            Err(RulesError::IllegalMove("White Pawn cannot move from e2 to e5".to_owned()))
        );
        assert_eq!(
            rules.make_move(&start, ChessMove::new(52, 36)),
            Err(RulesError::IllegalMove(
                "Black Pawn on e7 does not belong to the side to move".to_owned()
            ))
        );
        assert_eq!(
            rules.make_move(&start, ChessMove::new(28, 36)),
            Err(RulesError::IllegalMove("no piece on e4".to_owned()))
        );
    }

    #[test]
    fn custom_initial_position_is_used() {
        let rules = StandardRules::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let start = rules.initial_position();
        assert_eq!(rules.piece_on(&start, 4), Some(Piece::new(Color::Light, PieceKind::King)));
        assert_ne!(rules.status(&[&start]), GameStatus::InProgress);
    }
}
