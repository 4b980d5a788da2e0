//! Rules-engine abstraction consumed by the codec/replay/selection core.
//!
//! The core never looks inside a position; everything it needs is reached
//! through this trait so that any engine exposing these queries can back a
//! linked game.

use std::fmt;

use thiserror::Error;

use crate::game_state::chess_types::{ChessMove, Color, Piece, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    InsufficientMaterial,
    FivefoldRepetition,
    SeventyFiveMoveRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    #[inline]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, GameStatus::InProgress)
    }

    /// PGN result token for this status.
    pub const fn result_token(self) -> &'static str {
        match self {
            GameStatus::InProgress => "*",
            GameStatus::Checkmate { winner: Color::Light } => "1-0",
            GameStatus::Checkmate { winner: Color::Dark } => "0-1",
            GameStatus::Stalemate | GameStatus::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "draw by insufficient material")
            }
            GameStatus::Draw(DrawReason::FivefoldRepetition) => write!(f, "draw by fivefold repetition"),
            GameStatus::Draw(DrawReason::SeventyFiveMoveRule) => write!(f, "draw by the 75-move rule"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

pub trait RulesEngine {
    type Position: Clone + fmt::Debug;

    fn initial_position(&self) -> Self::Position;

    /// Successor position; errors iff `mv` is not legal in `position`.
    fn make_move(&self, position: &Self::Position, mv: ChessMove) -> Result<Self::Position, RulesError>;

    fn legal_moves(&self, position: &Self::Position) -> Vec<ChessMove>;

    /// Status of the last entry of `positions`, given everything played
    /// before it (oldest first).
    fn status(&self, positions: &[&Self::Position]) -> GameStatus;

    fn active_color(&self, position: &Self::Position) -> Color;

    fn piece_on(&self, position: &Self::Position, square: Square) -> Option<Piece>;

    fn en_passant_target(&self, position: &Self::Position) -> Option<Square>;

    fn is_in_check(&self, position: &Self::Position, color: Color) -> bool;
}
