//! Deterministic reconstruction of a game from its move sequence.
//!
//! Replay applies moves strictly in order against a `RulesEngine`, recording
//! every position and the cumulative capture ledger. The same per-move step
//! backs interactive commits, so a game played move by move and the same game
//! reloaded from its link are identical.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::move_codec::decode_moves;
use crate::errors::LinkError;
use crate::game_state::chess_types::{ChessMove, Piece, PieceKind};
use crate::replay::game_history::GameHistory;
use crate::rules::rules_engine::{GameStatus, RulesEngine};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// `index` is the 1-based position of the move in the sequence.
    #[error("move {index} is illegal: {reason}")]
    IllegalMove { index: usize, reason: String },
    #[error("move {index} was played after the game ended")]
    TooManyMoves { index: usize },
}

/// A failed replay together with the prefix built before the failing move.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ReplayFailure<P: fmt::Debug> {
    pub error: ReplayError,
    pub prefix: GameHistory<P>,
}

#[derive(Debug, Clone, Default)]
pub struct GameReplay<R> {
    rules: R,
}

impl<R: RulesEngine> GameReplay<R> {
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    #[inline]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// A history holding only the rules engine's initial position.
    pub fn start(&self) -> GameHistory<R::Position> {
        GameHistory::new(self.rules.initial_position())
    }

    pub fn status(&self, history: &GameHistory<R::Position>) -> GameStatus {
        self.rules.status(&history.positions())
    }

    /// Replay `moves` from the initial position.
    ///
    /// On failure the error carries the history up to (not including) the
    /// offending move.
    pub fn replay(&self, moves: &[ChessMove]) -> Result<GameHistory<R::Position>, ReplayFailure<R::Position>> {
        let mut history = self.start();
        for &mv in moves {
            if let Err(error) = self.apply_next(&mut history, mv) {
                return Err(ReplayFailure {
                    error,
                    prefix: history,
                });
            }
        }
        Ok(history)
    }

    /// Decode and replay a move string. Any failure rejects the whole string.
    pub fn load(&self, encoded: &str) -> Result<GameHistory<R::Position>, LinkError> {
        let moves = decode_moves(encoded)?;
        match self.replay(&moves) {
            Ok(history) => {
                debug!(plies = history.current_move_no(), "move string replayed");
                Ok(history)
            }
            Err(failure) => {
                warn!(
                    error = %failure.error,
                    applied = failure.prefix.current_move_no(),
                    "move string rejected"
                );
                Err(failure.error.into())
            }
        }
    }

    /// Append one move to `history`, returning the piece it captured.
    ///
    /// `history` is untouched when this fails.
    pub fn apply_next(
        &self,
        history: &mut GameHistory<R::Position>,
        mv: ChessMove,
    ) -> Result<Option<Piece>, ReplayError> {
        let index = history.len();

        if !self.status(history).is_in_progress() {
            return Err(ReplayError::TooManyMoves { index });
        }

        let current = history.current();
        let captured = self.capture_implied_by(&current.position, mv);
        let next = self
            .rules
            .make_move(&current.position, mv)
            .map_err(|err| ReplayError::IllegalMove {
                index,
                reason: err.to_string(),
            })?;
        let ledger = current.ledger.with_capture(captured);

        debug!(index, ?mv, ?captured, "move applied");
        history.push(next, ledger, mv);
        Ok(captured)
    }

    /// The piece `mv` would capture in `position`: the occupant of the
    /// destination, or the passed pawn for an en-passant capture.
    pub fn capture_implied_by(&self, position: &R::Position, mv: ChessMove) -> Option<Piece> {
        if let Some(occupant) = self.rules.piece_on(position, mv.to) {
            return Some(occupant);
        }

        let mover = self.rules.piece_on(position, mv.from)?;
        if mover.kind == PieceKind::Pawn && self.rules.en_passant_target(position) == Some(mv.to) {
            let victim = self.rules.active_color(position).opposite();
            return Some(Piece::new(victim, PieceKind::Pawn));
        }

        None
    }
}
