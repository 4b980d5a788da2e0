//! Canonical chess-rule constants.
//!
//! Static literals shared by the rules engine: the standard starting position
//! and the thresholds for the automatic draw rules.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the seventy-five-move rule ends the game.
pub const SEVENTY_FIVE_MOVE_HALFMOVES: u16 = 150;

/// Occurrences of one position that end the game without a claim.
pub const FIVEFOLD_REPETITION_COUNT: usize = 5;
