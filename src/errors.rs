//! Crate-level error aggregate for loading a linked game.

use thiserror::Error;

use crate::codec::move_codec::CodecError;
use crate::replay::game_replay::ReplayError;

/// Why a move string could not be turned into a game. Either way the link as a
/// whole is invalid; no part of it is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("malformed move string: {0}")]
    Decode(#[from] CodecError),
    #[error("move string does not describe a legal game: {0}")]
    Replay(#[from] ReplayError),
}
