//! Append-only game history.
//!
//! Each entry pairs the position reached after a half-move with the
//! cumulative capture ledger at that point, so positions and ledgers can never
//! drift out of step. Index 0 is the initial position with an empty ledger.

use crate::codec::move_codec::{encode_moves, CodecError};
use crate::game_state::chess_types::{ChessMove, Piece};
use crate::replay::capture_ledger::{CaptureLedger, LedgerError};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<P> {
    pub position: P,
    pub ledger: CaptureLedger,
    /// Move that produced this entry; `None` only for the initial position.
    pub applied_move: Option<ChessMove>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameHistory<P> {
    entries: Vec<HistoryEntry<P>>,
}

#[allow(clippy::len_without_is_empty)]
impl<P> GameHistory<P> {
    pub fn new(initial: P) -> Self {
        Self {
            entries: vec![HistoryEntry {
                position: initial,
                ledger: CaptureLedger::new(),
                applied_move: None,
            }],
        }
    }

    /// Number of positions, including the initial one (never zero).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Half-moves applied so far.
    #[inline]
    pub fn current_move_no(&self) -> usize {
        self.entries.len() - 1
    }

    #[inline]
    pub fn entries(&self) -> &[HistoryEntry<P>] {
        &self.entries
    }

    #[inline]
    pub fn entry(&self, index: usize) -> Option<&HistoryEntry<P>> {
        self.entries.get(index)
    }

    #[inline]
    pub fn current(&self) -> &HistoryEntry<P> {
        // `new` seeds one entry and nothing ever removes entries.
        &self.entries[self.entries.len() - 1]
    }

    #[inline]
    pub fn current_position(&self) -> &P {
        &self.current().position
    }

    #[inline]
    pub fn current_ledger(&self) -> &CaptureLedger {
        &self.current().ledger
    }

    pub fn positions(&self) -> Vec<&P> {
        self.entries.iter().map(|entry| &entry.position).collect()
    }

    pub fn applied_moves(&self) -> impl Iterator<Item = ChessMove> + '_ {
        self.entries.iter().filter_map(|entry| entry.applied_move)
    }

    /// Re-encode every applied move; equals the link text of this history.
    pub fn encoded_moves(&self) -> Result<String, CodecError> {
        let moves: Vec<ChessMove> = self.applied_moves().collect();
        encode_moves(&moves)
    }

    /// Piece captured by the move that produced entry `index`.
    pub fn capture_at(&self, index: usize) -> Result<Option<Piece>, LedgerError> {
        match (index.checked_sub(1).and_then(|i| self.entries.get(i)), self.entries.get(index)) {
            (Some(prev), Some(next)) => CaptureLedger::last_capture(&prev.ledger, &next.ledger),
            _ => Ok(None),
        }
    }

    /// Piece captured by the most recent move, if any.
    pub fn last_capture(&self) -> Result<Option<Piece>, LedgerError> {
        self.capture_at(self.current_move_no())
    }

    pub(crate) fn push(&mut self, position: P, ledger: CaptureLedger, applied_move: ChessMove) {
        self.entries.push(HistoryEntry {
            position,
            ledger,
            applied_move: Some(applied_move),
        });
    }
}
