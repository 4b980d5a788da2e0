//! Cumulative capture counts and the diff that recovers a single move's capture.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::error;

use crate::game_state::chess_types::{Color, Piece};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("capture ledger corrupted between adjacent half-moves: {0:?}")]
    LedgerCorruption(Vec<(Piece, u32)>),
}

/// Captured pieces since the start of the game, keyed by colored piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureLedger {
    counts: BTreeMap<Piece, u32>,
}

impl CaptureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn count(&self, piece: Piece) -> u32 {
        self.counts.get(&piece).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Copy of this ledger with `captured` (if any) counted once more.
    pub fn with_capture(&self, captured: Option<Piece>) -> Self {
        let mut next = self.clone();
        if let Some(piece) = captured {
            *next.counts.entry(piece).or_insert(0) += 1;
        }
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (Piece, u32)> + '_ {
        self.counts.iter().map(|(&piece, &count)| (piece, count))
    }

    /// Pieces of `color` that have been captured, in piece-kind order.
    pub fn captured_of(&self, color: Color) -> impl Iterator<Item = (Piece, u32)> + '_ {
        self.iter().filter(move |(piece, _)| piece.color == color)
    }

    /// Material (P1 N3 B3 R5 Q9) of `color` lost so far.
    pub fn material_lost(&self, color: Color) -> u32 {
        self.captured_of(color)
            .map(|(piece, count)| piece.kind.material_value() * count)
            .sum()
    }

    /// Per-piece increase from `prev` to `next`; pieces that did not grow are
    /// absent from the result.
    pub fn diff(prev: &CaptureLedger, next: &CaptureLedger) -> CaptureLedger {
        let counts = next
            .counts
            .iter()
            .filter_map(|(&piece, &count)| {
                let before = prev.count(piece);
                (count > before).then(|| (piece, count - before))
            })
            .collect();
        CaptureLedger { counts }
    }

    /// The single piece captured between two adjacent ledgers.
    ///
    /// Adjacent ledgers differ by nothing or by exactly one piece counted once.
    /// Anything else means the history was built wrongly upstream.
    pub fn last_capture(prev: &CaptureLedger, next: &CaptureLedger) -> Result<Option<Piece>, LedgerError> {
        let delta = Self::diff(prev, next);
        let mut entries = delta.iter();
        match (entries.next(), entries.next()) {
            (None, _) => Ok(None),
            (Some((piece, 1)), None) => Ok(Some(piece)),
            _ => {
                let entries: Vec<(Piece, u32)> = delta.iter().collect();
                error!(?entries, "capture ledger corruption detected");
                Err(LedgerError::LedgerCorruption(entries))
            }
        }
    }
}
