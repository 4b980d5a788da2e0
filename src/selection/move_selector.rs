//! Classification of a partially specified candidate move.
//!
//! A candidate is filled in one pick at a time (source, then destination, then
//! promotion). `classify` maps it, against the legal-move set of the current
//! position, onto exactly one `SelectorState`. It is pure; callers decide what
//! to do with the result.

use thiserror::Error;
use tracing::{debug, error};

use crate::game_state::chess_types::{ChessMove, PieceKind, Square};
use crate::rules::rules_engine::RulesEngine;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateMove {
    pub source: Option<Square>,
    pub destination: Option<Square>,
    pub promotion: Option<PieceKind>,
}

impl CandidateMove {
    /// Null candidate: no move in progress.
    pub const fn new() -> Self {
        Self {
            source: None,
            destination: None,
            promotion: None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.source.is_none() && self.destination.is_none() && self.promotion.is_none()
    }

    pub fn set_source(&mut self, square: Square) {
        self.source = Some(square);
    }

    pub fn set_destination(&mut self, square: Square) {
        self.destination = Some(square);
    }

    pub fn set_promotion(&mut self, kind: PieceKind) {
        self.promotion = Some(kind);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The finished move, if source and destination are both known.
    pub fn as_move(&self) -> Option<ChessMove> {
        Some(ChessMove {
            from: self.source?,
            to: self.destination?,
            promotion: self.promotion,
        })
    }
}

/// Internal inconsistency between a candidate and the legal-move set.
///
/// The session filters user picks before they reach the selector, so seeing
/// one of these means a caller skipped that validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionFault {
    #[error("candidate has a destination or promotion but no source")]
    MissingSource,
    #[error("no legal move starts on square {0}")]
    IllegalSource(Square),
    #[error("promotion chosen before a destination")]
    PromotionBeforeDestination,
    #[error("no legal move from square {from} to square {to}")]
    IllegalDestination { from: Square, to: Square },
    #[error("promotion to {kind:?} is not legal from square {from} to square {to}")]
    InvalidPromotion {
        from: Square,
        to: Square,
        kind: PieceKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorState {
    Empty,
    WaitingForTo,
    WaitingForPromotion,
    Legal(ChessMove),
    Invalid(SelectionFault),
}

impl SelectorState {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, SelectorState::WaitingForTo | SelectorState::WaitingForPromotion)
    }
}

/// Classify `candidate` in `position`. The first matching rule wins.
pub fn classify<R: RulesEngine>(rules: &R, position: &R::Position, candidate: &CandidateMove) -> SelectorState {
    let state = classify_against(rules, position, candidate, &rules.legal_moves(position));
    match &state {
        SelectorState::Invalid(fault) => error!(?candidate, %fault, "selector reached an invalid state"),
        _ => debug!(?candidate, ?state, "candidate classified"),
    }
    state
}

fn classify_against<R: RulesEngine>(
    rules: &R,
    position: &R::Position,
    candidate: &CandidateMove,
    legal: &[ChessMove],
) -> SelectorState {
    if candidate.is_null() {
        return SelectorState::Empty;
    }

    if let Some(mv) = candidate.as_move() {
        if legal.contains(&mv) {
            return SelectorState::Legal(mv);
        }
    }

    let Some(source) = candidate.source else {
        return SelectorState::Invalid(SelectionFault::MissingSource);
    };

    if !legal.iter().any(|mv| mv.from == source) {
        let owns_source = rules
            .piece_on(position, source)
            .is_some_and(|piece| piece.color == rules.active_color(position));
        if owns_source && candidate.destination.is_none() && candidate.promotion.is_none() {
            return SelectorState::WaitingForTo;
        }
        return SelectorState::Invalid(SelectionFault::IllegalSource(source));
    }

    let Some(destination) = candidate.destination else {
        if candidate.promotion.is_some() {
            return SelectorState::Invalid(SelectionFault::PromotionBeforeDestination);
        }
        return SelectorState::WaitingForTo;
    };

    if !legal
        .iter()
        .any(|mv| mv.from == source && mv.to == destination)
    {
        return SelectorState::Invalid(SelectionFault::IllegalDestination {
            from: source,
            to: destination,
        });
    }

    match candidate.promotion {
        None => SelectorState::WaitingForPromotion,
        Some(kind) => SelectorState::Invalid(SelectionFault::InvalidPromotion {
            from: source,
            to: destination,
            kind,
        }),
    }
}
