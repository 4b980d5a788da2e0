//! Presentation-facing controller for a linked game.
//!
//! `LinkSession` owns the move string, the history it replays to and the
//! candidate move being assembled from user picks. User picks are checked
//! here first (wrong color, unreachable square, no promotion pending, game
//! over) so that the selector only ever sees candidates that are legal so
//! far; an `Invalid` selector state therefore signals a logic fault.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::codec::move_codec::{encode_move, encoded_len, CodecError};
use crate::config::fragment_of;
use crate::errors::LinkError;
use crate::game_state::chess_types::{ChessMove, Piece, PieceKind, Square};
use crate::replay::capture_ledger::CaptureLedger;
use crate::replay::game_history::GameHistory;
use crate::replay::game_replay::{GameReplay, ReplayError};
use crate::rules::rules_engine::{GameStatus, RulesEngine};
use crate::selection::move_selector::{classify, CandidateMove, SelectionFault, SelectorState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("square {0} does not hold a piece of the side to move")]
    NotYourPiece(Square),
    #[error("pick a piece first")]
    NoSourceSelected,
    #[error("the selected piece cannot reach square {to}")]
    UnreachableDestination { from: Square, to: Square },
    #[error("no promotion is pending")]
    PromotionNotPending,
    #[error("promotion to {0:?} is not available")]
    UnavailablePromotion(PieceKind),
    #[error("the game is over: {0}")]
    GameOver(GameStatus),
    #[error("there is no move to undo")]
    NothingToUndo,
    #[error(transparent)]
    Load(#[from] LinkError),
    #[error("could not commit the move: {0}")]
    Commit(#[from] ReplayError),
    #[error(transparent)]
    Encode(#[from] CodecError),
    #[error("move selection fault: {0}")]
    Selection(SelectionFault),
}

/// Outcome of a pick that was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The candidate is still being assembled (or was cleared).
    Pending(SelectorState),
    /// A move was appended; `suffix` is what was added to the move string.
    Committed {
        mv: ChessMove,
        suffix: String,
        captured: Option<Piece>,
        status: GameStatus,
    },
}

/// Everything a front end needs to draw the current state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot<'a, P> {
    pub position: &'a P,
    pub ledger: &'a CaptureLedger,
    pub state: SelectorState,
    pub status: GameStatus,
    pub last_capture: Option<Piece>,
    pub in_check: bool,
    pub move_no: usize,
    pub link: &'a str,
}

#[derive(Debug, Clone)]
pub struct LinkSession<R: RulesEngine> {
    replay: GameReplay<R>,
    link: String,
    history: GameHistory<R::Position>,
    candidate: CandidateMove,
}

impl<R: RulesEngine> LinkSession<R> {
    /// A fresh game with an empty move string.
    pub fn new(rules: R) -> Self {
        let replay = GameReplay::new(rules);
        let history = replay.start();
        Self {
            replay,
            link: String::new(),
            history,
            candidate: CandidateMove::new(),
        }
    }

    /// Start from a move string (or a URL carrying one).
    pub fn from_link(rules: R, text: &str) -> Result<Self, SessionError> {
        let mut session = Self::new(rules);
        session.load_from_string(text)?;
        Ok(session)
    }

    #[inline]
    pub fn rules(&self) -> &R {
        self.replay.rules()
    }

    /// The current move string, without any URL around it.
    #[inline]
    pub fn link(&self) -> &str {
        &self.link
    }

    #[inline]
    pub fn history(&self) -> &GameHistory<R::Position> {
        &self.history
    }

    #[inline]
    pub fn candidate(&self) -> &CandidateMove {
        &self.candidate
    }

    #[inline]
    pub fn current_position(&self) -> &R::Position {
        self.history.current_position()
    }

    pub fn status(&self) -> GameStatus {
        self.replay.status(&self.history)
    }

    pub fn selector_state(&self) -> SelectorState {
        classify(self.rules(), self.current_position(), &self.candidate)
    }

    /// Replace the game with the one encoded in `text`.
    ///
    /// `text` may be a bare move string or a full share URL. On error the
    /// session is left exactly as it was.
    pub fn load_from_string(&mut self, text: &str) -> Result<(), SessionError> {
        let moves = fragment_of(text);
        let history = self.replay.load(moves).inspect_err(|err| {
            warn!(%err, "link rejected, keeping the current game");
        })?;

        self.link = moves.to_owned();
        self.history = history;
        self.candidate.reset();
        info!(plies = self.history.current_move_no(), "game loaded from link");
        Ok(())
    }

    /// Choose the piece to move, discarding any earlier picks.
    pub fn set_source(&mut self, square: Square) -> Result<SessionEvent, SessionError> {
        self.ensure_in_progress()?;

        let owns = self
            .rules()
            .piece_on(self.current_position(), square)
            .is_some_and(|piece| piece.color == self.rules().active_color(self.current_position()));
        if !owns {
            warn!(square, "pick rejected: not a piece of the side to move");
            return Err(SessionError::NotYourPiece(square));
        }

        self.candidate.reset();
        self.candidate.set_source(square);
        self.advance()
    }

    pub fn set_destination(&mut self, square: Square) -> Result<SessionEvent, SessionError> {
        self.ensure_in_progress()?;
        let from = self.candidate.source.ok_or(SessionError::NoSourceSelected)?;

        if !self.legal_destinations().contains(&square) {
            warn!(from, to = square, "pick rejected: destination unreachable");
            return Err(SessionError::UnreachableDestination { from, to: square });
        }

        self.candidate.promotion = None;
        self.candidate.set_destination(square);
        self.advance()
    }

    pub fn set_promotion(&mut self, kind: PieceKind) -> Result<SessionEvent, SessionError> {
        self.ensure_in_progress()?;
        if self.selector_state() != SelectorState::WaitingForPromotion {
            return Err(SessionError::PromotionNotPending);
        }
        if !self.promotion_choices().contains(&kind) {
            return Err(SessionError::UnavailablePromotion(kind));
        }

        self.candidate.set_promotion(kind);
        self.advance()
    }

    /// Clear the candidate move.
    pub fn reset(&mut self) -> SessionEvent {
        self.candidate.reset();
        SessionEvent::Pending(SelectorState::Empty)
    }

    /// Board-click style input: picks a source, re-picks another own piece,
    /// deselects the source, or picks a destination, depending on state.
    pub fn pick_square(&mut self, square: Square) -> Result<SessionEvent, SessionError> {
        let Some(source) = self.candidate.source else {
            return self.set_source(square);
        };
        if square == source {
            return Ok(self.reset());
        }

        let own_piece = self
            .rules()
            .piece_on(self.current_position(), square)
            .is_some_and(|piece| piece.color == self.rules().active_color(self.current_position()));
        if own_piece {
            self.set_source(square)
        } else {
            self.set_destination(square)
        }
    }

    /// Take back the last move by re-deriving the game from the move string
    /// with that move's encoding removed.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        let last = self
            .history
            .current()
            .applied_move
            .ok_or(SessionError::NothingToUndo)?;

        let keep = self.link.len().saturating_sub(encoded_len(last));
        let shorter = self.link.get(..keep).unwrap_or_default().to_owned();
        let history = self.replay.load(&shorter)?;

        self.link = shorter;
        self.history = history;
        self.candidate.reset();
        info!(plies = self.history.current_move_no(), "move undone");
        Ok(())
    }

    /// Destination squares reachable from the current source, for highlighting.
    pub fn legal_destinations(&self) -> Vec<Square> {
        let Some(from) = self.candidate.source else {
            return Vec::new();
        };
        let mut squares: Vec<Square> = self
            .rules()
            .legal_moves(self.current_position())
            .into_iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect();
        squares.sort_unstable();
        squares.dedup();
        squares
    }

    /// Promotion kinds on offer while a promotion is pending.
    pub fn promotion_choices(&self) -> Vec<PieceKind> {
        let (Some(from), Some(to)) = (self.candidate.source, self.candidate.destination) else {
            return Vec::new();
        };
        let mut kinds: Vec<PieceKind> = self
            .rules()
            .legal_moves(self.current_position())
            .into_iter()
            .filter(|mv| mv.from == from && mv.to == to)
            .filter_map(|mv| mv.promotion)
            .collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_, R::Position> {
        let position = self.current_position();
        let last_capture = self.history.last_capture().unwrap_or_else(|err| {
            error!(%err, "capture ledger corrupted");
            None
        });
        SessionSnapshot {
            position,
            ledger: self.history.current_ledger(),
            state: self.selector_state(),
            status: self.status(),
            last_capture,
            in_check: self
                .rules()
                .is_in_check(position, self.rules().active_color(position)),
            move_no: self.history.current_move_no(),
            link: &self.link,
        }
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        let status = self.status();
        if status.is_in_progress() {
            Ok(())
        } else {
            Err(SessionError::GameOver(status))
        }
    }

    fn advance(&mut self) -> Result<SessionEvent, SessionError> {
        match self.selector_state() {
            SelectorState::Legal(mv) => self.commit(mv),
            SelectorState::Invalid(fault) => {
                self.candidate.reset();
                Err(SessionError::Selection(fault))
            }
            pending => Ok(SessionEvent::Pending(pending)),
        }
    }

    fn commit(&mut self, mv: ChessMove) -> Result<SessionEvent, SessionError> {
        let suffix = encode_move(mv)?;
        let captured = self.replay.apply_next(&mut self.history, mv)?;

        self.link.push_str(&suffix);
        self.candidate.reset();
        let status = self.status();
        info!(?mv, %suffix, ?captured, %status, "move committed");

        Ok(SessionEvent::Committed {
            mv,
            suffix,
            captured,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{LinkSession, SessionError, SessionEvent};
    use crate::errors::LinkError;
    use crate::codec::move_codec::CodecError;
    use crate::game_state::chess_types::*;
    use crate::replay::game_replay::ReplayError;
    use crate::rules::rules_engine::{GameStatus, RulesEngine};
    use crate::rules::standard_rules::StandardRules;
    use crate::selection::move_selector::SelectorState;

    fn play(session: &mut LinkSession<StandardRules>, from: Square, to: Square) -> SessionEvent {
        session.set_source(from).expect("source should be accepted");
        session.set_destination(to).expect("destination should be accepted")
    }

    #[test]
    fn committing_a_move_appends_its_encoding() {
        let mut session = LinkSession::new(StandardRules::new());
        assert_eq!(
            session.set_source(12),
            Ok(SessionEvent::Pending(SelectorState::WaitingForTo))
        );
        assert_eq!(session.legal_destinations(), vec![20, 28]);

        let event = session.set_destination(28).expect("e2e4 is legal");
        assert_eq!(
            event,
            SessionEvent::Committed {
                mv: ChessMove::new(12, 28),
                suffix: "mC".to_owned(),
                captured: None,
                status: GameStatus::InProgress,
            }
        );
        assert_eq!(session.link(), "mC");
        assert!(session.candidate().is_null());
        assert_eq!(session.history().current_move_no(), 1);
    }

    #[test]
    fn interactive_play_matches_reloading_the_link() {
        let mut session = LinkSession::new(StandardRules::new());
        play(&mut session, 12, 28);
        play(&mut session, 51, 35);
        let event = play(&mut session, 28, 35);
        assert!(matches!(
            event,
            SessionEvent::Committed { captured: Some(piece), .. }
                if piece == Piece::new(Color::Dark, PieceKind::Pawn)
        ));

        let reloaded = LinkSession::from_link(StandardRules::new(), session.link()).expect("link replays");
        assert_eq!(reloaded.history(), session.history());
    }

    #[test]
    fn user_level_mistakes_are_rejected_before_the_selector() {
        let mut session = LinkSession::new(StandardRules::new());
        assert_eq!(session.set_source(52), Err(SessionError::NotYourPiece(52)));
        assert_eq!(session.set_source(28), Err(SessionError::NotYourPiece(28)));
        assert_eq!(session.set_destination(28), Err(SessionError::NoSourceSelected));
        assert_eq!(session.set_promotion(PieceKind::Queen), Err(SessionError::PromotionNotPending));

        session.set_source(12).expect("own pawn");
        assert_eq!(
            session.set_destination(36),
            Err(SessionError::UnreachableDestination { from: 12, to: 36 })
        );
        assert_eq!(session.candidate().source, Some(12));
    }

    #[test]
    fn promotion_is_chosen_last() {
        let rules = StandardRules::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut session = LinkSession::new(rules);

        session.set_source(48).expect("own pawn");
        assert_eq!(
            session.set_destination(56),
            Ok(SessionEvent::Pending(SelectorState::WaitingForPromotion))
        );
        assert_eq!(
            session.promotion_choices(),
            vec![PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
        );
        assert_eq!(
            session.set_promotion(PieceKind::King),
            Err(SessionError::UnavailablePromotion(PieceKind::King))
        );

        let event = session.set_promotion(PieceKind::Queen).expect("a8=Q is legal");
        assert!(matches!(event, SessionEvent::Committed { ref suffix, .. } if suffix == "W4~"));
        assert_eq!(session.link(), "W4~");
    }

    #[test]
    fn pick_square_selects_reselects_and_deselects() {
        let mut session = LinkSession::new(StandardRules::new());
        assert_eq!(session.pick_square(12), Ok(SessionEvent::Pending(SelectorState::WaitingForTo)));
        assert_eq!(session.pick_square(6), Ok(SessionEvent::Pending(SelectorState::WaitingForTo)));
        assert_eq!(session.candidate().source, Some(6));
        assert_eq!(session.pick_square(6), Ok(SessionEvent::Pending(SelectorState::Empty)));
        assert!(session.candidate().is_null());

        session.pick_square(6).expect("knight");
        assert!(matches!(session.pick_square(21), Ok(SessionEvent::Committed { .. })));
        assert_eq!(session.link(), "gv");
    }

    #[test]
    fn failed_load_keeps_the_current_game() {
        let mut session = LinkSession::new(StandardRules::new());
        play(&mut session, 12, 28);
        let before = session.history().clone();

        assert_eq!(
            session.load_from_string("https://chess.test/#mC%"),
            Err(SessionError::Load(LinkError::Decode(CodecError::InvalidSymbol {
                symbol: '%',
                offset: 2,
            })))
        );
        assert_eq!(
            session.load_from_string("mCmC"),
            Err(SessionError::Load(LinkError::Replay(ReplayError::IllegalMove {
                index: 2,
                reason: "illegal move: no piece on e2".to_owned(),
            })))
        );
        assert_eq!(session.link(), "mC");
        assert_eq!(session.history(), &before);
    }

    #[test]
    fn load_accepts_a_full_share_url() {
        let mut session = LinkSession::new(StandardRules::new());
        session
            .load_from_string("https://chess.test/play#mC0K")
            .expect("two legal moves");
        assert_eq!(session.link(), "mC0K");
        assert_eq!(session.history().current_move_no(), 2);
    }

    #[test]
    fn undo_strips_the_last_encoding() {
        let rules = StandardRules::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut session = LinkSession::new(rules);
        assert_eq!(session.undo(), Err(SessionError::NothingToUndo));

        session.set_source(48).expect("own pawn");
        session.set_destination(56).expect("promotion square");
        session.set_promotion(PieceKind::Rook).expect("a8=R");
        play(&mut session, 60, 51);
        assert_eq!(session.link(), "W4@8Z");

        session.undo().expect("undo king move");
        assert_eq!(session.link(), "W4@");
        session.undo().expect("undo promotion");
        assert_eq!(session.link(), "");
        assert_eq!(session.history().current_move_no(), 0);
    }

    #[test]
    fn finished_game_refuses_picks_and_snapshot_reports_mate() {
        let mut session = LinkSession::new(StandardRules::new());
        session
            .load_from_string("nv0KoE7F")
            .expect("fool's mate replays");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, GameStatus::Checkmate { winner: Color::Dark });
        assert!(snapshot.in_check);
        assert_eq!(snapshot.move_no, 4);
        assert_eq!(snapshot.last_capture, None);
        assert_eq!(snapshot.state, SelectorState::Empty);
        assert_eq!(session.rules().active_color(snapshot.position), Color::Light);

        assert_eq!(
            session.set_source(4),
            Err(SessionError::GameOver(GameStatus::Checkmate { winner: Color::Dark }))
        );
    }
}
