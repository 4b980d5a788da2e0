//! Immutable-by-convention board snapshot used by the bundled rules engine.
//!
//! `GameState` stores piece bitboards, occupancy caches, turn/state flags,
//! clocks and the Zobrist key used for repetition detection. Moves never
//! mutate a state in place; `apply_move` returns a fresh successor.

use crate::game_state::chess_types::*;
use crate::game_state::zobrist::compute_zobrist_key;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::{parse_fen, FenError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position, built directly from bitboards.
    pub fn new_game() -> Self {
        let mut state = Self::default();
        let light = Color::Light.index();
        let dark = Color::Dark.index();

        state.pieces[light][PieceKind::Pawn.index()] = 0x0000_0000_0000_FF00;
        state.pieces[light][PieceKind::Knight.index()] = (1 << 1) | (1 << 6);
        state.pieces[light][PieceKind::Bishop.index()] = (1 << 2) | (1 << 5);
        state.pieces[light][PieceKind::Rook.index()] = (1 << 0) | (1 << 7);
        state.pieces[light][PieceKind::Queen.index()] = 1 << 3;
        state.pieces[light][PieceKind::King.index()] = 1 << 4;

        for kind in ALL_PIECE_KINDS {
            // Mirror rank 1/2 onto rank 8/7.
            state.pieces[dark][kind.index()] = state.pieces[light][kind.index()].swap_bytes();
        }

        state.castling_rights = CASTLE_LIGHT_KINGSIDE
            | CASTLE_LIGHT_QUEENSIDE
            | CASTLE_DARK_KINGSIDE
            | CASTLE_DARK_QUEENSIDE;
        state.refresh_derived();
        state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// The piece standing on `square`, if any.
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::Light, Color::Dark] {
            for kind in ALL_PIECE_KINDS {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece::new(color, kind));
                }
            }
        }
        None
    }

    #[inline]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    /// Recompute occupancy caches and the Zobrist key from the bitboards.
    pub fn refresh_derived(&mut self) {
        for color in [Color::Light, Color::Dark] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::Light.index()]
            | self.occupancy_by_color[Color::Dark.index()];
        self.zobrist_key = compute_zobrist_key(self);
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};

    #[test]
    fn new_game_matches_starting_fen() {
        let built = GameState::new_game();
        let parsed = GameState::from_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(built, parsed);
        assert_eq!(built.get_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn piece_on_reports_color_and_kind() {
        let game = GameState::new_game();
        assert_eq!(game.piece_on(4), Some(Piece::new(Color::Light, PieceKind::King)));
        assert_eq!(game.piece_on(59), Some(Piece::new(Color::Dark, PieceKind::Queen)));
        assert_eq!(game.piece_on(28), None);
    }
}
