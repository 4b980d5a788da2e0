//! FEN-to-GameState parser.
//!
//! Builds a fully-populated state from a Forsyth-Edwards Notation string,
//! including piece bitboards, rights, clocks, occupancies and the Zobrist key.

use thiserror::Error;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),
    #[error("FEN has extra trailing fields")]
    TrailingFields,
    #[error("invalid board layout: {0}")]
    InvalidBoard(String),
    #[error("invalid side-to-move field: {0:?}")]
    InvalidSide(String),
    #[error("invalid castling rights character: {0:?}")]
    InvalidCastling(char),
    #[error("invalid en-passant square: {0:?}")]
    InvalidEnPassant(String),
    #[error("invalid {field}: {value:?}")]
    InvalidCounter { field: &'static str, value: String },
}

pub fn parse_fen(fen: &str) -> Result<GameState, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or(FenError::MissingField("board layout"))?;
    let side_part = parts.next().ok_or(FenError::MissingField("side-to-move"))?;
    let castling_part = parts.next().ok_or(FenError::MissingField("castling rights"))?;
    let en_passant_part = parts.next().ok_or(FenError::MissingField("en-passant square"))?;
    let halfmove_part = parts.next().ok_or(FenError::MissingField("halfmove clock"))?;
    let fullmove_part = parts.next().ok_or(FenError::MissingField("fullmove number"))?;

    if parts.next().is_some() {
        return Err(FenError::TrailingFields);
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = match side_part {
        "w" => Color::Light,
        "b" => Color::Dark,
        _ => return Err(FenError::InvalidSide(side_part.to_owned())),
    };
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = if en_passant_part == "-" {
        None
    } else {
        Some(
            algebraic_to_square(en_passant_part)
                .map_err(|_| FenError::InvalidEnPassant(en_passant_part.to_owned()))?,
        )
    };
    game_state.halfmove_clock = parse_counter("halfmove clock", halfmove_part)?;
    game_state.fullmove_number = parse_counter("fullmove number", fullmove_part)?;

    game_state.refresh_derived();
    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidBoard("board layout must contain 8 ranks".to_owned()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenError::InvalidBoard(format!("empty-square count '{ch}'")));
                }
                file += empty_count as usize;
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| FenError::InvalidBoard(format!("piece character '{ch}'")))?;
            if file >= 8 {
                return Err(FenError::InvalidBoard(format!("rank {} has too many files", board_rank + 1)));
            }

            let sq = board_rank * 8 + file;
            game_state.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << sq;
            file += 1;
        }

        if file != 8 {
            return Err(FenError::InvalidBoard(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        rights |= match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(FenError::InvalidCastling(ch)),
        };
    }

    Ok(rights)
}

fn parse_counter(field: &'static str, value: &str) -> Result<u16, FenError> {
    value.parse::<u16>().map_err(|_| FenError::InvalidCounter {
        field,
        value: value.to_owned(),
    })
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else {
        Color::Dark
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}
