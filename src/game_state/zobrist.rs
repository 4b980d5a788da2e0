//! Zobrist hashing for position identity and repetition tracking.
//!
//! The keys are drawn once from a fixed-seed `StdRng`, so hashes are
//! deterministic across runs and replays of the same link always agree.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::{chess_types::*, game_state::GameState};

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for key in piece {
                *key = rng.random();
            }
        }
    }

    let side_to_move = rng.random();

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.random();
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
        en_passant_file,
    }
}

/// Compute the full position key from the board, side, rights and en passant.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let tables = tables();
    let mut key = 0u64;

    for color in [Color::Light, Color::Dark] {
        for kind in ALL_PIECE_KINDS {
            let mut bb = game_state.bitboard(color, kind);
            while bb != 0 {
                let sq = bb.trailing_zeros() as usize;
                key ^= tables.piece_square[color.index()][kind.index()][sq];
                bb &= bb - 1;
            }
        }
    }

    if game_state.side_to_move == Color::Dark {
        key ^= tables.side_to_move;
    }

    key ^= tables.castling[(game_state.castling_rights & 0x0F) as usize];

    if let Some(ep_square) = game_state.en_passant_square {
        key ^= tables.en_passant_file[square_file(ep_square) as usize];
    }

    key
}
