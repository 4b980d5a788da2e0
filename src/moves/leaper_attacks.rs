//! Precomputed attack bitboards for the non-sliding pieces.
//!
//! Knight, king and pawn attacks depend only on the origin square, so they are
//! generated once at compile time into `[u64; 64]` tables.

use crate::game_state::chess_types::{Color, Square};

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const LIGHT_PAWN_STEPS: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const DARK_PAWN_STEPS: [(i32, i32); 2] = [(-1, -1), (1, -1)];

pub const KNIGHT_ATTACKS: [u64; 64] = build_table(&KNIGHT_STEPS);
pub const KING_ATTACKS: [u64; 64] = build_table(&KING_STEPS);
pub const LIGHT_PAWN_ATTACKS: [u64; 64] = build_table(&LIGHT_PAWN_STEPS);
pub const DARK_PAWN_ATTACKS: [u64; 64] = build_table(&DARK_PAWN_STEPS);

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

/// Squares a pawn of `color` standing on `square` attacks diagonally.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::Light => LIGHT_PAWN_ATTACKS[square as usize],
        Color::Dark => DARK_PAWN_ATTACKS[square as usize],
    }
}

const fn build_table(steps: &[(i32, i32)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < steps.len() {
            attacks |= set_if_valid(file + steps[i].0, rank + steps[i].1);
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}

const fn set_if_valid(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }
    1u64 << (rank * 8 + file)
}
