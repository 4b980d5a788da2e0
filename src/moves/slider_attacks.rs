//! Occupancy-aware attack maps for rooks, bishops and queens.
//!
//! Rays are traced square by square from the origin and stop on (and include)
//! the first occupied square.

use crate::game_state::chess_types::Square;

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    ROOK_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    BISHOP_DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(df, dr)| acc | trace_ray(square, df, dr, occupancy))
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

fn trace_ray(square: Square, file_step: i32, rank_step: i32, occupancy: u64) -> u64 {
    let mut file = (square % 8) as i32 + file_step;
    let mut rank = (square / 8) as i32 + rank_step;
    let mut attacks = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let bit = 1u64 << (rank * 8 + file);
        attacks |= bit;
        if occupancy & bit != 0 {
            break;
        }
        file += file_step;
        rank += rank_step;
    }

    attacks
}

#[cfg(test)]
mod tests {
    use super::{bishop_attacks, queen_attacks, rook_attacks};

    #[test]
    fn empty_board_ray_counts() {
        let d4 = 27u8;
        assert_eq!(rook_attacks(d4, 0).count_ones(), 14);
        assert_eq!(bishop_attacks(d4, 0).count_ones(), 13);
        assert_eq!(queen_attacks(d4, 0).count_ones(), 27);
    }

    #[test]
    fn rook_blocker_stops_ray() {
        let blocker_on_a4 = 1u64 << 24;
        let attacks = rook_attacks(0, blocker_on_a4);
        assert_ne!(attacks & (1u64 << 24), 0);
        assert_eq!(attacks & (1u64 << 32), 0);
    }
}
