//! Game-end detection over a sequence of positions.
//!
//! Checkmate and stalemate look only at the latest position. Automatic draws
//! (insufficient material, fivefold repetition, seventy-five-move rule) need
//! no claim; the claimable threefold/fifty-move draws are not applied.

use crate::game_state::chess_rules::{FIVEFOLD_REPETITION_COUNT, SEVENTY_FIVE_MOVE_HALFMOVES};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::rules::rules_engine::{DrawReason, GameStatus};

const DARK_SQUARES: u64 = 0xAA55_AA55_AA55_AA55;

/// Status of the last position in `positions` (oldest first).
pub fn evaluate_status(positions: &[&GameState]) -> GameStatus {
    let Some(current) = positions.last() else {
        return GameStatus::InProgress;
    };

    if generate_legal_moves(current).is_empty() {
        return if is_king_in_check(current, current.side_to_move) {
            GameStatus::Checkmate {
                winner: current.side_to_move.opposite(),
            }
        } else {
            GameStatus::Stalemate
        };
    }

    if has_insufficient_material(current) {
        return GameStatus::Draw(DrawReason::InsufficientMaterial);
    }

    let repetitions = positions
        .iter()
        .filter(|p| p.zobrist_key == current.zobrist_key)
        .count();
    if repetitions >= FIVEFOLD_REPETITION_COUNT {
        return GameStatus::Draw(DrawReason::FivefoldRepetition);
    }

    if current.halfmove_clock >= SEVENTY_FIVE_MOVE_HALFMOVES {
        return GameStatus::Draw(DrawReason::SeventyFiveMoveRule);
    }

    GameStatus::InProgress
}

/// Neither side can ever deliver mate: bare kings, a single minor piece, or
/// bishops that all stand on one square color.
pub fn has_insufficient_material(game_state: &GameState) -> bool {
    let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen]
        .iter()
        .any(|&kind| {
            game_state.bitboard(Color::Light, kind) | game_state.bitboard(Color::Dark, kind) != 0
        });
    if heavy_or_pawn {
        return false;
    }

    let knights = game_state.bitboard(Color::Light, PieceKind::Knight)
        | game_state.bitboard(Color::Dark, PieceKind::Knight);
    let bishops = game_state.bitboard(Color::Light, PieceKind::Bishop)
        | game_state.bitboard(Color::Dark, PieceKind::Bishop);

    if knights.count_ones() + bishops.count_ones() <= 1 {
        return true;
    }

    knights == 0 && (bishops & DARK_SQUARES == 0 || bishops & !DARK_SQUARES == 0)
}

#[cfg(test)]
mod tests {
    use super::{evaluate_status, has_insufficient_material};
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;
    use crate::rules::rules_engine::{DrawReason, GameStatus};

    fn status_of(fen: &str) -> GameStatus {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        evaluate_status(&[&game])
    }

    #[test]
    fn start_position_is_in_progress() {
        assert_eq!(evaluate_status(&[&GameState::new_game()]), GameStatus::InProgress);
    }

    #[test]
    fn fools_mate_is_checkmate_for_dark() {
        assert_eq!(
            status_of("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"),
            GameStatus::Checkmate { winner: Color::Dark }
        );
    }

    #[test]
    fn cornered_king_without_moves_is_stalemate() {
        assert_eq!(status_of("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), GameStatus::Stalemate);
    }

    #[test]
    fn material_draws() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            ("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
            ("4k1b1/8/8/8/8/8/8/2B1K3 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let game = GameState::from_fen(fen).expect("FEN should parse");
            assert_eq!(has_insufficient_material(&game), expected, "{fen}");
        }
        assert_eq!(
            status_of("4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        );
    }

    #[test]
    fn seventy_five_move_rule_ends_the_game() {
        assert_eq!(
            status_of("4k3/8/8/8/8/8/8/R3K3 w - - 150 90"),
            GameStatus::Draw(DrawReason::SeventyFiveMoveRule)
        );
    }

    #[test]
    fn fivefold_repetition_ends_the_game() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        let four = [&game, &game, &game, &game];
        assert_eq!(evaluate_status(&four), GameStatus::InProgress);
        let five = [&game, &game, &game, &game, &game];
        assert_eq!(evaluate_status(&five), GameStatus::Draw(DrawReason::FivefoldRepetition));
    }
}
