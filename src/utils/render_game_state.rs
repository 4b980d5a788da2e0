//! Terminal-oriented Unicode board renderer.
//!
//! Draws the board from the rules engine's piece queries plus the captured
//! piece tallies shown beside a linked game.

use crate::game_state::chess_types::*;
use crate::replay::capture_ledger::CaptureLedger;
use crate::rules::rules_engine::RulesEngine;

/// Render the board to a Unicode string, rank 8 at the top.
///
/// `marked` squares (legal destinations, say) are drawn as `*` when empty.
pub fn render_board<R: RulesEngine>(rules: &R, position: &R::Position, marked: &[Square]) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            let sq = rank * 8 + file;
            match rules.piece_on(position, sq) {
                Some(piece) => out.push(piece.unicode()),
                None if marked.contains(&sq) => out.push('*'),
                None => out.push('·'),
            }

            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

/// One line per color listing the pieces it has lost and their material.
pub fn render_capture_tallies(ledger: &CaptureLedger) -> String {
    [Color::Light, Color::Dark]
        .into_iter()
        .map(|color| {
            let pieces: String = ledger
                .captured_of(color)
                .flat_map(|(piece, count)| std::iter::repeat(piece.unicode()).take(count as usize))
                .collect();
            format!(
                "{} lost: {} ({})",
                color.name(),
                if pieces.is_empty() { "-" } else { pieces.as_str() },
                ledger.material_lost(color)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
