//! Crate root module declarations for Plum Link.
//!
//! A chess game carried entirely in a shareable link: the move codec, the
//! deterministic replay that rebuilds positions and capture ledgers from a
//! move string, the move-selection state machine, the session controller
//! that ties them together, and the bitboard rules engine backing them.

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod zobrist;
}

pub mod moves {
    pub mod leaper_attacks;
    pub mod slider_attacks;
}

pub mod move_generation {
    pub mod game_status;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod perft;
}

pub mod rules {
    pub mod rules_engine;
    pub mod standard_rules;
}

pub mod codec {
    pub mod move_codec;
}

pub mod replay {
    pub mod capture_ledger;
    pub mod game_history;
    pub mod game_replay;
}

pub mod selection {
    pub mod move_selector;
}

pub mod session {
    pub mod link_session;
}

pub mod console {
    pub mod console_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod random_game;
    pub mod render_game_state;
}

pub mod config;
pub mod errors;
