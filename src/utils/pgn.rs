//! PGN read/write for linked games.
//!
//! Movetext is long algebraic (`1. e2e4 e7e5`), which maps one to one onto
//! the link's move encoding. A linked game always starts from the initial
//! position, so `SetUp`/`FEN` headers are rejected on import.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::codec::move_codec::{encode_moves, CodecError};
use crate::game_state::chess_types::ChessMove;
use crate::rules::rules_engine::GameStatus;
use crate::utils::algebraic::NotationError;
use crate::utils::long_algebraic::{chess_move_to_long_algebraic, long_algebraic_to_chess_move};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PgnError {
    #[error("invalid PGN header line: {0}")]
    InvalidHeader(String),
    #[error("PGN games with a custom start position cannot be linked")]
    UnsupportedSetup,
    #[error("invalid PGN move: {0}")]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub moves: Vec<ChessMove>,
    pub result: String,
}

impl PgnGame {
    /// The move string that reproduces this game.
    pub fn to_link_moves(&self) -> Result<String, PgnError> {
        Ok(encode_moves(&self.moves)?)
    }
}

/// PGN for `moves` with the standard seven-tag roster, dated today.
pub fn write_pgn(moves: &[ChessMove], status: GameStatus) -> Result<String, NotationError> {
    write_pgn_dated(moves, status, Local::now().date_naive())
}

pub fn write_pgn_dated(moves: &[ChessMove], status: GameStatus, date: NaiveDate) -> Result<String, NotationError> {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Plum Link Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert("Date".to_owned(), date.format("%Y.%m.%d").to_string());
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), status.result_token().to_owned());

    write_pgn_with_headers(moves, &headers)
}

pub fn write_pgn_with_headers(
    moves: &[ChessMove],
    headers: &BTreeMap<String, String>,
) -> Result<String, NotationError> {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut movetext_parts = Vec::<String>::with_capacity(moves.len() + 1);
    for (ply, mv) in moves.iter().enumerate() {
        let lan = chess_move_to_long_algebraic(*mv)?;
        if ply % 2 == 0 {
            movetext_parts.push(format!("{}. {}", (ply / 2) + 1, lan));
        } else {
            movetext_parts.push(lan);
        }
    }

    let result = headers
        .get("Result")
        .map(|x| normalize_result(x))
        .unwrap_or("*");
    movetext_parts.push(result.to_owned());
    out.push_str(&movetext_parts.join(" "));
    out.push('\n');

    Ok(out)
}

/// Parse headers and long algebraic movetext. Legality is left to replay.
pub fn read_pgn(pgn: &str) -> Result<PgnGame, PgnError> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<&str>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('[') {
            let (k, v) = parse_header_line(trimmed)?;
            headers.insert(k, v);
        } else {
            movetext_lines.push(trimmed);
        }
    }

    if headers.get("SetUp").map(|x| x.as_str()) == Some("1") || headers.contains_key("FEN") {
        return Err(PgnError::UnsupportedSetup);
    }

    let mut moves = Vec::<ChessMove>::new();
    let mut result = "*".to_owned();

    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    for token in movetext.split_whitespace() {
        let token = strip_move_number(token);
        if token.is_empty() {
            continue;
        }

        let cleaned = trim_annotation_suffix(token);
        if is_result_token(cleaned) {
            result = cleaned.to_owned();
            break;
        }

        moves.push(long_algebraic_to_chess_move(cleaned)?);
    }

    if let Some(header_result) = headers.get("Result") {
        result = normalize_result(header_result).to_owned();
    }

    Ok(PgnGame {
        headers,
        moves,
        result,
    })
}

fn parse_header_line(line: &str) -> Result<(String, String), PgnError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| PgnError::InvalidHeader(line.to_owned()))?;
    let (key, value_raw) = inner
        .split_once(' ')
        .ok_or_else(|| PgnError::InvalidHeader(line.to_owned()))?;

    let value = value_raw
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| PgnError::InvalidHeader(line.to_owned()))?
        .replace("\\\"", "\"");
    Ok((key.trim().to_owned(), value))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::new();
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' => paren_depth = paren_depth.saturating_add(1),
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// Drop a leading `12.` or `12...`, including the glued `1.e2e4` form.
fn strip_move_number(token: &str) -> &str {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return token;
    }
    let rest = &token[digits..];
    if rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}

fn trim_annotation_suffix(token: &str) -> &str {
    token.trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}
