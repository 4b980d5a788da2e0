//! Line-oriented console front end for a linked game.
//!
//! Reads one command per line, drives a `LinkSession` and writes the reply.
//! Kept free of process-level concerns so it can be driven from tests with
//! in-memory readers and writers.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::game_state::chess_types::Square;
use crate::rules::rules_engine::{GameStatus, RulesEngine};
use crate::selection::move_selector::SelectorState;
use crate::session::link_session::{LinkSession, SessionError, SessionEvent};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic, NotationError};
use crate::utils::long_algebraic::{char_to_promotion, chess_move_to_long_algebraic, long_algebraic_to_chess_move};
use crate::utils::pgn::write_pgn;
use crate::utils::render_game_state::{render_board, render_capture_tallies};

pub const HELP_TEXT: &str = "\
commands:
  pick <square>     select a piece or its destination (e.g. pick e2)
  move <move>       play a move in long algebraic form (e.g. move e2e4, move a7a8q)
  promote <piece>   choose the promotion piece: q, r, b or n
  reset             clear the move being assembled
  undo              take back the last move
  load <link>       load a share link or bare move string
  show              draw the board
  link              print the share link for this game
  pgn               print the game as PGN
  help              print this text
  quit              leave";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("unknown command {0:?}; type `help` for the list")]
    UnknownCommand(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleReply {
    Text(String),
    Quit,
}

pub struct ConsoleSession<R: RulesEngine> {
    session: LinkSession<R>,
    config: LinkConfig,
}

impl<R: RulesEngine> ConsoleSession<R> {
    pub fn new(session: LinkSession<R>, config: LinkConfig) -> Self {
        Self { session, config }
    }

    pub fn session(&self) -> &LinkSession<R> {
        &self.session
    }

    /// Run the command loop until `quit` or end of input. Command errors are
    /// reported to `output` and the loop carries on.
    pub fn run<I: BufRead, O: Write>(&mut self, input: I, mut output: O) -> io::Result<()> {
        writeln!(output, "{}", self.render())?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match self.execute(&line) {
                Ok(ConsoleReply::Quit) => break,
                Ok(ConsoleReply::Text(text)) => writeln!(output, "{text}")?,
                Err(err) => writeln!(output, "error: {err}")?,
            }
            output.flush()?;
        }
        info!(link = %self.session.link(), "console session finished");
        Ok(())
    }

    pub fn execute(&mut self, line: &str) -> Result<ConsoleReply, ConsoleError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(ConsoleReply::Text(String::new()));
        };
        let argument = words.next();
        debug!(command, ?argument, "console command");

        let text = match command.to_ascii_lowercase().as_str() {
            "pick" => {
                let square = algebraic_to_square(argument.ok_or(ConsoleError::MissingArgument("pick"))?)?;
                let event = self.session.pick_square(square)?;
                self.describe(event)
            }
            "move" => {
                let mv = long_algebraic_to_chess_move(argument.ok_or(ConsoleError::MissingArgument("move"))?)?;
                self.session.set_source(mv.from)?;
                let mut event = self.session.set_destination(mv.to)?;
                let awaiting_promotion = event == SessionEvent::Pending(SelectorState::WaitingForPromotion);
                if let (Some(kind), true) = (mv.promotion, awaiting_promotion) {
                    event = self.session.set_promotion(kind)?;
                }
                self.describe(event)
            }
            "promote" => {
                let symbol = argument
                    .and_then(|arg| arg.chars().next())
                    .ok_or(ConsoleError::MissingArgument("promote"))?;
                let event = self.session.set_promotion(char_to_promotion(symbol)?)?;
                self.describe(event)
            }
            "reset" => {
                self.session.reset();
                "selection cleared".to_owned()
            }
            "undo" => {
                self.session.undo()?;
                self.render()
            }
            "load" => {
                self.session.load_from_string(argument.unwrap_or_default())?;
                self.render()
            }
            "show" => self.render(),
            "link" => self.config.share_url(self.session.link()),
            "pgn" => {
                let moves: Vec<_> = self.session.history().applied_moves().collect();
                write_pgn(&moves, self.session.status())?
            }
            "help" => HELP_TEXT.to_owned(),
            "quit" | "exit" => return Ok(ConsoleReply::Quit),
            other => return Err(ConsoleError::UnknownCommand(other.to_owned())),
        };

        Ok(ConsoleReply::Text(text))
    }

    fn describe(&self, event: SessionEvent) -> String {
        match event {
            SessionEvent::Pending(SelectorState::WaitingForTo) => {
                format!("destinations: {}", squares_list(&self.session.legal_destinations()))
            }
            SessionEvent::Pending(SelectorState::WaitingForPromotion) => {
                "choose a promotion: promote q|r|b|n".to_owned()
            }
            SessionEvent::Pending(_) => "selection cleared".to_owned(),
            SessionEvent::Committed { mv, captured, .. } => {
                let lan = chess_move_to_long_algebraic(mv).unwrap_or_else(|_| format!("{mv:?}"));
                let mut text = format!("played {lan}");
                if let Some(piece) = captured {
                    text.push_str(&format!(", captured {piece}"));
                }
                text.push('\n');
                text.push_str(&self.render());
                text
            }
        }
    }

    fn render(&self) -> String {
        let snapshot = self.session.snapshot();
        let rules = self.session.rules();
        let mut out = render_board(rules, snapshot.position, &self.session.legal_destinations());
        out.push('\n');
        out.push_str(&render_capture_tallies(snapshot.ledger));
        out.push('\n');

        match snapshot.status {
            GameStatus::InProgress => {
                out.push_str(&format!("{} to move", rules.active_color(snapshot.position).name()));
                if snapshot.in_check {
                    out.push_str(" (check)");
                }
            }
            status => out.push_str(&format!("game over: {status}")),
        }
        out.push_str(&format!("\nlink: {}", self.config.share_url(snapshot.link)));
        out
    }
}

fn squares_list(squares: &[Square]) -> String {
    if squares.is_empty() {
        return "none".to_owned();
    }
    squares
        .iter()
        .filter_map(|&sq| square_to_algebraic(sq).ok())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{ConsoleError, ConsoleReply, ConsoleSession};
    use crate::config::LinkConfig;
    use crate::rules::standard_rules::StandardRules;
    use crate::session::link_session::{LinkSession, SessionError};
    use std::io::Cursor;

    fn console() -> ConsoleSession<StandardRules> {
        ConsoleSession::new(
            LinkSession::new(StandardRules::new()),
            LinkConfig::new("https://chess.test/play"),
        )
    }

    fn text(reply: Result<ConsoleReply, ConsoleError>) -> String {
        match reply.expect("command should succeed") {
            ConsoleReply::Text(text) => text,
            ConsoleReply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn pick_lists_destinations_then_plays() {
        let mut console = console();
        assert_eq!(text(console.execute("pick e2")), "destinations: e3 e4");
        let reply = text(console.execute("pick e4"));
        assert!(reply.starts_with("played e2e4\n"));
        assert!(reply.ends_with("Black to move\nlink: https://chess.test/play#mC"));
    }

    #[test]
    fn move_command_plays_captures_and_links() {
        let mut console = console();
        text(console.execute("move e2e4"));
        text(console.execute("move d7d5"));
        let reply = text(console.execute("move e4d5"));
        assert!(reply.starts_with("played e4d5, captured Black Pawn\n"));
        assert!(reply.contains("Black lost: ♟ (1)"));
        assert_eq!(text(console.execute("link")), "https://chess.test/play#mCZJCJ");
    }

    #[test]
    fn errors_are_reported_without_changing_the_game() {
        let mut console = console();
        assert!(matches!(console.execute("dance"), Err(ConsoleError::UnknownCommand(_))));
        assert!(matches!(console.execute("pick"), Err(ConsoleError::MissingArgument("pick"))));
        assert!(matches!(console.execute("pick z9"), Err(ConsoleError::Notation(_))));
        assert!(matches!(
            console.execute("move e7e5"),
            Err(ConsoleError::Session(SessionError::NotYourPiece(52)))
        ));
        assert!(matches!(console.execute("load mC%"), Err(ConsoleError::Session(SessionError::Load(_)))));
        assert_eq!(console.session().link(), "");
    }

    #[test]
    fn run_loop_stops_at_quit() {
        let mut console = console();
        let input = Cursor::new("move g1f3\nbogus\nundo\nquit\nmove e2e4\n");
        let mut output = Vec::new();
        console.run(input, &mut output).expect("in-memory io");

        let written = String::from_utf8(output).expect("utf-8 output");
        assert!(written.contains("played g1f3"));
        assert!(written.contains("error: unknown command \"bogus\""));
        assert_eq!(console.session().link(), "");
        assert_eq!(console.session().history().current_move_no(), 0);
    }

    #[test]
    fn pgn_command_exports_the_game() {
        let mut console = console();
        text(console.execute("load https://chess.test/play#nv0KoE7F"));
        let pgn = text(console.execute("pgn"));
        assert!(pgn.contains("[Result \"0-1\"]"));
        assert!(pgn.ends_with("1. f2f3 e7e5 2. g2g4 d8h4 0-1\n"));
    }
}
