use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plum_link::codec::move_codec::{encode_moves, CodecError};
use plum_link::config::{LinkConfig, DEFAULT_BASE_URL};
use plum_link::console::console_session::ConsoleSession;
use plum_link::rules::standard_rules::StandardRules;
use plum_link::session::link_session::{LinkSession, SessionError};
use plum_link::utils::pgn::{read_pgn, PgnError};
use plum_link::utils::random_game::random_game;

/// Play a chess game whose whole history lives in a shareable link.
#[derive(Parser, Debug)]
#[command(name = "plum_link")]
#[command(about = "Play chess through shareable move links")]
#[command(version)]
struct Args {
    /// Share link or bare move string to start from
    #[arg(value_name = "LINK", conflicts_with_all = ["random_plies", "from_pgn"])]
    link: Option<String>,

    /// Base URL used when printing share links
    #[arg(long, env = "PLUM_LINK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Start from a random legal game of this many half-moves
    #[arg(long, value_name = "N", conflicts_with = "from_pgn")]
    random_plies: Option<usize>,

    /// Seed for --random-plies
    #[arg(long, value_name = "S", default_value_t = 0)]
    seed: u64,

    /// Start from the long algebraic movetext of a PGN file
    #[arg(long, value_name = "FILE")]
    from_pgn: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Pgn(#[from] PgnError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), StartupError> {
    let rules = StandardRules::new();
    let start = starting_link(&args, &rules)?;
    let session = LinkSession::from_link(rules, &start)?;
    info!(link = %session.link(), "session started");

    let mut console = ConsoleSession::new(session, LinkConfig::new(args.base_url));
    let stdin = io::stdin();
    let stdout = io::stdout();
    console.run(stdin.lock(), stdout.lock())?;
    Ok(())
}

fn starting_link(args: &Args, rules: &StandardRules) -> Result<String, StartupError> {
    if let Some(path) = &args.from_pgn {
        let text = fs::read_to_string(path).map_err(|source| StartupError::Read {
            path: path.clone(),
            source,
        })?;
        return Ok(read_pgn(&text)?.to_link_moves()?);
    }

    if let Some(plies) = args.random_plies {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let moves = random_game(rules, plies, &mut rng);
        return Ok(encode_moves(&moves)?);
    }

    Ok(args.link.clone().unwrap_or_default())
}
