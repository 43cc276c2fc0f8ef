//! Gomoku match service with pair captures.
//!
//! ## Usage
//!
//! - `gomoku serve` - Read JSON requests from stdin, one per line
//! - `gomoku demo` - Let the engine play itself and print the board
//!
//! Logs go to stderr; `--log` (or `RUST_LOG`) sets the filter.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gomoku::{Arcade, Control, EngineConfig, Match, Rules, Service, SuggestionEngine};

/// Gomoku with pair captures: match service and suggestion engine
#[derive(Parser)]
#[command(name = "gomoku")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the line protocol on stdin/stdout
    Serve,
    /// Play an engine-vs-engine game and print the final board
    Demo {
        /// Maximum number of moves to play
        #[arg(long, default_value_t = 60)]
        moves: usize,
    },
}

#[derive(Args)]
struct Options {
    /// Search depth in plies (1 = one-ply heuristic)
    #[arg(long, global = true, default_value_t = 3)]
    depth: u8,

    /// Candidate moves kept per ply
    #[arg(long, global = true, default_value_t = 12)]
    max_candidates: usize,

    /// Only exactly five in a row wins
    #[arg(long, global = true)]
    no_overline: bool,

    /// A five the opponent can break by capture does not win at once
    #[arg(long, global = true)]
    breakable_five: bool,

    /// Captured pairs that win the game
    #[arg(long, global = true, value_name = "PAIRS")]
    capture_win: Option<u8>,

    /// Log filter, e.g. "info" or "gomoku=debug"
    #[arg(long, global = true)]
    log: Option<String>,
}

impl Options {
    fn rules(&self) -> Rules {
        Rules {
            overline_wins: !self.no_overline,
            breakable_five: self.breakable_five,
            capture_win_pairs: self.capture_win,
        }
    }

    fn engine(&self) -> SuggestionEngine {
        SuggestionEngine::with_config(EngineConfig {
            depth: self.depth,
            max_candidates: self.max_candidates,
            ..EngineConfig::default()
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.options.log.as_deref());

    match cli.command {
        Some(Commands::Serve) => serve(&cli.options),
        Some(Commands::Demo { moves }) => run_demo(&cli.options, moves),
        None => run_demo(&cli.options, 60),
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Line protocol loop: one request per line in, one response per line out.
fn serve(options: &Options) -> Result<()> {
    let service = Service::new(Arcade::with_rules(options.rules()), options.engine());
    info!(rules = ?options.rules(), engine = ?service.engine().config(), "serving on stdin");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("reading request")?;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let response = service.handle_line(line);
        writeln!(stdout, "{response}").context("writing response")?;
        stdout.flush().context("flushing response")?;
    }

    info!(matches = service.arcade().len(), "input closed");
    Ok(())
}

fn run_demo(options: &Options, max_moves: usize) -> Result<()> {
    println!("Gomoku with pair captures: engine vs engine\n");

    let engine = options.engine();
    let mut game = Match::with_rules(0, Control::Engine, Control::Engine, options.rules());

    for _ in 0..max_moves {
        if game.is_over() {
            break;
        }
        let mv = game.play_engine_move(&engine)?;
        let captures = if mv.captured.is_empty() {
            String::new()
        } else {
            format!("  captures {}", mv.pairs())
        };
        println!("Player {} plays {}{captures}", mv.player, mv.pos);
    }

    println!("\n{}", game.board());
    let [p1, p2] = game.players();
    println!("Captured pairs: player 1 = {}, player 2 = {}", p1.captured, p2.captured);
    match game.result() {
        Some(result) => println!("Player {} wins ({:?})", result.winner, result.win_type),
        None => println!("No winner after {} moves", game.history().len()),
    }
    Ok(())
}
