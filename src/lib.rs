//! Gomoku with pair captures: match engine and match service
//!
//! A Gomoku variant on a 19x19 board:
//! - Five in a row wins (overlines too, unless configured otherwise)
//! - Pair capture rule: X-O-O-X pattern captures the O-O pair
//! - Optional policies: exact five, breakable five, capture win
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards, validated placement
//! - [`rules`]: Capture and win rules, rule policies
//! - [`eval`]: Position evaluation and move scoring
//! - [`search`]: Fixed-depth alpha-beta search
//! - [`engine`]: Suggestion engine integrating the above
//! - [`game`]: Matches with reversible history
//! - [`arcade`]: Concurrent registry of matches
//! - [`service`]: JSON request/response operations
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{Control, Match, Pos, SuggestionEngine};
//!
//! let engine = SuggestionEngine::new();
//! let mut game = Match::new(1, Control::Human, Control::Engine);
//!
//! game.add_move(1, Pos::new(9, 9)).unwrap();
//! let reply = game.play_engine_move(&engine).unwrap();
//! assert_eq!(reply.player, 2);
//!
//! // Undo is exact
//! game.unapply_last_move().unwrap();
//! assert_eq!(game.board().stone_count(), 1);
//! ```

pub mod arcade;
pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod service;

// Re-export commonly used types for convenience
pub use arcade::Arcade;
pub use board::{Board, Pos, Stone, BOARD_SIZE, CENTER};
pub use engine::{EngineConfig, Suggestion, SuggestionEngine, SuggestionKind};
pub use error::GameError;
pub use game::{Control, GameResult, Match, MatchId, Move, Player, WinType};
pub use rules::{CaptureCounts, Rules};
pub use service::{MatchView, Request, Service, ServiceError};
