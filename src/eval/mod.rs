//! Position evaluation and move scoring

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, score_move, BLOCKING_MOVE, WINNING_MOVE};
pub use patterns::PatternScore;
