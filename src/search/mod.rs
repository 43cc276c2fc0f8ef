//! Search module for Gomoku AI
//!
//! Fixed-depth negamax with alpha-beta pruning over neighbourhood
//! candidates. Work is bounded by depth and a per-ply move cap.

pub mod alphabeta;

pub use alphabeta::{candidate_cells, SearchResult, Searcher};
