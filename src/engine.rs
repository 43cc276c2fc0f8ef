//! Suggestion engine: recommends the next move for a player
//!
//! The engine answers in a fixed priority order:
//!
//! 1. **Opening**: the centre cell on an empty board
//! 2. **Immediate win**: a move that wins on the spot (line or capture win)
//! 3. **Defense**: the cell the opponent would win with next turn
//! 4. **Search**: fixed-depth alpha-beta over neighbourhood candidates
//! 5. **Fallback**: the first empty cell in row-major order
//!
//! The engine only reads the board it is given. Results are pure functions
//! of the board, the capture counts, the last move and the configuration.
//!
//! # Example
//!
//! ```
//! use gomoku::{Board, Pos, Stone, SuggestionEngine};
//!
//! let engine = SuggestionEngine::new();
//! let mut board = Board::new();
//! assert_eq!(engine.suggest(&board, None, Stone::Black).unwrap(), Some(Pos::new(9, 9)));
//!
//! board.place_stone(Stone::Black, Pos::new(9, 9)).unwrap();
//! let reply = engine.suggest(&board, Some(Pos::new(9, 9)), Stone::White).unwrap();
//! assert!(reply.is_some_and(|p| board.is_empty(p)));
//! ```

use crate::board::{Board, Pos, Stone, CENTER};
use crate::error::GameError;
use crate::eval::WINNING_MOVE;
use crate::rules::CaptureCounts;
use crate::search::{candidate_cells, SearchResult, Searcher};

/// Which step of the priority order produced the suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// Canonical first move on an empty board
    Opening,
    /// Wins the game immediately (five or capture win)
    ImmediateWin,
    /// Takes the cell the opponent needs to win
    Defense,
    /// Alpha-beta search result
    Search,
    /// No candidate near any stone, first empty cell
    Fallback,
}

/// A suggested move with the data that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Suggested cell, `None` only when the board is full
    pub best_move: Option<Pos>,
    /// Score from the advised player's side
    pub score: i32,
    /// Step that produced this suggestion
    pub kind: SuggestionKind,
    /// Nodes searched
    pub nodes: u64,
}

impl Suggestion {
    #[inline]
    fn opening() -> Self {
        Self {
            best_move: Some(CENTER),
            score: 0,
            kind: SuggestionKind::Opening,
            nodes: 0,
        }
    }

    #[inline]
    fn immediate_win(pos: Pos) -> Self {
        Self {
            best_move: Some(pos),
            score: WINNING_MOVE,
            kind: SuggestionKind::ImmediateWin,
            nodes: 1,
        }
    }

    #[inline]
    fn defense(pos: Pos) -> Self {
        Self {
            best_move: Some(pos),
            score: 0,
            kind: SuggestionKind::Defense,
            nodes: 1,
        }
    }

    #[inline]
    fn from_search(result: SearchResult) -> Self {
        Self {
            best_move: result.best_move,
            score: result.score,
            kind: SuggestionKind::Search,
            nodes: result.nodes,
        }
    }

    #[inline]
    fn fallback(pos: Option<Pos>) -> Self {
        Self {
            best_move: pos,
            score: 0,
            kind: SuggestionKind::Fallback,
            nodes: 0,
        }
    }
}

/// Search limits for the suggestion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Plies searched; 1 means the one-ply heuristic only
    pub depth: u8,
    /// Candidates kept per ply after move ordering
    pub max_candidates: usize,
    /// Chebyshev distance from existing stones for candidate cells
    pub radius: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            max_candidates: 12,
            radius: 2,
        }
    }
}

/// Move suggestion engine.
///
/// Holds only configuration, so one engine can be shared between matches
/// and threads.
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    config: EngineConfig,
}

impl SuggestionEngine {
    /// Create an engine with default limits (depth 3, 12 candidates, radius 2)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom limits.
    ///
    /// # Example
    ///
    /// ```
    /// use gomoku::{EngineConfig, SuggestionEngine};
    ///
    /// let engine = SuggestionEngine::with_config(EngineConfig {
    ///     depth: 1,
    ///     ..EngineConfig::default()
    /// });
    /// assert_eq!(engine.config().depth, 1);
    /// ```
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Suggest a move for `player`, assuming no pairs have been captured.
    ///
    /// Returns `None` only when the board is full.
    pub fn suggest(
        &self,
        board: &Board,
        last_move: Option<Pos>,
        player: Stone,
    ) -> Result<Option<Pos>, GameError> {
        self.suggest_with_captures(board, last_move, player, CaptureCounts::default())
    }

    /// Suggest a move for `player` given the current capture counts.
    pub fn suggest_with_captures(
        &self,
        board: &Board,
        last_move: Option<Pos>,
        player: Stone,
        captures: CaptureCounts,
    ) -> Result<Option<Pos>, GameError> {
        Ok(self
            .suggest_with_stats(board, last_move, player, captures)?
            .best_move)
    }

    /// Suggest a move and report how it was found.
    ///
    /// Errors only with [`GameError::UnknownPlayer`] for `Stone::Empty`, or
    /// with [`GameError::InvariantViolation`] if search make/unmake fails.
    pub fn suggest_with_stats(
        &self,
        board: &Board,
        last_move: Option<Pos>,
        player: Stone,
        captures: CaptureCounts,
    ) -> Result<Suggestion, GameError> {
        if player == Stone::Empty {
            return Err(GameError::UnknownPlayer(0));
        }

        if board.is_board_empty() {
            return Ok(Suggestion::opening());
        }

        if let Some(pos) = find_immediate_win(board, player, &captures) {
            return Ok(Suggestion::immediate_win(pos));
        }

        if let Some(pos) = find_immediate_win(board, player.opponent(), &captures) {
            return Ok(Suggestion::defense(pos));
        }

        let mut searcher = Searcher::new(
            self.config.depth,
            self.config.max_candidates,
            self.config.radius,
        );
        let result = searcher.search(board, player, captures, last_move)?;
        if result.best_move.is_some() {
            return Ok(Suggestion::from_search(result));
        }

        Ok(Suggestion::fallback(board.empty_cells().next()))
    }
}

/// First cell, row-major, where `color` wins by playing.
///
/// Every move is tried on a scratch copy so that captures and the
/// breakable-five policy are honoured exactly.
fn find_immediate_win(board: &Board, color: Stone, captures: &CaptureCounts) -> Option<Pos> {
    let rules = *board.rules();
    // A winning cell always touches a stone: its own line or the captured pair
    candidate_cells(board, 1).into_iter().find(|&pos| {
        let mut scratch = board.clone();
        match scratch.place_stone(color, pos) {
            Ok(placement) => {
                placement.winner == Some(color)
                    || (placement.pairs() > 0
                        && rules
                            .is_capture_win(captures.get(color).saturating_add(placement.pairs())))
            }
            Err(_) => false,
        }
    })
}
