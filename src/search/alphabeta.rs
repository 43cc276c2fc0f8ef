//! Fixed-depth alpha-beta search
//!
//! Negamax with alpha-beta pruning over a neighbourhood-restricted move
//! list. The search runs on a private clone of the caller's board and
//! walks the tree with make/unmake, using each placement's capture ledger
//! to restore captured stones exactly.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::rules::CaptureCounts;
//! use gomoku::search::Searcher;
//!
//! let mut board = Board::new();
//! board.place_stone(Stone::Black, Pos::new(9, 9)).unwrap();
//!
//! let mut searcher = Searcher::new(2, 8, 2);
//! let result = searcher
//!     .search(&board, Stone::White, CaptureCounts::default(), Some(Pos::new(9, 9)))
//!     .unwrap();
//! assert!(result.best_move.is_some());
//! ```

use crate::board::{Board, Placement, Pos, Stone, BOARD_SIZE, CENTER};
use crate::error::GameError;
use crate::eval::{evaluate, score_move};
use crate::rules::CaptureCounts;

/// Infinity score for alpha-beta bounds
const INF: i32 = i32::MAX / 2;

/// Score of a decided game, well above any static evaluation.
/// Reduced by the ply count so that faster wins are preferred.
const WIN_SCORE: i32 = 100_000_000;

/// Ordering bonus per step closer to the last move
const PROXIMITY_BONUS: i32 = 100;

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, `None` only when the board is full
    pub best_move: Option<Pos>,
    /// Evaluation score of the best move, from the mover's side
    pub score: i32,
    /// Depth searched
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
}

/// Alpha-beta searcher with fixed depth and a per-ply move cap
pub struct Searcher {
    depth: u8,
    max_candidates: usize,
    radius: u8,
    nodes: u64,
}

impl Searcher {
    /// Create a searcher.
    ///
    /// # Arguments
    /// * `depth` - plies to search (at least 1)
    /// * `max_candidates` - moves kept per ply after ordering (at least 1)
    /// * `radius` - Chebyshev distance from existing stones for candidates
    pub fn new(depth: u8, max_candidates: usize, radius: u8) -> Self {
        Self {
            depth: depth.max(1),
            max_candidates: max_candidates.max(1),
            radius,
            nodes: 0,
        }
    }

    /// Search for the best move for `color`.
    ///
    /// The caller's board is never modified. With depth 1 the result is
    /// the candidate with the highest one-ply [`score_move`]. Ties go to the
    /// earliest position in row-major order.
    pub fn search(
        &mut self,
        board: &Board,
        color: Stone,
        captures: CaptureCounts,
        last_move: Option<Pos>,
    ) -> Result<SearchResult, GameError> {
        self.nodes = 0;
        let mut work = board.clone();
        let mut caps = captures;

        // The one-ply rule ranks every candidate, deeper searches cap the list
        let limit = if self.depth == 1 {
            usize::MAX
        } else {
            self.max_candidates
        };
        let moves = self.generate_moves_ordered(&work, color, &caps, last_move, limit);

        let mut best_move = None;
        let mut best_score = -INF;

        for (mov, heuristic) in moves {
            let score = if self.depth == 1 {
                self.nodes += 1;
                heuristic
            } else {
                // Window opened by one so that an equal score is exact and
                // the row-major tie-break is reliable
                let alpha = if best_score > -INF { best_score - 1 } else { -INF };
                self.score_child(&mut work, &mut caps, color, mov, self.depth, alpha, INF, 1)?
            };

            let better = score > best_score
                || (score == best_score && best_move.is_some_and(|b: Pos| mov < b));
            if better {
                best_score = score;
                best_move = Some(mov);
            }
        }

        Ok(SearchResult {
            best_move,
            score: best_score,
            depth: self.depth,
            nodes: self.nodes,
        })
    }

    /// Play `mov`, score the resulting position from `color`'s side, undo.
    #[allow(clippy::too_many_arguments)]
    fn score_child(
        &mut self,
        board: &mut Board,
        caps: &mut CaptureCounts,
        color: Stone,
        mov: Pos,
        depth: u8,
        alpha: i32,
        beta: i32,
        ply: i32,
    ) -> Result<i32, GameError> {
        let saved = *caps;
        let placement = make_move(board, caps, color, mov)?;

        let score = match decided(board, &placement, caps, color) {
            Some(winner) if winner == color => WIN_SCORE - ply,
            Some(_) => -(WIN_SCORE - ply),
            None => -self.alpha_beta(
                board,
                caps,
                color.opponent(),
                depth - 1,
                -beta,
                -alpha,
                mov,
                ply + 1,
            )?,
        };

        unmake_move(board, color, mov, &placement)?;
        *caps = saved;
        Ok(score)
    }

    /// Negamax with alpha-beta pruning (fail-soft)
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        caps: &mut CaptureCounts,
        color: Stone,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        last_move: Pos,
        ply: i32,
    ) -> Result<i32, GameError> {
        self.nodes += 1;

        if depth == 0 {
            return Ok(evaluate(board, color, caps));
        }

        let moves =
            self.generate_moves_ordered(board, color, caps, Some(last_move), self.max_candidates);
        if moves.is_empty() {
            // Full board
            return Ok(0);
        }

        let mut best_score = -INF;
        for (mov, _) in moves {
            let score = self.score_child(board, caps, color, mov, depth, alpha, beta, ply)?;
            best_score = best_score.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        Ok(best_score)
    }

    /// Candidate moves with their one-ply scores, best first.
    ///
    /// Empty cells within `radius` of any stone; the centre on an empty
    /// board; the first empty cell when nothing is near a stone. The sort
    /// key adds a bonus for closeness to `last_move`, but the returned
    /// score is the plain [`score_move`] value.
    fn generate_moves_ordered(
        &self,
        board: &Board,
        color: Stone,
        caps: &CaptureCounts,
        last_move: Option<Pos>,
        limit: usize,
    ) -> Vec<(Pos, i32)> {
        if board.is_board_empty() {
            return vec![(CENTER, score_move(board, CENTER, color, caps))];
        }

        let mut moves: Vec<(Pos, i32, i32)> = candidate_cells(board, self.radius)
            .into_iter()
            .map(|pos| {
                let score = score_move(board, pos, color, caps);
                let bonus = last_move.map_or(0, |last| proximity_bonus(pos, last));
                (pos, score, score + bonus)
            })
            .collect();

        if moves.is_empty() {
            return board
                .empty_cells()
                .next()
                .map(|pos| (pos, score_move(board, pos, color, caps)))
                .into_iter()
                .collect();
        }

        moves.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        moves.truncate(limit);
        moves.into_iter().map(|(pos, score, _)| (pos, score)).collect()
    }
}

/// Empty cells within Chebyshev `radius` of an existing stone, row-major.
pub fn candidate_cells(board: &Board, radius: u8) -> Vec<Pos> {
    let mut seen = [[false; BOARD_SIZE]; BOARD_SIZE];
    let r = i32::from(radius);

    for stone in board.occupied().iter_ones() {
        for dr in -r..=r {
            for dc in -r..=r {
                if let Some(p) = stone.offset(dr, dc, 1) {
                    if board.is_empty(p) {
                        seen[p.row as usize][p.col as usize] = true;
                    }
                }
            }
        }
    }

    Pos::all()
        .filter(|p| seen[p.row as usize][p.col as usize])
        .collect()
}

#[inline]
fn proximity_bonus(pos: Pos, last: Pos) -> i32 {
    let dist = (i32::from(pos.row) - i32::from(last.row))
        .abs()
        .max((i32::from(pos.col) - i32::from(last.col)).abs());
    (3 - dist).max(0) * PROXIMITY_BONUS
}

fn make_move(
    board: &mut Board,
    caps: &mut CaptureCounts,
    color: Stone,
    mov: Pos,
) -> Result<Placement, GameError> {
    let placement = board.place_stone(color, mov)?;
    caps.add(color, placement.pairs());
    Ok(placement)
}

/// Board half of unmake; callers restore their saved capture counts.
fn unmake_move(
    board: &mut Board,
    color: Stone,
    mov: Pos,
    placement: &Placement,
) -> Result<(), GameError> {
    board.remove_stones(&[mov])?;
    board.restore_stones(color.opponent(), &placement.captured)
}

/// Winner after `color`'s placement, counting the capture-win policy
fn decided(
    board: &Board,
    placement: &Placement,
    caps: &CaptureCounts,
    color: Stone,
) -> Option<Stone> {
    placement.winner.or_else(|| {
        board
            .rules()
            .is_capture_win(caps.get(color))
            .then_some(color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rules;

    fn caps() -> CaptureCounts {
        CaptureCounts::default()
    }

    #[test]
    fn test_search_empty_board() {
        let mut searcher = Searcher::new(3, 8, 2);
        let result = searcher.search(&Board::new(), Stone::Black, caps(), None).unwrap();
        assert_eq!(result.best_move, Some(CENTER));
    }

    #[test]
    fn test_search_finds_winning_move() {
        let mut board = Board::new();
        for c in 5..9 {
            board.set_cell(Pos::new(9, c), Stone::Black);
        }
        board.set_cell(Pos::new(9, 4), Stone::White);
        board.set_cell(Pos::new(3, 3), Stone::White);
        board.set_cell(Pos::new(3, 4), Stone::White);

        let mut searcher = Searcher::new(3, 10, 2);
        let result = searcher.search(&board, Stone::Black, caps(), None).unwrap();
        assert_eq!(result.best_move, Some(Pos::new(9, 9)));
        assert!(result.score >= WIN_SCORE - 1);
    }

    #[test]
    fn test_search_blocks_opponent_win() {
        let mut board = Board::new();
        for c in 5..9 {
            board.set_cell(Pos::new(9, c), Stone::White);
        }
        board.set_cell(Pos::new(9, 4), Stone::Black);
        board.set_cell(Pos::new(12, 12), Stone::Black);

        let mut searcher = Searcher::new(2, 10, 2);
        let result = searcher.search(&board, Stone::Black, caps(), None).unwrap();
        assert_eq!(result.best_move, Some(Pos::new(9, 9)));
    }

    #[test]
    fn test_search_does_not_mutate_board() {
        let mut board = Board::new();
        board.set_cell(Pos::new(9, 9), Stone::Black);
        board.set_cell(Pos::new(9, 10), Stone::White);
        board.set_cell(Pos::new(9, 11), Stone::White);
        board.set_cell(Pos::new(10, 10), Stone::Black);
        let before = board.clone();

        let mut searcher = Searcher::new(3, 8, 2);
        searcher
            .search(&board, Stone::Black, caps(), Some(Pos::new(10, 10)))
            .unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_depth_one_matches_heuristic() {
        let mut board = Board::new();
        board.set_cell(Pos::new(9, 9), Stone::Black);
        board.set_cell(Pos::new(9, 10), Stone::White);
        board.set_cell(Pos::new(10, 9), Stone::Black);

        let best = candidate_cells(&board, 2)
            .into_iter()
            .map(|p| (p, score_move(&board, p, Stone::White, &caps())))
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(p, _)| p);

        let mut searcher = Searcher::new(1, 4, 2);
        let result = searcher.search(&board, Stone::White, caps(), None).unwrap();
        assert_eq!(result.best_move, best);
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut board = Board::new();
        board.set_cell(Pos::new(9, 9), Stone::Black);
        board.set_cell(Pos::new(8, 8), Stone::White);
        board.set_cell(Pos::new(10, 10), Stone::Black);

        let first = Searcher::new(3, 8, 2)
            .search(&board, Stone::White, caps(), Some(Pos::new(10, 10)))
            .unwrap();
        let second = Searcher::new(3, 8, 2)
            .search(&board, Stone::White, caps(), Some(Pos::new(10, 10)))
            .unwrap();
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.nodes, second.nodes);
    }

    #[test]
    fn test_search_capture_win() {
        let mut board = Board::with_rules(Rules {
            capture_win_pairs: Some(5),
            ..Rules::default()
        });
        board.set_cell(Pos::new(4, 4), Stone::Black);
        board.set_cell(Pos::new(4, 5), Stone::White);
        board.set_cell(Pos::new(4, 6), Stone::White);

        let counts = CaptureCounts { black: 4, white: 0 };
        let mut searcher = Searcher::new(2, 10, 2);
        let result = searcher.search(&board, Stone::Black, counts, None).unwrap();
        assert_eq!(result.best_move, Some(Pos::new(4, 7)));
    }

    #[test]
    fn test_candidate_cells_radius() {
        let mut board = Board::new();
        board.set_cell(Pos::new(0, 0), Stone::Black);
        let cells = candidate_cells(&board, 2);
        // 3x3 corner block minus the stone itself
        assert_eq!(cells.len(), 8);
        assert!(cells.windows(2).all(|w| w[0] < w[1]));
        assert!(!cells.contains(&Pos::new(0, 0)));
        assert!(cells.contains(&Pos::new(2, 2)));
    }

    #[test]
    fn test_single_empty_cell() {
        let mut board = Board::new();
        let hole = Pos::new(18, 18);
        for pos in Pos::all().filter(|&p| p != hole) {
            // Striped fill so no five exists
            let stone = if (pos.row / 2 + pos.col) % 2 == 0 {
                Stone::Black
            } else {
                Stone::White
            };
            board.set_cell(pos, stone);
        }
        let mut searcher = Searcher::new(3, 8, 2);
        let result = searcher.search(&board, Stone::Black, caps(), None).unwrap();
        assert_eq!(result.best_move, Some(hole));
    }
}
