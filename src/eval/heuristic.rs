//! Heuristic evaluation for Gomoku positions and candidate moves
//!
//! Two entry points:
//! - [`evaluate`] scores a whole position for one side (negamax leaves)
//! - [`score_move`] scores a single empty cell as a move (one-ply
//!   suggestion and move ordering)

use crate::board::{Board, Pos, Stone, BOARD_SIZE};
use crate::rules::{count_captures, line_length_through, CaptureCounts, DIRECTIONS};

use super::patterns::{capture_score, run_score, PatternScore, WINDOW_WEIGHTS};

/// Maximum Manhattan distance from center on 19x19 board
const MAX_CENTER_DIST: i32 = 18;

/// Weight per distance unit from center
const POSITION_WEIGHT: i32 = 3;

/// Score of a move that wins on the spot
pub const WINNING_MOVE: i32 = 2_000_000;

/// Score of a move that takes the cell the opponent needs to win
pub const BLOCKING_MOVE: i32 = 900_000;

/// Evaluate the board from the perspective of the given color.
///
/// Positive values favour `color`. Symmetric:
/// `evaluate(b, Black, c) == -evaluate(b, White, c)`.
#[must_use]
pub fn evaluate(board: &Board, color: Stone, captures: &CaptureCounts) -> i32 {
    let opponent = color.opponent();
    let rules = board.rules();

    if rules.is_capture_win(captures.get(color)) {
        return PatternScore::CAPTURE_WIN;
    }
    if rules.is_capture_win(captures.get(opponent)) {
        return -PatternScore::CAPTURE_WIN;
    }

    let cap_score = capture_score(
        captures.get(color),
        captures.get(opponent),
        rules.capture_win_pairs,
    );
    let pattern_score = evaluate_patterns(board, color) - evaluate_patterns(board, opponent);
    let position_score = evaluate_positions(board, color) - evaluate_positions(board, opponent);

    // Pairs the opponent can take next turn cost about half a capture threat
    let vuln = count_vulnerable_pairs(board, color) - count_vulnerable_pairs(board, opponent);

    cap_score + pattern_score + position_score - vuln * (PatternScore::CAPTURE_THREAT / 2)
}

/// Pattern score for every line segment of `color`.
///
/// Each segment is scored once, from its first stone. Two or more strong
/// threats at once get a combination bonus since only one can be blocked.
fn evaluate_patterns(board: &Board, color: Stone) -> i32 {
    let Some(stones) = board.stones(color) else {
        return 0;
    };

    let mut score = 0;
    let mut fours = 0;
    let mut open_threes = 0;

    for pos in stones.iter_ones() {
        for &(dr, dc) in &DIRECTIONS {
            let pattern_score = evaluate_line(board, pos, dr, dc, color);
            score += pattern_score;

            if pattern_score >= PatternScore::CLOSED_FOUR {
                fours += 1;
            } else if pattern_score >= PatternScore::OPEN_THREE {
                open_threes += 1;
            }
        }
    }

    if fours >= 2 || (fours >= 1 && open_threes >= 1) || open_threes >= 2 {
        score += PatternScore::OPEN_FOUR;
    }

    score
}

/// Score the segment starting at `pos` along `(dr, dc)`.
///
/// Returns 0 when `pos` is not the first stone of its segment. Allows a
/// single gap so that `OO_OO` and `O_OOO` are seen as fours.
fn evaluate_line(board: &Board, pos: Pos, dr: i32, dc: i32, color: Stone) -> i32 {
    let before = pos.offset(-dr, -dc, 1);
    if before.is_some_and(|p| board.get(p) == color) {
        return 0;
    }

    let mut count = 1usize;
    let mut open_ends = u8::from(before.is_some_and(|p| board.is_empty(p)));
    let mut has_gap = false;

    let mut n = 1;
    while let Some(p) = pos.offset(dr, dc, n) {
        match board.get(p) {
            s if s == color => {
                count += 1;
            }
            Stone::Empty if !has_gap => {
                let resumes = pos
                    .offset(dr, dc, n + 1)
                    .is_some_and(|q| board.get(q) == color);
                if resumes {
                    has_gap = true;
                } else {
                    open_ends += 1;
                    break;
                }
            }
            Stone::Empty => {
                open_ends += 1;
                break;
            }
            _ => break,
        }
        n += 1;
    }

    if has_gap {
        // Only the gap completes the line, so a gapped four has one threat
        match count {
            4.. => PatternScore::CLOSED_FOUR,
            3 if open_ends == 2 => PatternScore::OPEN_THREE,
            3 if open_ends == 1 => PatternScore::CLOSED_THREE,
            _ => 0,
        }
    } else if count >= 5 && !board.rules().is_winning_run(count) {
        // Overline under the exact-five policy: dead shape
        0
    } else {
        run_score(count, open_ends)
    }
}

/// Count pairs of `color` the opponent can capture with one move.
///
/// A pair is vulnerable when flanked by an opponent stone on one side and
/// an empty cell on the other.
fn count_vulnerable_pairs(board: &Board, color: Stone) -> i32 {
    let opponent = color.opponent();
    let Some(stones) = board.stones(color) else {
        return 0;
    };

    let mut vuln = 0;
    for pos in stones.iter_ones() {
        for &(dr, dc) in &DIRECTIONS {
            let Some(second) = pos.offset(dr, dc, 1) else {
                continue;
            };
            if board.get(second) != color {
                continue;
            }
            let before = pos.offset(-dr, -dc, 1).map(|p| board.get(p));
            let after = pos.offset(dr, dc, 2).map(|p| board.get(p));
            match (before, after) {
                (Some(Stone::Empty), Some(s)) | (Some(s), Some(Stone::Empty)) if s == opponent => {
                    vuln += 1;
                }
                _ => {}
            }
        }
    }
    vuln
}

/// Stones closer to the center are worth more
fn evaluate_positions(board: &Board, color: Stone) -> i32 {
    let Some(stones) = board.stones(color) else {
        return 0;
    };
    stones.iter_ones().map(center_bonus).sum()
}

#[inline]
fn center_bonus(pos: Pos) -> i32 {
    let center = (BOARD_SIZE / 2) as i32;
    let dist = (i32::from(pos.row) - center).abs() + (i32::from(pos.col) - center).abs();
    (MAX_CENTER_DIST - dist) * POSITION_WEIGHT
}

/// Consecutive run through `pos` (counted as `color`) and its free ends
fn shape_at(board: &Board, pos: Pos, color: Stone, dr: i32, dc: i32) -> (usize, u8) {
    let mut open_ends = 0;
    for sign in [1, -1] {
        let mut n = 1;
        while let Some(p) = pos.offset(dr * sign, dc * sign, n) {
            match board.get(p) {
                s if s == color => n += 1,
                Stone::Empty => {
                    open_ends += 1;
                    break;
                }
                _ => break,
            }
        }
    }
    (line_length_through(board, pos, color, dr, dc), open_ends)
}

/// Sum of window weights over every five-cell window through `pos` that
/// holds no `color.opponent()` stone, counting `pos` as `color`.
fn window_potential(board: &Board, pos: Pos, color: Stone) -> i32 {
    let opponent = color.opponent();
    let mut total = 0;
    for &(dr, dc) in &DIRECTIONS {
        for start in -4..=0 {
            let mut own = 0;
            let mut blocked = false;
            for n in start..start + 5 {
                match pos.offset(dr, dc, n) {
                    None => {
                        blocked = true;
                        break;
                    }
                    Some(p) if p == pos => own += 1,
                    Some(p) => match board.get(p) {
                        s if s == color => own += 1,
                        s if s == opponent => {
                            blocked = true;
                            break;
                        }
                        _ => {}
                    },
                }
            }
            if !blocked {
                total += WINDOW_WEIGHTS[own];
            }
        }
    }
    total
}

/// Whether playing `color` at `pos` leaves `pos` in a pair the opponent
/// can capture right away.
fn creates_vulnerable_pair(board: &Board, pos: Pos, color: Stone) -> bool {
    let opponent = color.opponent();
    DIRECTIONS.iter().any(|&(dr, dc)| {
        [1, -1].into_iter().any(|sign| {
            let (dr, dc) = (dr * sign, dc * sign);
            let cell = |n: i32| pos.offset(dr, dc, n).map(|p| board.get(p));
            // [before] pos ally [after]
            cell(1) == Some(color)
                && matches!(
                    (cell(-1), cell(2)),
                    (Some(Stone::Empty), Some(s)) | (Some(s), Some(Stone::Empty)) if s == opponent
                )
        })
    })
}

/// One-ply score of playing `color` at the empty cell `pos`.
///
/// Combines, from most to least urgent: an immediate win, blocking the
/// opponent's winning cell, captures, and open-line potential for both
/// sides. Higher is better. The board is only read.
#[must_use]
pub fn score_move(board: &Board, pos: Pos, color: Stone, captures: &CaptureCounts) -> i32 {
    let rules = board.rules();
    let opponent = color.opponent();

    let my_pairs = count_captures(board, pos, color);
    let wins_by_line = DIRECTIONS
        .iter()
        .any(|&(dr, dc)| rules.is_winning_run(line_length_through(board, pos, color, dr, dc)));
    let my_total = captures.get(color).saturating_add(my_pairs);
    if wins_by_line || (my_pairs > 0 && rules.is_capture_win(my_total)) {
        return WINNING_MOVE;
    }

    let mut score = 0;

    let opp_pairs = count_captures(board, pos, opponent);
    let opp_wins_here = DIRECTIONS
        .iter()
        .any(|&(dr, dc)| rules.is_winning_run(line_length_through(board, pos, opponent, dr, dc)));
    let opp_total = captures.get(opponent).saturating_add(opp_pairs);
    if opp_wins_here || (opp_pairs > 0 && rules.is_capture_win(opp_total)) {
        score += BLOCKING_MOVE;
    }

    // Captures: taking a pair, or denying the opponent one
    score += i32::from(my_pairs)
        * (PatternScore::CAPTURE_THREAT
            + capture_score(my_total, 0, rules.capture_win_pairs) / 4);
    score += i32::from(opp_pairs) * PatternScore::CAPTURE_PAIR * 2;

    // Line shapes this move creates, and the ones it takes from the opponent
    for &(dr, dc) in &DIRECTIONS {
        let (count, open) = shape_at(board, pos, color, dr, dc);
        score += run_score(count, open);
        let (count, open) = shape_at(board, pos, opponent, dr, dc);
        score += run_score(count, open) * 9 / 10;
    }

    score += window_potential(board, pos, color) + window_potential(board, pos, opponent) / 2;

    if creates_vulnerable_pair(board, pos, color) {
        score -= PatternScore::CAPTURE_THREAT / 2;
    }

    score + center_bonus(pos)
}
