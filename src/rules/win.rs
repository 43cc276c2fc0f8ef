//! Win condition checking
//!
//! A win is an unbroken line of same-colour stones whose length qualifies
//! under [`Rules::is_winning_run`]. With the breakable-five policy a line
//! the opponent can break by capture is not yet final.

use crate::board::{Board, Pos, Stone};

use super::capture::get_captured_positions;
use super::Rules;

/// Direction vectors for line checking (4 axes)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Consecutive `color` stones beyond `pos` along one ray, `pos` excluded
#[inline]
fn run_from(board: &Board, pos: Pos, color: Stone, dr: i32, dc: i32) -> usize {
    (1..)
        .map_while(|n| pos.offset(dr, dc, n))
        .take_while(|&p| board.get(p) == color)
        .count()
}

/// Length of the `color` run through `pos` along axis `(dr, dc)`,
/// counting `pos` itself as if it held `color`.
#[inline]
pub fn line_length_through(board: &Board, pos: Pos, color: Stone, dr: i32, dc: i32) -> usize {
    1 + run_from(board, pos, color, dr, dc) + run_from(board, pos, color, -dr, -dc)
}

/// Fast winning-line check through a specific position. No allocation.
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos, color: Stone, rules: &Rules) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| rules.is_winning_run(line_length_through(board, pos, color, dr, dc)))
}

/// Winning line through `pos`, ordered from its negative end
pub fn find_five_line_at_pos(
    board: &Board,
    pos: Pos,
    color: Stone,
    rules: &Rules,
) -> Option<Vec<Pos>> {
    if board.get(pos) != color {
        return None;
    }
    DIRECTIONS.iter().find_map(|&(dr, dc)| {
        let back = run_from(board, pos, color, -dr, -dc) as i32;
        let ahead = run_from(board, pos, color, dr, dc) as i32;
        if !rules.is_winning_run((back + ahead + 1) as usize) {
            return None;
        }
        (-back..=ahead)
            .map(|n| pos.offset(dr, dc, n))
            .collect::<Option<Vec<Pos>>>()
    })
}

/// Find the positions of a winning line for `stone`, if one exists.
pub fn find_five_positions(board: &Board, stone: Stone, rules: &Rules) -> Option<Vec<Pos>> {
    let stones = board.stones(stone)?;

    for pos in stones.iter_ones() {
        for &(dr, dc) in &DIRECTIONS {
            // Only scan runs from their first stone
            if pos.offset(-dr, -dc, 1).is_some_and(|p| board.get(p) == stone) {
                continue;
            }
            let len = 1 + run_from(board, pos, stone, dr, dc);
            if rules.is_winning_run(len) {
                return (0..len as i32)
                    .map(|n| pos.offset(dr, dc, n))
                    .collect::<Option<Vec<Pos>>>();
            }
        }
    }
    None
}

/// Check if the opponent can break the line by a capture on their next move.
///
/// The line is broken when, after the capture, none of its remaining stones
/// is still part of a winning line.
pub fn can_break_five_by_capture(
    board: &Board,
    five_positions: &[Pos],
    five_color: Stone,
    rules: &Rules,
) -> bool {
    let opponent = five_color.opponent();
    let mut tried = crate::board::Bitboard::new();

    // A capturing stone lands at most two cells away from what it removes
    for &pos in five_positions {
        for dr in -2i32..=2 {
            for dc in -2i32..=2 {
                let Some(cell) = pos.offset(dr, dc, 1) else {
                    continue;
                };
                if tried.get(cell) || !board.is_empty(cell) {
                    continue;
                }
                tried.set(cell);

                let captured = get_captured_positions(board, cell, opponent);
                if !captured.iter().any(|c| five_positions.contains(c)) {
                    continue;
                }

                let mut after = board.clone();
                after.set_cell(cell, opponent);
                for &c in &captured {
                    after.clear_cell(c);
                }
                let still_wins = five_positions.iter().any(|&p| {
                    after.get(p) == five_color && has_five_at_pos(&after, p, five_color, rules)
                });
                if !still_wins {
                    return true;
                }
            }
        }
    }

    false
}
