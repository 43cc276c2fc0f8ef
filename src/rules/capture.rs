//! Capture rules (Pente-style pair capture)
//!
//! Capture pattern: X-O-O-X where X is the capturing player's stone
//! and O is the opponent's stone. Only exactly 2 stones can be captured.

use crate::board::{Board, Pos, Stone};

/// All eight directions; a capture is checked independently along each.
const RAYS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Cells that would be flanked along one ray if `stone` sat at `pos`
#[inline]
fn flanked_pair(board: &Board, pos: Pos, stone: Stone, (dr, dc): (i32, i32)) -> Option<[Pos; 2]> {
    let opponent = stone.opponent();
    let near = pos.offset(dr, dc, 1)?;
    let far = pos.offset(dr, dc, 2)?;
    let anchor = pos.offset(dr, dc, 3)?;

    (board.get(near) == opponent && board.get(far) == opponent && board.get(anchor) == stone)
        .then_some([near, far])
}

/// Find positions that would be captured if `stone` is placed at `pos`.
///
/// The board is not modified and `pos` itself is not inspected, so this
/// works both before and after the stone is placed.
///
/// # Returns
/// Captured positions, pair by pair (always an even count, at most 8)
pub fn get_captured_positions(board: &Board, pos: Pos, stone: Stone) -> Vec<Pos> {
    if stone == Stone::Empty {
        return Vec::new();
    }
    RAYS.iter()
        .filter_map(|&ray| flanked_pair(board, pos, stone, ray))
        .flatten()
        .collect()
}

/// Remove the stones captured by the stone just placed at `pos`.
///
/// # Returns
/// The removed positions, which form the capture ledger entry for the move
pub fn execute_captures(board: &mut Board, pos: Pos, stone: Stone) -> Vec<Pos> {
    let captured = get_captured_positions(board, pos, stone);
    for &cap_pos in &captured {
        board.clear_cell(cap_pos);
    }
    captured
}

/// Count how many pairs would be captured by a move.
#[inline]
pub fn count_captures(board: &Board, pos: Pos, stone: Stone) -> u8 {
    if stone == Stone::Empty {
        return 0;
    }
    RAYS.iter()
        .filter(|&&ray| flanked_pair(board, pos, stone, ray).is_some())
        .count() as u8
}
