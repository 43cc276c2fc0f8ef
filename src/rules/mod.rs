//! Game rules for Gomoku with pair captures
//!
//! This module implements the rule set:
//! - Capture rules (pair capture)
//! - Win conditions (five in a row, optional capture win)
//! - The policies a match can be configured with ([`Rules`])

pub mod capture;
pub mod win;

use serde::{Deserialize, Serialize};

use crate::board::Stone;

// Re-exports for convenient access
pub use capture::{count_captures, execute_captures, get_captured_positions};
pub use win::{
    can_break_five_by_capture, find_five_line_at_pos, find_five_positions, has_five_at_pos,
    line_length_through, DIRECTIONS,
};

/// Rule policies that vary between match configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Six or more in a row also wins. When false only exactly five counts.
    pub overline_wins: bool,
    /// A five that the opponent can break by capture on the next move is
    /// not a win yet; it wins only if it is still standing after that move.
    pub breakable_five: bool,
    /// Captured pairs needed for a capture win, `None` disables it.
    pub capture_win_pairs: Option<u8>,
}

impl Rules {
    /// Whether a run of `len` consecutive stones is a winning line
    #[inline]
    pub fn is_winning_run(&self, len: usize) -> bool {
        if self.overline_wins {
            len >= 5
        } else {
            len == 5
        }
    }

    /// Whether `pairs` captured pairs reach the capture-win threshold
    #[inline]
    pub fn is_capture_win(&self, pairs: u8) -> bool {
        self.capture_win_pairs.is_some_and(|n| pairs >= n)
    }
}

/// Captured pairs per colour, as seen by evaluation and search.
///
/// The authoritative counts live on the match's players; search keeps a
/// private copy it updates as it makes and unmakes moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureCounts {
    pub black: u8,
    pub white: u8,
}

impl CaptureCounts {
    #[inline]
    pub fn get(&self, stone: Stone) -> u8 {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
            Stone::Empty => 0,
        }
    }

    /// Add captures for a color (saturating)
    #[inline]
    pub fn add(&mut self, stone: Stone, pairs: u8) {
        match stone {
            Stone::Black => self.black = self.black.saturating_add(pairs),
            Stone::White => self.white = self.white.saturating_add(pairs),
            Stone::Empty => {}
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            overline_wins: true,
            breakable_five: false,
            capture_win_pairs: None,
        }
    }
}
