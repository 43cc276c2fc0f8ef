//! Board structure: occupancy, validated placement and undo support

use super::bitboard::Bitboard;
use super::{Pos, Stone, BOARD_SIZE};
use crate::error::GameError;
use crate::rules::{
    can_break_five_by_capture, execute_captures, find_five_line_at_pos, find_five_positions,
    Rules,
};

/// Game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
    rules: Rules,
}

/// Outcome of a successful [`Board::place_stone`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Opponent stones removed by this placement (the capture ledger entry)
    pub captured: Vec<Pos>,
    /// Set when this placement decided the game
    pub winner: Option<Stone>,
}

impl Placement {
    #[inline]
    pub fn game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Captured pairs
    #[inline]
    pub fn pairs(&self) -> u8 {
        (self.captured.len() / 2) as u8
    }
}

impl Board {
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
            rules,
        }
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Play `stone` at `pos`: validate, place, resolve captures, detect a win.
    ///
    /// Nothing is mutated when an error is returned.
    pub fn place_stone(&mut self, stone: Stone, pos: Pos) -> Result<Placement, GameError> {
        if stone == Stone::Empty {
            return Err(GameError::UnknownPlayer(0));
        }
        if !Pos::is_valid(i32::from(pos.row), i32::from(pos.col)) {
            return Err(GameError::OutOfBounds {
                row: i32::from(pos.row),
                col: i32::from(pos.col),
            });
        }
        if !self.is_empty(pos) {
            return Err(GameError::CellOccupied(pos));
        }

        self.set_cell(pos, stone);
        let captured = execute_captures(self, pos, stone);
        let winner = self.decide_after(pos, stone);

        Ok(Placement { captured, winner })
    }

    /// Winner after `stone` was placed at `pos` and its captures resolved.
    fn decide_after(&self, pos: Pos, stone: Stone) -> Option<Stone> {
        let rules = self.rules;
        let opponent = stone.opponent();

        if rules.breakable_five {
            // The opponent's earlier five survived this reply
            if find_five_positions(self, opponent, &rules).is_some() {
                return Some(opponent);
            }
        }

        let line = find_five_line_at_pos(self, pos, stone, &rules)?;
        if rules.breakable_five && can_break_five_by_capture(self, &line, stone, &rules) {
            return None;
        }
        Some(stone)
    }

    /// Clear every position in `positions`; each must be occupied.
    ///
    /// Used by undo only. Fails without mutating if any cell is empty.
    pub fn remove_stones(&mut self, positions: &[Pos]) -> Result<(), GameError> {
        if let Some(&pos) = positions.iter().find(|&&p| self.is_empty(p)) {
            return Err(GameError::InvariantViolation(format!(
                "undo expected a stone at {pos}"
            )));
        }
        for &pos in positions {
            self.clear_cell(pos);
        }
        Ok(())
    }

    /// Give `positions` back to `stone`; each must be empty.
    ///
    /// Used by undo to restore captured stones. Fails without mutating.
    pub fn restore_stones(&mut self, stone: Stone, positions: &[Pos]) -> Result<(), GameError> {
        if stone == Stone::Empty {
            return Err(GameError::InvariantViolation(
                "cannot restore empty stones".to_string(),
            ));
        }
        if let Some(&pos) = positions.iter().find(|&&p| !self.is_empty(p)) {
            return Err(GameError::InvariantViolation(format!(
                "captured cell {pos} is occupied on undo"
            )));
        }
        for &pos in positions {
            self.set_cell(pos, stone);
        }
        Ok(())
    }

    /// Colour holding a winning line, if any. Black is checked first.
    pub fn winner(&self) -> Option<Stone> {
        [Stone::Black, Stone::White]
            .into_iter()
            .find(|&s| find_five_positions(self, s, &self.rules).is_some())
    }

    /// Whether any win condition currently holds on the board
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Raw write without validation or capture processing.
    /// Use [`Board::place_stone`] for game moves.
    #[inline]
    pub fn set_cell(&mut self, pos: Pos, stone: Stone) {
        self.clear_cell(pos);
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    /// Raw clear without validation
    #[inline]
    pub fn clear_cell(&mut self, pos: Pos) {
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// All occupied cells
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.black.union(&self.white)
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(move |&p| self.is_empty(p))
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    /// Rows of cell codes (0 empty, 1 black, 2 white)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..BOARD_SIZE as u8)
            .map(|r| {
                (0..BOARD_SIZE as u8)
                    .map(|c| self.get(Pos::new(r, c)).code())
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for c in 0..BOARD_SIZE {
            write!(f, "{c:2}")?;
        }
        writeln!(f)?;
        for r in 0..BOARD_SIZE as u8 {
            write!(f, "{r:2} ")?;
            for c in 0..BOARD_SIZE as u8 {
                let ch = match self.get(Pos::new(r, c)) {
                    Stone::Black => " X",
                    Stone::White => " O",
                    Stone::Empty => " .",
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
