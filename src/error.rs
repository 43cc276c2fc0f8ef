//! Error kinds reported by the game core

use thiserror::Error;

use crate::board::Pos;

/// Every failure a core operation can report.
///
/// Operations returning one of these leave board, players and history
/// exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },
    #[error("cell {0} is already occupied")]
    CellOccupied(Pos),
    #[error("it is not player {0}'s turn")]
    WrongTurn(u8),
    #[error("match is already over")]
    MatchOver,
    #[error("no move to undo")]
    NoMoveToUndo,
    #[error("unknown player {0}")]
    UnknownPlayer(u8),
    #[error("player {0} is not engine-controlled")]
    NotEngineControlled(u8),
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl GameError {
    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::OutOfBounds { .. } => "out_of_bounds",
            GameError::CellOccupied(_) => "cell_occupied",
            GameError::WrongTurn(_) => "wrong_turn",
            GameError::MatchOver => "match_over",
            GameError::NoMoveToUndo => "no_move_to_undo",
            GameError::UnknownPlayer(_) => "unknown_player",
            GameError::NotEngineControlled(_) => "not_engine_controlled",
            GameError::InvariantViolation(_) => "invariant_violation",
        }
    }

    /// A core bug rather than bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, GameError::InvariantViolation(_))
    }
}
