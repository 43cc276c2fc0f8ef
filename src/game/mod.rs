//! Match state: players, move history and reversible moves
//!
//! A [`Match`] owns its board and both players. [`Match::add_move`] and
//! [`Match::unapply_last_move`] are the only operations that change game
//! state; everything else is derived from the history and the board.

mod player;
mod state;

pub use player::{Control, Move, Player};
pub use state::{GameResult, Match, MatchId, WinType};
