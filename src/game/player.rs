use serde::{Deserialize, Serialize};

use crate::board::{Pos, Stone};

/// Who chooses a player's moves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    #[default]
    Human,
    /// Moves come from the suggestion engine
    Engine,
}

impl Control {
    /// `Engine` when `ai` is set
    #[inline]
    pub fn from_ai_flag(ai: bool) -> Self {
        if ai {
            Control::Engine
        } else {
            Control::Human
        }
    }
}

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// 1 or 2; player 1 plays Black and moves first
    pub id: u8,
    pub opponent_id: u8,
    /// Opponent pairs removed by this player's moves and still removed
    pub captured: u32,
    pub control: Control,
}

impl Player {
    pub fn new(id: u8, control: Control) -> Self {
        Self {
            id,
            opponent_id: if id == 1 { 2 } else { 1 },
            captured: 0,
            control,
        }
    }

    #[inline]
    pub fn stone(&self) -> Stone {
        if self.id == 1 {
            Stone::Black
        } else {
            Stone::White
        }
    }

    #[inline]
    pub fn is_engine(&self) -> bool {
        self.control == Control::Engine
    }
}

/// A played move and its capture ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Id of the player who moved
    pub player: u8,
    pub pos: Pos,
    /// Opponent stones removed by this move, restored on undo
    pub captured: Vec<Pos>,
}

impl Move {
    /// Captured pairs
    #[inline]
    pub fn pairs(&self) -> u32 {
        (self.captured.len() / 2) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_sides() {
        let p1 = Player::new(1, Control::Human);
        let p2 = Player::new(2, Control::Engine);
        assert_eq!(p1.opponent_id, 2);
        assert_eq!(p2.opponent_id, 1);
        assert_eq!(p1.stone(), Stone::Black);
        assert_eq!(p2.stone(), Stone::White);
        assert!(p2.is_engine());
        assert!(!p1.is_engine());
    }

    #[test]
    fn test_control_serde() {
        assert_eq!(serde_json::to_string(&Control::Engine).unwrap(), "\"engine\"");
        assert_eq!(Control::from_ai_flag(false), Control::Human);
    }

    #[test]
    fn test_move_pairs() {
        let mv = Move {
            player: 1,
            pos: Pos::new(5, 8),
            captured: vec![Pos::new(5, 6), Pos::new(5, 7)],
        };
        assert_eq!(mv.pairs(), 1);
    }
}
