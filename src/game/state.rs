use serde::{Deserialize, Serialize};

use super::player::{Control, Move, Player};
use crate::board::{Board, Pos, Stone, CENTER};
use crate::engine::SuggestionEngine;
use crate::error::GameError;
use crate::rules::{CaptureCounts, Rules};

pub type MatchId = u64;

/// How a match was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinType {
    FiveInRow,
    Capture,
}

/// Game result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Winning player id
    pub winner: u8,
    pub win_type: WinType,
}

/// One game between two players.
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    players: [Player; 2],
    board: Board,
    history: Vec<Move>,
    result: Option<GameResult>,
    /// Cached for responses, not game state
    suggestion: Option<Pos>,
}

impl Match {
    /// New match under the default rules
    pub fn new(id: MatchId, p1: Control, p2: Control) -> Self {
        Self::with_rules(id, p1, p2, Rules::default())
    }

    pub fn with_rules(id: MatchId, p1: Control, p2: Control, rules: Rules) -> Self {
        Self {
            id,
            players: [Player::new(1, p1), Player::new(2, p2)],
            board: Board::with_rules(rules),
            history: Vec::new(),
            result: None,
            suggestion: Some(CENTER),
        }
    }

    /// Build a match by applying `moves` in order from an empty board.
    pub fn from_moves<I>(
        id: MatchId,
        p1: Control,
        p2: Control,
        rules: Rules,
        moves: I,
    ) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = (u8, Pos)>,
    {
        let mut game = Self::with_rules(id, p1, p2, rules);
        for (player, pos) in moves {
            game.add_move(player, pos)?;
        }
        Ok(game)
    }

    /// Rebuild this match from its own history on a fresh board.
    pub fn replay(&self) -> Result<Self, GameError> {
        Self::from_moves(
            self.id,
            self.players[0].control,
            self.players[1].control,
            *self.board.rules(),
            self.history.iter().map(|m| (m.player, m.pos)),
        )
    }

    #[inline]
    pub fn id(&self) -> MatchId {
        self.id
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Player by id (1 or 2)
    pub fn player(&self, id: u8) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Winning player id
    #[inline]
    pub fn winner(&self) -> Option<u8> {
        self.result.map(|r| r.winner)
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    #[inline]
    pub fn suggestion(&self) -> Option<Pos> {
        self.suggestion
    }

    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Id of the player due to move by turn alternation, over or not
    #[inline]
    fn due_id(&self) -> u8 {
        if self.history.len() % 2 == 0 {
            1
        } else {
            2
        }
    }

    /// The player due to move next, `None` once the match is over
    pub fn current_player(&self) -> Option<&Player> {
        if self.is_over() {
            return None;
        }
        self.player(self.due_id())
    }

    /// Capture counts in the form evaluation and search use
    pub fn captures(&self) -> CaptureCounts {
        let clamp = |n: u32| u8::try_from(n).unwrap_or(u8::MAX);
        CaptureCounts {
            black: clamp(self.players[0].captured),
            white: clamp(self.players[1].captured),
        }
    }

    /// The checks [`Match::add_move`] makes before touching the board:
    /// match over, known player, turn. Returns the player's stone.
    pub fn check_turn(&self, player_id: u8) -> Result<Stone, GameError> {
        if self.is_over() {
            return Err(GameError::MatchOver);
        }
        let stone = Stone::for_player(player_id).ok_or(GameError::UnknownPlayer(player_id))?;
        if player_id != self.due_id() {
            return Err(GameError::WrongTurn(player_id));
        }
        Ok(stone)
    }

    /// Play `pos` for `player_id`.
    ///
    /// Checks, in order: match over, known player, turn, then the board's
    /// own bounds and occupancy checks. Nothing changes on error.
    pub fn add_move(&mut self, player_id: u8, pos: Pos) -> Result<Move, GameError> {
        let stone = self.check_turn(player_id)?;
        let placement = self.board.place_stone(stone, pos)?;

        let mv = Move {
            player: player_id,
            pos,
            captured: placement.captured,
        };
        let idx = usize::from(player_id - 1);
        self.players[idx].captured += mv.pairs();

        let rules = *self.board.rules();
        self.result = match placement.winner {
            Some(winner) => Some(GameResult {
                winner: winner.code(),
                win_type: WinType::FiveInRow,
            }),
            None if mv.pairs() > 0 && rules.is_capture_win(self.captures().get(stone)) => {
                Some(GameResult {
                    winner: player_id,
                    win_type: WinType::Capture,
                })
            }
            None => None,
        };

        self.history.push(mv.clone());
        Ok(mv)
    }

    /// Take back the last move exactly: its stone, its captures and the
    /// mover's capture count. Clears any result the move produced.
    pub fn unapply_last_move(&mut self) -> Result<Move, GameError> {
        let last = self.history.last().ok_or(GameError::NoMoveToUndo)?;

        let stone = Stone::for_player(last.player).ok_or_else(|| {
            GameError::InvariantViolation(format!("history holds unknown player {}", last.player))
        })?;
        if self.board.get(last.pos) != stone {
            return Err(GameError::InvariantViolation(format!(
                "undo expected player {} at {}",
                last.player, last.pos
            )));
        }
        if let Some(&pos) = last.captured.iter().find(|&&p| !self.board.is_empty(p)) {
            return Err(GameError::InvariantViolation(format!(
                "captured cell {pos} is occupied on undo"
            )));
        }
        let idx = usize::from(last.player - 1);
        if self.players[idx].captured < last.pairs() {
            return Err(GameError::InvariantViolation(format!(
                "player {} has fewer captures than the move recorded",
                last.player
            )));
        }

        self.board.remove_stones(&[last.pos])?;
        self.board.restore_stones(stone.opponent(), &last.captured)?;
        self.players[idx].captured -= last.pairs();
        self.result = None;

        self.history
            .pop()
            .ok_or_else(|| GameError::InvariantViolation("history emptied during undo".into()))
    }

    /// Let the engine play for the player due to move.
    ///
    /// Fails with `NotEngineControlled` when that player is human, and
    /// with `MatchOver` when the match is over or the board is full.
    pub fn play_engine_move(&mut self, engine: &SuggestionEngine) -> Result<Move, GameError> {
        let player = self.current_player().ok_or(GameError::MatchOver)?;
        if !player.is_engine() {
            return Err(GameError::NotEngineControlled(player.id));
        }
        let (id, stone) = (player.id, player.stone());

        let pos = engine
            .suggest_with_captures(
                &self.board,
                self.last_move().map(|m| m.pos),
                stone,
                self.captures(),
            )?
            .ok_or(GameError::MatchOver)?;
        self.add_move(id, pos)
    }

    /// Recompute the cached suggestion.
    ///
    /// It is for the player due to move, or for the last mover once the
    /// match is over; the centre cell when nothing has been played.
    pub fn refresh_suggestion(
        &mut self,
        engine: &SuggestionEngine,
    ) -> Result<Option<Pos>, GameError> {
        let suggestion = match self.history.last() {
            None => Some(CENTER),
            Some(last) => {
                let advised = if self.is_over() {
                    last.player
                } else {
                    self.due_id()
                };
                let stone = Stone::for_player(advised).ok_or(GameError::UnknownPlayer(advised))?;
                engine.suggest_with_captures(&self.board, Some(last.pos), stone, self.captures())?
            }
        };
        self.suggestion = suggestion;
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;

    fn human_match() -> Match {
        Match::new(1, Control::Human, Control::Human)
    }

    fn p(row: u8, col: u8) -> Pos {
        Pos::new(row, col)
    }

    #[test]
    fn test_new_match() {
        let game = human_match();
        assert_eq!(game.current_player().map(|p| p.id), Some(1));
        assert!(game.history().is_empty());
        assert_eq!(game.suggestion(), Some(CENTER));
        assert!(!game.is_over());
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = human_match();
        game.add_move(1, p(9, 9)).unwrap();
        assert_eq!(game.current_player().map(|p| p.id), Some(2));
        assert_eq!(game.add_move(1, p(9, 10)), Err(GameError::WrongTurn(1)));
        game.add_move(2, p(9, 10)).unwrap();
        assert_eq!(game.current_player().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_unknown_player() {
        let mut game = human_match();
        assert_eq!(game.add_move(3, p(0, 0)), Err(GameError::UnknownPlayer(3)));
        assert_eq!(game.add_move(0, p(0, 0)), Err(GameError::UnknownPlayer(0)));
    }

    #[test]
    fn test_occupied_cell_changes_nothing() {
        let mut game = human_match();
        game.add_move(1, p(4, 4)).unwrap();
        let board = game.board().clone();

        assert_eq!(game.add_move(2, p(4, 4)), Err(GameError::CellOccupied(p(4, 4))));
        assert_eq!(game.board(), &board);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.players()[1].captured, 0);
        assert_eq!(game.current_player().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_alternating_singles_capture_nothing() {
        let mut game = human_match();
        let moves = [
            (1, p(9, 9)),
            (2, p(9, 10)),
            (1, p(9, 11)),
            (2, p(9, 12)),
            (1, p(9, 13)),
        ];
        for (player, pos) in moves {
            let mv = game.add_move(player, pos).unwrap();
            assert!(mv.captured.is_empty());
        }
        assert_eq!(game.board().stone_count(), 5);
        assert_eq!(game.captures(), CaptureCounts::default());
    }

    #[test]
    fn test_capture_and_undo() {
        let mut game = human_match();
        game.add_move(1, p(5, 5)).unwrap();
        game.add_move(2, p(5, 6)).unwrap();
        game.add_move(1, p(0, 0)).unwrap();
        game.add_move(2, p(5, 7)).unwrap();
        let before = game.board().clone();

        let mv = game.add_move(1, p(5, 8)).unwrap();
        let mut captured = mv.captured.clone();
        captured.sort();
        assert_eq!(captured, vec![p(5, 6), p(5, 7)]);
        assert!(game.board().is_empty(p(5, 6)));
        assert!(game.board().is_empty(p(5, 7)));
        assert_eq!(game.players()[0].captured, 1);

        let undone = game.unapply_last_move().unwrap();
        assert_eq!(undone, mv);
        assert_eq!(game.board(), &before);
        assert_eq!(game.players()[0].captured, 0);
        assert_eq!(game.history().len(), 4);
    }

    #[test]
    fn test_five_ends_match() {
        let mut game = human_match();
        for c in 0..5u8 {
            game.add_move(1, p(10, c)).unwrap();
            if c < 4 {
                game.add_move(2, p(0, c * 2)).unwrap();
            }
        }
        assert!(game.is_over());
        assert_eq!(
            game.result(),
            Some(GameResult {
                winner: 1,
                win_type: WinType::FiveInRow
            })
        );
        assert!(game.current_player().is_none());
        assert_eq!(game.add_move(2, p(3, 3)), Err(GameError::MatchOver));

        game.unapply_last_move().unwrap();
        assert!(!game.is_over());
        assert_eq!(game.current_player().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_undo_empty_history() {
        let mut game = human_match();
        assert_eq!(game.unapply_last_move(), Err(GameError::NoMoveToUndo));
    }

    #[test]
    fn test_capture_win_policy() {
        let rules = Rules {
            capture_win_pairs: Some(1),
            ..Rules::default()
        };
        let mut game = Match::with_rules(7, Control::Human, Control::Human, rules);
        for (player, pos) in [(1, p(5, 5)), (2, p(5, 6)), (1, p(0, 0)), (2, p(5, 7))] {
            game.add_move(player, pos).unwrap();
        }
        game.add_move(1, p(5, 8)).unwrap();
        assert_eq!(
            game.result(),
            Some(GameResult {
                winner: 1,
                win_type: WinType::Capture
            })
        );

        game.unapply_last_move().unwrap();
        assert_eq!(game.result(), None);
    }

    #[test]
    fn test_replay_matches_live_board() {
        let mut game = human_match();
        let moves = [
            (1, p(5, 5)),
            (2, p(5, 6)),
            (1, p(0, 0)),
            (2, p(5, 7)),
            (1, p(5, 8)),
        ];
        for (player, pos) in moves {
            game.add_move(player, pos).unwrap();
        }
        let replayed = game.replay().unwrap();
        assert_eq!(replayed.board(), game.board());
        assert_eq!(replayed.captures(), game.captures());
        assert_eq!(replayed.history(), game.history());
    }

    #[test]
    fn test_engine_move_requires_engine_player() {
        let engine = SuggestionEngine::with_config(EngineConfig {
            depth: 1,
            ..EngineConfig::default()
        });
        let mut game = human_match();
        assert_eq!(game.play_engine_move(&engine), Err(GameError::NotEngineControlled(1)));

        let mut game = Match::new(2, Control::Engine, Control::Human);
        let mv = game.play_engine_move(&engine).unwrap();
        assert_eq!(mv.pos, CENTER);
        assert_eq!(mv.player, 1);
        assert_eq!(game.play_engine_move(&engine), Err(GameError::NotEngineControlled(2)));
    }

    #[test]
    fn test_refresh_suggestion() {
        let engine = SuggestionEngine::with_config(EngineConfig {
            depth: 1,
            ..EngineConfig::default()
        });
        let mut game = human_match();
        game.add_move(1, p(9, 9)).unwrap();
        let suggestion = game.refresh_suggestion(&engine).unwrap().unwrap();
        assert!(game.board().is_empty(suggestion));
        assert_eq!(game.suggestion(), Some(suggestion));

        game.unapply_last_move().unwrap();
        assert_eq!(game.refresh_suggestion(&engine).unwrap(), Some(CENTER));
    }
}
