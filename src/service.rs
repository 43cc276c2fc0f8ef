//! Request/response surface over the arcade
//!
//! Four game operations (create, fetch, move, undo) plus eviction, with
//! JSON payloads. Errors carry a stable kind and an HTTP-style status:
//! 400 for bad input and rule violations, 500 for invariant violations.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use crate::arcade::{lock, Arcade};
use crate::board::Pos;
use crate::engine::SuggestionEngine;
use crate::error::GameError;
use crate::game::{Control, GameResult, Match, MatchId, Move, Player};

/// History entries kept in move and undo responses
pub const HISTORY_TAIL: usize = 2;

/// Errors reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("unknown match {0}")]
    UnknownMatch(MatchId),
    #[error("malformed player id {0:?}")]
    BadPlayerId(String),
    #[error("player {0} is not engine-controlled and must send coordinates")]
    MissingCoordinates(u8),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

impl ServiceError {
    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::UnknownMatch(_) => "unknown_match",
            ServiceError::BadPlayerId(_) => "bad_player_id",
            ServiceError::MissingCoordinates(_) => "missing_coordinates",
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Game(e) => e.kind(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Game(e) if e.is_invariant_violation() => 500,
            _ => 400,
        }
    }
}

/// Player id as sent by clients: a number or a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerIdInput {
    Number(i64),
    Text(String),
}

impl PlayerIdInput {
    /// Parse to a player id. Range checks (1 or 2) are left to the match.
    pub fn parse(&self) -> Result<u8, ServiceError> {
        match self {
            PlayerIdInput::Number(n) => {
                u8::try_from(*n).map_err(|_| ServiceError::BadPlayerId(n.to_string()))
            }
            PlayerIdInput::Text(s) => s
                .trim()
                .parse::<u8>()
                .map_err(|_| ServiceError::BadPlayerId(s.clone())),
        }
    }
}

impl From<u8> for PlayerIdInput {
    fn from(id: u8) -> Self {
        PlayerIdInput::Number(i64::from(id))
    }
}

/// One client request, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    NewMatch {
        #[serde(default)]
        player1_ai: bool,
        #[serde(default)]
        player2_ai: bool,
    },
    GetMatch {
        id: MatchId,
    },
    /// `pos_x` is the column, `pos_y` the row
    PostMove {
        id: MatchId,
        player_id: PlayerIdInput,
        #[serde(default)]
        pos_x: Option<i32>,
        #[serde(default)]
        pos_y: Option<i32>,
    },
    Undo {
        id: MatchId,
    },
    DeleteMatch {
        id: MatchId,
    },
}

/// Match state as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub p1: Player,
    pub p2: Player,
    /// 19 rows of cell codes: 0 empty, 1 or 2 the owning player
    pub board: Vec<Vec<u8>>,
    pub history: Vec<Move>,
    pub suggestion: Option<Pos>,
    pub winner: Option<u8>,
    pub result: Option<GameResult>,
    pub current_player: Option<u8>,
}

impl MatchView {
    /// View with the whole history
    pub fn full(game: &Match) -> Self {
        Self::with_history(game, game.history())
    }

    /// View with only the last [`HISTORY_TAIL`] history entries
    pub fn truncated(game: &Match) -> Self {
        let history = game.history();
        let start = history.len().saturating_sub(HISTORY_TAIL);
        Self::with_history(game, &history[start..])
    }

    fn with_history(game: &Match, history: &[Move]) -> Self {
        let [p1, p2] = game.players().clone();
        Self {
            id: game.id(),
            p1,
            p2,
            board: game.board().to_rows(),
            history: history.to_vec(),
            suggestion: game.suggestion(),
            winner: game.winner(),
            result: game.result(),
            current_player: game.current_player().map(|p| p.id),
        }
    }
}

/// Successful response bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Match(Box<MatchView>),
    Deleted { deleted: MatchId },
}

/// One line of the line protocol
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Envelope<'a> {
    Ok {
        status: u16,
        body: &'a Reply,
    },
    Err {
        status: u16,
        error: &'static str,
        message: String,
    },
}

/// Match service: the arcade plus the engine used for suggestions and
/// engine-controlled players.
#[derive(Debug, Default)]
pub struct Service {
    arcade: Arcade,
    engine: SuggestionEngine,
}

impl Service {
    pub fn new(arcade: Arcade, engine: SuggestionEngine) -> Self {
        Self { arcade, engine }
    }

    #[inline]
    pub fn arcade(&self) -> &Arcade {
        &self.arcade
    }

    #[inline]
    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }

    /// Create a match. An engine-controlled player 1 opens right away.
    #[instrument(skip(self))]
    pub fn new_match(&self, player1_ai: bool, player2_ai: bool) -> Result<MatchView, ServiceError> {
        let (_, handle) = self.arcade.create(
            Control::from_ai_flag(player1_ai),
            Control::from_ai_flag(player2_ai),
        );
        let mut game = lock(&handle);

        if player1_ai {
            match game.play_engine_move(&self.engine) {
                Ok(mv) => debug!(id = game.id(), pos = %mv.pos, "engine opened"),
                Err(err) => error!(id = game.id(), %err, "engine opening failed"),
            }
        }
        self.settle(&mut game);
        Ok(MatchView::full(&game))
    }

    #[instrument(skip(self))]
    pub fn get_match(&self, id: MatchId) -> Result<MatchView, ServiceError> {
        let handle = self.arcade.get(id).ok_or(ServiceError::UnknownMatch(id))?;
        let game = lock(&handle);
        Ok(MatchView::truncated(&game))
    }

    /// Submit a move.
    ///
    /// Coordinates may be left out when the submitting player is
    /// engine-controlled. After a human move, an engine-controlled opponent
    /// replies at once.
    #[instrument(skip(self))]
    pub fn post_move(
        &self,
        id: MatchId,
        player_id: &PlayerIdInput,
        pos_x: Option<i32>,
        pos_y: Option<i32>,
    ) -> Result<MatchView, ServiceError> {
        let handle = self.arcade.get(id).ok_or(ServiceError::UnknownMatch(id))?;
        let player_id = player_id.parse()?;
        let mut game = lock(&handle);

        let mv = match (pos_x, pos_y) {
            (Some(x), Some(y)) => {
                game.check_turn(player_id)?;
                let pos = Pos::try_new(y, x).ok_or(GameError::OutOfBounds { row: y, col: x })?;
                game.add_move(player_id, pos)?
            }
            _ => {
                game.check_turn(player_id)?;
                if game.player(player_id).is_some_and(|p| p.is_engine()) {
                    game.play_engine_move(&self.engine)?
                } else {
                    return Err(ServiceError::MissingCoordinates(player_id));
                }
            }
        };
        debug!(id, player = mv.player, pos = %mv.pos, captured = mv.captured.len(), "move applied");

        // The move is committed: from here on nothing may fail the request
        let mover_is_human = game.player(mv.player).is_some_and(|p| !p.is_engine());
        let engine_due = game.current_player().is_some_and(|p| p.is_engine());
        let cells_left = game.board().empty_cells().next().is_some();
        if mover_is_human && engine_due && cells_left {
            match game.play_engine_move(&self.engine) {
                Ok(reply) => {
                    debug!(id, player = reply.player, pos = %reply.pos, "engine replied")
                }
                Err(err) => error!(id, %err, "engine reply failed"),
            }
        }

        self.settle(&mut game);
        Ok(MatchView::truncated(&game))
    }

    #[instrument(skip(self))]
    pub fn undo(&self, id: MatchId) -> Result<MatchView, ServiceError> {
        let handle = self.arcade.get(id).ok_or(ServiceError::UnknownMatch(id))?;
        let mut game = lock(&handle);

        let mv = game.unapply_last_move()?;
        debug!(id, player = mv.player, pos = %mv.pos, "move undone");

        self.settle(&mut game);
        Ok(MatchView::truncated(&game))
    }

    #[instrument(skip(self))]
    pub fn delete_match(&self, id: MatchId) -> Result<MatchId, ServiceError> {
        if self.arcade.remove(id) {
            Ok(id)
        } else {
            Err(ServiceError::UnknownMatch(id))
        }
    }

    /// Dispatch one request.
    pub fn handle(&self, request: Request) -> Result<Reply, ServiceError> {
        let result = match request {
            Request::NewMatch {
                player1_ai,
                player2_ai,
            } => self.new_match(player1_ai, player2_ai).map(Box::new).map(Reply::Match),
            Request::GetMatch { id } => self.get_match(id).map(Box::new).map(Reply::Match),
            Request::PostMove {
                id,
                player_id,
                pos_x,
                pos_y,
            } => self
                .post_move(id, &player_id, pos_x, pos_y)
                .map(Box::new)
                .map(Reply::Match),
            Request::Undo { id } => self.undo(id).map(Box::new).map(Reply::Match),
            Request::DeleteMatch { id } => self
                .delete_match(id)
                .map(|deleted| Reply::Deleted { deleted }),
        };

        if let Err(err) = &result {
            if err.status() >= 500 {
                error!(kind = err.kind(), %err, "request failed");
            } else {
                warn!(kind = err.kind(), %err, "request rejected");
            }
        }
        result
    }

    /// Handle one line of the line protocol and render the response line.
    pub fn handle_line(&self, line: &str) -> String {
        let result = serde_json::from_str::<Request>(line)
            .map_err(|e| ServiceError::BadRequest(e.to_string()))
            .and_then(|request| self.handle(request));

        let rendered = match &result {
            Ok(body) => serde_json::to_string(&Envelope::Ok { status: 200, body }),
            Err(err) => serde_json::to_string(&Envelope::Err {
                status: err.status(),
                error: err.kind(),
                message: err.to_string(),
            }),
        };
        rendered.unwrap_or_else(|e| encode_failure(&e.to_string()))
    }

    /// Recompute the suggestion after a committed change, which stands
    /// even if this fails.
    fn settle(&self, game: &mut Match) {
        if let Err(err) = game.refresh_suggestion(&self.engine) {
            error!(id = game.id(), %err, "suggestion refresh failed");
        }
    }
}

/// Response line for a body that could not be encoded
fn encode_failure(message: &str) -> String {
    serde_json::json!({
        "status": 500,
        "error": "encode",
        "message": message,
    })
    .to_string()
}
