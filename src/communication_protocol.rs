use std::collections::HashSet;
use crate::board::{Color, Move, Square};
use crate::game::{GameMode, GameState};

#[derive(Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "msg_type")]
pub enum JsonMsg {
    Start { mode: GameMode },
    Reset,
    Click { square: Square },
    Ping,
}

#[derive(Debug, PartialEq, serde::Serialize)]
pub enum MsgTypeServer {
    Board,
    GameOver,
}

#[derive(Debug, serde::Serialize)]
pub struct JsonMsgServer {
    pub msg_type: MsgTypeServer,
    pub board: String,
    pub mode: GameMode,
    pub active_color: Color,
    pub selected: Option<Square>,
    pub possible_moves: HashSet<Square>,
    pub last_move: Option<Move>,
    pub result: Option<String>,
}

impl JsonMsgServer {
    pub fn from_game(game: &GameState, last_move: Option<Move>) -> Self {
        JsonMsgServer {
            msg_type: if game.is_over { MsgTypeServer::GameOver } else { MsgTypeServer::Board },
            board: crate::board::to_string(&game.board),
            mode: game.mode,
            active_color: game.active_color,
            selected: game.selected,
            possible_moves: game.possible_moves(),
            last_move,
            result: game.result_text(),
        }
    }
}
