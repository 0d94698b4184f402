use std::collections::HashMap;
use std::net::TcpStream;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{sleep, spawn};
use std::time::Duration;
use tungstenite::{Message, WebSocket};
use crate::board::Move;
use crate::communication_protocol::{JsonMsg, JsonMsgServer};
use crate::game::{ClickOutcome, ComputerTicket, GameMode, GameState};

#[derive(Debug)]
pub enum ChannelMsg {
    NewConnection(u32, WebSocket<TcpStream>),
    Msg(u32, JsonMsg),
    ComputerMove(u32, ComputerTicket),
    Disconnect(u32),
    ValueMonitor,
}

#[derive(Debug, PartialEq)]
pub enum Reply {
    Nothing,
    Board(Option<Move>),
}

/// Hands out connection ids, never repeating one while the server runs.
#[derive(Debug, Default)]
pub struct ClientIds {
    next: u32,
}

impl ClientIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

struct Session {
    game: GameState,
    socket: WebSocket<TcpStream>,
}

fn try_send(ws: &mut WebSocket<TcpStream>, msg: String) {
    match ws.send(Message::Text(msg)) {
        Ok(_) => log::debug!("Msg sent"),
        Err(e) => log::error!("Cannot send message, error: {}", e)
    }
}

fn send_board_update(socket: &mut WebSocket<TcpStream>, game: &GameState, last_move: Option<Move>) {
    let msg = JsonMsgServer::from_game(game, last_move);
    match serde_json::to_string(&msg) {
        Ok(msg) => try_send(socket, msg),
        Err(e) => log::error!("Cannot serialize board update: {}", e),
    }
}

/// Runs one client request against its game.
pub fn apply_client_msg(game: &mut GameState, msg: JsonMsg) -> Reply {
    match msg {
        JsonMsg::Start { mode } => {
            game.start(mode);
            Reply::Board(None)
        }
        JsonMsg::Reset => {
            game.reset();
            Reply::Board(None)
        }
        JsonMsg::Click { square } => match game.click(square) {
            ClickOutcome::Ignored => Reply::Nothing,
            ClickOutcome::Selected(_) | ClickOutcome::Deselected => Reply::Board(None),
            ClickOutcome::Moved(m) => Reply::Board(Some(m)),
        },
        JsonMsg::Ping => Reply::Nothing,
    }
}

fn schedule_computer_move(sender: &Sender<ChannelMsg>, client_id: u32, ticket: ComputerTicket, delay: Duration) {
    let sender = sender.clone();
    spawn(move || {
        sleep(delay);
        if let Err(e) = sender.send(ChannelMsg::ComputerMove(client_id, ticket)) {
            log::error!("Cannot send computer move to channel: {}", e);
        }
    });
}

/// Owns every game. All state changes happen on this thread.
pub fn handle_game(receiver: Receiver<ChannelMsg>, sender: Sender<ChannelMsg>, computer_delay: Duration) {
    let mut sessions: HashMap<u32, Session> = HashMap::new();

    loop {
        log::debug!("Waiting for message...");
        let msg = match receiver.recv() {
            Ok(m) => m,
            Err(e) => {
                log::error!("Channel closed, stopping game thread: {}", e);
                return;
            }
        };
        match msg {
            ChannelMsg::NewConnection(client_id, mut socket) => {
                if sessions.contains_key(&client_id) {
                    log::warn!("Client id {} already in use, replacing session", client_id);
                }
                let game = GameState::new(GameMode::TwoPlayer);
                send_board_update(&mut socket, &game, None);
                sessions.insert(client_id, Session { game, socket });
                log::info!("Client {} connected", client_id);
            }

            ChannelMsg::Msg(client_id, decoded) => {
                let session = match sessions.get_mut(&client_id) {
                    Some(s) => s,
                    None => {
                        log::warn!("Message from unknown client {}", client_id);
                        continue;
                    }
                };
                log::debug!("{} - {:?}", client_id, decoded);
                match apply_client_msg(&mut session.game, decoded) {
                    Reply::Nothing => {}
                    Reply::Board(last_move) => {
                        send_board_update(&mut session.socket, &session.game, last_move);
                        if last_move.is_some() {
                            if let Some(ticket) = session.game.pending_computer_move() {
                                schedule_computer_move(&sender, client_id, ticket, computer_delay);
                            }
                        }
                    }
                }
            }

            ChannelMsg::ComputerMove(client_id, ticket) => {
                let session = match sessions.get_mut(&client_id) {
                    Some(s) => s,
                    None => {
                        log::debug!("Computer move for gone client {}", client_id);
                        continue;
                    }
                };
                match session.game.play_computer_move(ticket, &mut rand::thread_rng()) {
                    None => log::debug!("Computer move skipped for {}", client_id),
                    Some(m) => send_board_update(&mut session.socket, &session.game, Some(m)),
                }
            }

            ChannelMsg::Disconnect(client_id) => {
                log::info!("Removing client {}", client_id);
                sessions.remove(&client_id);
            }

            ChannelMsg::ValueMonitor => {
                log::info!("Sessions: {}", sessions.len());
                for (client_id, session) in &sessions {
                    log::info!("({} - {:?}, over: {})", client_id, session.game.mode, session.game.is_over);
                }
            }
        }
    }
}
