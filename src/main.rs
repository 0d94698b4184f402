use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{current, sleep, spawn};
use std::time::Duration;

use clap::Parser;
use tungstenite::{accept, Message, WebSocket};
use tungstenite::protocol::Role;

use casual_chess::communication_protocol::JsonMsg;
use casual_chess::config::Config;
use casual_chess::game_server::{self, ChannelMsg, ClientIds};

fn thread_game_monitor(sender: Sender<ChannelMsg>, interval: Duration) {
    loop {
        if sender.send(ChannelMsg::ValueMonitor).is_err() {
            log::error!("Game thread is gone, stopping monitor");
            return;
        }
        sleep(interval);
    }
}

fn read_client(mut websocket: WebSocket<TcpStream>, client_id: u32, sender: Sender<ChannelMsg>) {
    let thread_id = current().id();
    log::debug!("New client {}", client_id);
    loop {
        let msg = match websocket.read() {
            Ok(m) => m,
            Err(e) => {
                log::error!("Cannot read websocket, error: {}", e);
                break;
            }
        };

        log::debug!("{:?} - Received: {:?}", thread_id, msg);
        match msg {
            Message::Text(m) => {
                match serde_json::from_str::<JsonMsg>(&m) {
                    Ok(decoded) => {
                        if sender.send(ChannelMsg::Msg(client_id, decoded)).is_err() {
                            log::error!("Cannot send msg to channel");
                            return;
                        }
                    }
                    Err(e) => log::warn!("Cannot decode {:?}: {}", m, e),
                }
            }
            Message::Close(_) => {
                log::debug!("Closing websocket");
                break;
            }
            _ => log::debug!("Non text msg ignored"),
        };
    }
    if let Err(e) = sender.send(ChannelMsg::Disconnect(client_id)) {
        log::error!("Cannot send disconnect to channel: {}", e);
    }
}

fn main() -> std::io::Result<()> {
    let config = Config::parse();
    let logger_env = env_logger::Env::default().filter_or("LOG_LEVEL", config.log_level.as_str());
    env_logger::Builder::from_env(logger_env).format_timestamp_millis().init();
    log::info!("Starting with {:?}", config);

    let (sender_origin, receiver): (Sender<ChannelMsg>, Receiver<ChannelMsg>) = channel();

    let monitor_sender = sender_origin.clone();
    let interval = config.monitor_interval();
    spawn(move || thread_game_monitor(monitor_sender, interval));
    let game_sender = sender_origin.clone();
    let delay = config.computer_delay();
    spawn(move || game_server::handle_game(receiver, game_sender, delay));

    let mut client_ids = ClientIds::default();
    let server = TcpListener::bind(&config.address)?;
    log::info!("Listening on {}", config.address);
    for stream in server.incoming() {
        let tcp_stream = match stream {
            Ok(s) => s,
            Err(e) => {
                log::error!("Cannot use tcp stream: {}", e);
                continue;
            }
        };
        let tcp_stream_clone = match tcp_stream.try_clone() {
            Ok(s) => s,
            Err(e) => {
                log::error!("Cannot clone tcp stream: {}", e);
                continue;
            }
        };
        let websocket = match accept(tcp_stream) {
            Ok(w) => w,
            Err(e) => {
                log::error!("Cannot create websocket: {}", e);
                continue
            }
        };
        let writer = WebSocket::from_raw_socket(tcp_stream_clone, Role::Server, Some(websocket.get_config().clone()));
        let client_id = client_ids.next_id();

        if sender_origin.send(ChannelMsg::NewConnection(client_id, writer)).is_err() {
            log::error!("Game thread is gone, shutting down");
            break;
        }
        let sender = sender_origin.clone();
        spawn(move || read_client(websocket, client_id, sender));
    }
    Ok(())
}
