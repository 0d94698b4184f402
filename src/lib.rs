pub mod board;
pub mod moves;
pub mod computer;
pub mod game;
pub mod communication_protocol;
pub mod game_server;
pub mod config;
