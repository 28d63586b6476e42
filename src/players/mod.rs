use std::io;

use thiserror::Error;

use crate::board::BoardError;
use crate::coord::Coord;
use crate::piece::Color;
use crate::render::RenderError;

mod console;
mod random;
mod script;

pub use console::{ConsolePlayer, StdinLines};
pub use random::{RandomPlayer, all_moves};
pub use script::{ScriptError, ScriptedPlayer};

/// Error when a player cannot produce a turn.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to talk to the player: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Board(#[from] BoardError),

    /// Console input reached end of file mid-turn
    #[error("input closed before a move was chosen")]
    InputClosed,

    #[error("no scripted turns left for {0}")]
    ScriptExhausted(Color),

    #[error("{color} has no move from {from} to {to}")]
    NoSuchMove { color: Color, from: Coord, to: Coord },
}
