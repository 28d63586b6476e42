use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Color, Piece};
use crate::players::PlayerError;

pub mod board;
pub mod config;
pub mod coord;
pub mod game;
pub mod moves;
pub mod piece;
pub mod players;
pub mod render;

/// What a player decided to do with their turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Move `piece` along `mv`, one of the moves it enumerated
    Play { piece: Piece, mv: Move },
    /// Leave the game
    Quit,
}

/// Trait for choosing moves for one side.
///
/// Abstracts over console input, the computer player and scripted
/// inputs, so the game loop never deals with I/O itself.
pub trait Player {
    /// Side this player moves for.
    fn color(&self) -> Color;

    /// Pick a move for the current position.
    ///
    /// Only reads the board; the game loop commits the returned move.
    fn select_move(&mut self, board: &Board) -> Result<Turn, PlayerError>;
}
