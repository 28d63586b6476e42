use clap::ValueEnum;
use thiserror::Error;

use crate::board::Board;
use crate::game::{Game, SeatError};
use crate::piece::Color;
use crate::players::{ConsolePlayer, RandomPlayer};
use crate::Player;

/// Who plays black. White is always a person at the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Against the computer (experimental)
    #[value(name = "one")]
    OnePlayer,
    /// Two people sharing the console
    #[default]
    #[value(name = "two")]
    TwoPlayer,
}

/// Error for settings that cannot produce a playable game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size {size} is too small, need at least {min}")]
    BoardTooSmall { size: usize, min: usize },

    /// Columns are named by single letters
    #[error("board size {size} is too large, at most {max} columns have letters")]
    BoardTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Seat(#[from] SeatError),
}

/// Settings for a console game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Side length of the square board
    pub size: usize,
    pub mode: Mode,
    /// Seed for the computer player; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            mode: Mode::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub const DEFAULT_SIZE: usize = 8;

    /// Smallest board on which the two starting camps do not overlap.
    pub const MIN_SIZE: usize = 6;

    /// One column per letter `A` to `Z`.
    pub const MAX_SIZE: usize = 26;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < Self::MIN_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.size,
                min: Self::MIN_SIZE,
            });
        }
        if self.size > Self::MAX_SIZE {
            return Err(ConfigError::BoardTooLarge {
                size: self.size,
                max: Self::MAX_SIZE,
            });
        }
        Ok(())
    }

    /// Player for black according to `mode`.
    fn opponent(&self) -> Box<dyn Player> {
        match (self.mode, self.seed) {
            (Mode::TwoPlayer, _) => Box::new(ConsolePlayer::stdio(Color::Black)),
            (Mode::OnePlayer, Some(seed)) => Box::new(RandomPlayer::seeded(Color::Black, seed)),
            (Mode::OnePlayer, None) => Box::new(RandomPlayer::new(Color::Black)),
        }
    }

    /// Builds a console game on a fresh board.
    pub fn into_game(self) -> Result<Game, ConfigError> {
        self.validate()?;
        let white = Box::new(ConsolePlayer::stdio(Color::White));
        Ok(Game::new(Board::new(self.size), white, self.opponent())?)
    }
}
