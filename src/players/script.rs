use std::collections::VecDeque;

use log::debug;
use thiserror::Error;

use super::PlayerError;
use crate::board::Board;
use crate::coord::{Coord, CoordParseError};
use crate::piece::Color;
use crate::{Player, Turn};

/// Error when parsing a move script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("invalid square '{token}': {source}")]
    Square {
        token: String,
        source: CoordParseError,
    },

    /// Each turn names exactly a start and an end square
    #[error("turn '{0}' must name two squares")]
    WrongArity(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptedTurn {
    Play { from: Coord, to: Coord },
    Quit,
}

/// A player that replays turns from a script.
///
/// Keeps a queue of pending turns; more script can be appended at any
/// time. Used for tests and demos.
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    color: Color,
    pending: VecDeque<ScriptedTurn>,
}

impl ScriptedPlayer {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            pending: VecDeque::new(),
        }
    }

    /// Create with a script already queued.
    pub fn with_script(color: Color, script: &str) -> Result<Self, ScriptError> {
        let mut player = Self::new(color);
        player.push_script(script)?;
        Ok(player)
    }

    /// Parse and queue additional turns.
    ///
    /// Format:
    /// - Squares are a letter and a row number in either order (e.g., "c3", "b10", "3c")
    /// - A turn is the piece's square followed by the landing square
    /// - Periods (".") end a turn
    /// - `exit` as a turn leaves the game
    ///
    /// Examples:
    /// - `"c3d4."` - Move the piece on c3 to d4
    /// - `"c3 e5. exit."` - Jump from c3 to e5, then quit on the next turn
    ///
    /// Nothing is queued if any part of the script is invalid.
    pub fn push_script(&mut self, script: &str) -> Result<(), ScriptError> {
        let turns = parse_script(script)?;
        self.pending.extend(turns);
        Ok(())
    }

    /// Number of turns still queued.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Player for ScriptedPlayer {
    fn color(&self) -> Color {
        self.color
    }

    /// Plays the next queued turn.
    ///
    /// When several capture chains end on the requested square, the one
    /// taking the most pieces wins.
    fn select_move(&mut self, board: &Board) -> Result<Turn, PlayerError> {
        let (from, to) = match self.pending.pop_front() {
            Some(ScriptedTurn::Play { from, to }) => (from, to),
            Some(ScriptedTurn::Quit) => return Ok(Turn::Quit),
            None => return Err(PlayerError::ScriptExhausted(self.color)),
        };
        let no_such_move = PlayerError::NoSuchMove {
            color: self.color,
            from,
            to,
        };

        let piece = match board.at(from)? {
            Some(piece) if piece.color() == self.color => *piece,
            _ => return Err(no_such_move),
        };

        let mv = piece
            .possible_moves(board)
            .unwrap_or_default()
            .into_iter()
            .filter(|mv| mv.end() == to)
            .min_by_key(|mv| std::cmp::Reverse(mv.chain_len()))
            .ok_or(no_such_move)?;

        debug!("{} scripted {}", self.color, mv);
        Ok(Turn::Play { piece, mv })
    }
}

/// Parse a script into turns.
fn parse_script(script: &str) -> Result<Vec<ScriptedTurn>, ScriptError> {
    script
        .split('.')
        .map(str::trim)
        .filter(|turn| !turn.is_empty())
        .map(parse_turn)
        .collect()
}

fn parse_turn(turn: &str) -> Result<ScriptedTurn, ScriptError> {
    if turn.eq_ignore_ascii_case("exit") {
        return Ok(ScriptedTurn::Quit);
    }

    let squares = split_squares(turn)?;
    match squares[..] {
        [from, to] => Ok(ScriptedTurn::Play { from, to }),
        _ => Err(ScriptError::WrongArity(turn.to_string())),
    }
}

/// Split a turn into squares. A square ends once it holds both a letter
/// and a number and the next character switches between the two, so
/// "c3d4", "c3 d4" and "3c4d" read the same.
fn split_squares(turn: &str) -> Result<Vec<Coord>, ScriptError> {
    let mut squares = Vec::new();
    let mut current_token = String::new();

    for ch in turn.chars() {
        if ch.is_whitespace() {
            flush_token(&mut current_token, &mut squares)?;
            continue;
        }
        if is_complete(&current_token)
            && current_token
                .chars()
                .last()
                .is_some_and(|last| last.is_ascii_digit() != ch.is_ascii_digit())
        {
            flush_token(&mut current_token, &mut squares)?;
        }
        current_token.push(ch);
    }

    flush_token(&mut current_token, &mut squares)?;
    Ok(squares)
}

fn is_complete(token: &str) -> bool {
    token.chars().any(|ch| ch.is_ascii_digit()) && token.chars().any(|ch| !ch.is_ascii_digit())
}

/// Add current token to the squares and clear it.
fn flush_token(token: &mut String, squares: &mut Vec<Coord>) -> Result<(), ScriptError> {
    if !token.is_empty() {
        let square = token.parse().map_err(|source| ScriptError::Square {
            token: token.clone(),
            source,
        })?;
        squares.push(square);
        token.clear();
    }
    Ok(())
}
