use std::fmt;
use std::ops::ControlFlow;

use log::{debug, info, warn};
use thiserror::Error;

use crate::board::{Board, BoardError};
use crate::piece::Color;
use crate::players::PlayerError;
use crate::{Player, Turn};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The other side has no piece that can move
    Winner(Color),
    /// Neither side can move
    Stalemate,
    /// A player left the game
    Quit(Color),
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Winner(color) => {
                write!(f, "Congratulations, {color}, you have won the game gloriously!")
            }
            GameOutcome::Stalemate => write!(f, "The game was a stalemate..."),
            GameOutcome::Quit(color) => write!(f, "{color} left the game."),
        }
    }
}

/// Errors that stop the game loop.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Board(#[from] BoardError),

    /// A player tried to move a piece of the other side
    #[error("{player} cannot move a {piece} piece")]
    WrongColor { player: Color, piece: Color },

    /// A player returned a move its piece never offered
    #[error("{0} is not a legal move")]
    IllegalMove(String),
}

/// A player was seated on the side it does not play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a {player} player cannot take the {seat} seat")]
pub struct SeatError {
    pub seat: Color,
    pub player: Color,
}

/// Checks whether the game is over.
///
/// Counts, per color, the pieces that have at least one legal move. The
/// game ends when either count is zero.
pub fn outcome(board: &Board) -> Option<GameOutcome> {
    let mut movable = [0usize; 2];
    for index in 0..board.size() * board.size() {
        let Ok(Some(piece)) = board.get_index(index) else {
            continue;
        };
        if piece.possible_moves(board).is_some() {
            movable[side(piece.color())] += 1;
        }
    }

    match movable {
        [0, 0] => Some(GameOutcome::Stalemate),
        [0, _] => Some(GameOutcome::Winner(Color::Black)),
        [_, 0] => Some(GameOutcome::Winner(Color::White)),
        _ => None,
    }
}

#[inline]
fn side(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

/// A game between two players, white moving first.
pub struct Game {
    board: Board,
    players: [Box<dyn Player>; 2],
    to_move: Color,
    turns: usize,
}

impl Game {
    /// Seats `white` and `black`; each must play the color its seat names.
    pub fn new(
        board: Board,
        white: Box<dyn Player>,
        black: Box<dyn Player>,
    ) -> Result<Self, SeatError> {
        for (seat, player) in [(Color::White, &white), (Color::Black, &black)] {
            if player.color() != seat {
                warn!("{} player offered for the {seat} seat", player.color());
                return Err(SeatError {
                    seat,
                    player: player.color(),
                });
            }
        }
        Ok(Self {
            board,
            players: [white, black],
            to_move: Color::White,
            turns: 0,
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Number of moves committed so far.
    #[inline]
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Plays one turn, or reports that the game is over.
    pub fn step(&mut self) -> Result<ControlFlow<GameOutcome>, GameError> {
        if let Some(outcome) = outcome(&self.board) {
            return Ok(ControlFlow::Break(outcome));
        }

        let color = self.to_move;
        let (piece, mv) = match self.players[side(color)].select_move(&self.board)? {
            Turn::Play { piece, mv } => (piece, mv),
            Turn::Quit => return Ok(ControlFlow::Break(GameOutcome::Quit(color))),
        };

        if piece.color() != color {
            return Err(GameError::WrongColor {
                player: color,
                piece: piece.color(),
            });
        }
        let offered = piece
            .possible_moves(&self.board)
            .is_some_and(|moves| moves.contains(&mv));
        if !offered {
            return Err(GameError::IllegalMove(mv.to_string()));
        }

        let applied = self.board.apply_move(&mv, &piece)?;
        debug!(
            "turn {}: {} played {} ({} captured)",
            self.turns + 1,
            color,
            mv,
            applied.captured.len()
        );

        self.turns += 1;
        self.to_move = color.opposite();
        Ok(ControlFlow::Continue(()))
    }

    /// Plays until one side wins, neither can move, or a player quits.
    pub fn run(&mut self) -> Result<GameOutcome, GameError> {
        info!("starting game on a {0}x{0} board", self.board.size());
        loop {
            if let ControlFlow::Break(outcome) = self.step()? {
                info!("game over after {} turns: {:?}", self.turns, outcome);
                return Ok(outcome);
            }
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("to_move", &self.to_move)
            .field("turns", &self.turns)
            .finish_non_exhaustive()
    }
}
