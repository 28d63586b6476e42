use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::PlayerError;
use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Color, Piece};
use crate::{Player, Turn};

/// Experimental computer player.
///
/// Picks uniformly among every move its pieces can make. There is no
/// evaluation of the resulting position.
#[derive(Debug, Clone)]
pub struct RandomPlayer<R = StdRng> {
    color: Color,
    rng: R,
}

impl RandomPlayer<StdRng> {
    /// Seeded from the operating system.
    pub fn new(color: Color) -> Self {
        Self::with_rng(color, StdRng::from_entropy())
    }

    /// Reproducible choices for a given seed.
    pub fn seeded(color: Color, seed: u64) -> Self {
        Self::with_rng(color, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomPlayer<R> {
    pub fn with_rng(color: Color, rng: R) -> Self {
        Self { color, rng }
    }
}

/// Every move of every piece of `color`, paired with the piece making it.
pub fn all_moves(board: &Board, color: Color) -> Vec<(Piece, Move)> {
    board
        .pieces()
        .filter(|piece| piece.color() == color)
        .filter_map(|piece| {
            let moves = piece.possible_moves(board)?;
            Some(moves.into_iter().map(move |mv| (*piece, mv)))
        })
        .flatten()
        .collect()
}

impl<R: Rng> Player for RandomPlayer<R> {
    fn color(&self) -> Color {
        self.color
    }

    fn select_move(&mut self, board: &Board) -> Result<Turn, PlayerError> {
        let candidates = all_moves(board, self.color);
        let Some((piece, mv)) = candidates.choose(&mut self.rng).cloned() else {
            warn!("{} has no moves to choose from", self.color);
            return Ok(Turn::Quit);
        };

        debug!("{} picked {} of {} moves", self.color, mv, candidates.len());
        Ok(Turn::Play { piece, mv })
    }
}
