use std::fmt;
use std::rc::Rc;

use crate::board::{Board, BoardError};
use crate::coord::Coord;
use crate::piece::Piece;

/// One diagonal step of a piece, optionally continuing an earlier jump.
///
/// A capture sequence taken in a single turn is a linked list of jump
/// steps: the most recent step points back at the one before it. Simple
/// (non-jump) moves never have a predecessor. A `Move` holds no pieces;
/// which pieces a jump captures is looked up on the board when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    start: Coord,
    end: Coord,
    is_jump: bool,
    preceding: Option<Rc<Move>>,
}

impl Move {
    /// A single non-capturing step.
    #[inline]
    pub fn step(start: Coord, end: Coord) -> Self {
        Self {
            start,
            end,
            is_jump: false,
            preceding: None,
        }
    }

    /// A capturing step, continuing `preceding` if this is not the first
    /// jump of the turn.
    ///
    /// # Panics
    /// If `preceding` is not itself a jump.
    pub fn jump(start: Coord, end: Coord, preceding: Option<Rc<Move>>) -> Self {
        if let Some(prev) = &preceding {
            assert!(prev.is_jump, "jump chain cannot continue from simple move {prev}");
        }
        Self {
            start,
            end,
            is_jump: true,
            preceding,
        }
    }

    #[inline]
    pub fn start(&self) -> Coord {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Coord {
        self.end
    }

    #[inline]
    pub fn is_jump(&self) -> bool {
        self.is_jump
    }

    /// The jump this one continues from, if any.
    #[inline]
    pub fn preceding(&self) -> Option<&Move> {
        self.preceding.as_deref()
    }

    /// This step followed by every earlier step of the chain, most recent first.
    pub fn links(&self) -> impl Iterator<Item = &Move> {
        std::iter::successors(Some(self), |mv| mv.preceding())
    }

    /// Number of steps in the chain, 1 for a simple move.
    pub fn chain_len(&self) -> usize {
        self.links().count()
    }

    /// Where the moving piece stood before the first step of the chain.
    pub fn origin(&self) -> Coord {
        self.links().last().map_or(self.start, Move::start)
    }

    /// Every square the piece touches, from origin to final landing square.
    pub fn path(&self) -> Vec<Coord> {
        let mut path: Vec<Coord> = self.links().map(Move::end).collect();
        path.push(self.origin());
        path.reverse();
        path
    }

    /// Squares of the pieces captured along the whole chain.
    pub fn captured_squares(&self) -> Vec<Coord> {
        if !self.is_jump {
            return Vec::new();
        }
        self.links()
            .inspect(|link| assert!(link.is_jump, "capture chain reaches simple move {link}"))
            .map(|link| link.start.midpoint(link.end))
            .collect()
    }

    /// Find the pieces captured by this move's full chain.
    ///
    /// Looks at each jump's midpoint on `board` as it stands before the move
    /// is applied. Each piece is reported once even if the chain passes
    /// over it again. Empty for a simple move.
    pub fn jumped_pieces(&self, board: &Board) -> Result<Vec<Piece>, BoardError> {
        let mut pieces = Vec::with_capacity(self.chain_len());
        self.collect_jumped(board, &mut pieces)?;
        Ok(pieces)
    }

    fn collect_jumped(&self, board: &Board, pieces: &mut Vec<Piece>) -> Result<(), BoardError> {
        if !self.is_jump {
            return Ok(());
        }

        let square = self.start.midpoint(self.end);
        let piece = board.at(square)?.ok_or(BoardError::NothingJumped(square))?;
        if !pieces.iter().any(|p| p.id() == piece.id()) {
            pieces.push(*piece);
        }

        if let Some(prev) = &self.preceding {
            // Broken topology means enumeration itself is wrong.
            assert!(prev.is_jump, "capture chain reaches simple move {prev}");
            prev.collect_jumped(board, pieces)?;
        }
        Ok(())
    }
}

/// Display the full path, e.g. "C3-D4" or "C3xE5xG7".
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.is_jump { "x" } else { "-" };
        for (i, square) in self.path().iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{square}")?;
        }
        Ok(())
    }
}
