use log::debug;
use thiserror::Error;

use crate::coord::Coord;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceId};

/// Rows each side fills at the start of a game.
const STARTING_ROWS: usize = 3;

/// Error types for board access and move application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("({x}, {y}) is off the {size}x{size} board")]
    OutOfBounds { x: i32, y: i32, size: usize },

    #[error("index {index} is off the {size}x{size} board")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Pieces only ever stand on dark squares
    #[error("{0} is a light square")]
    LightSquare(Coord),

    #[error("{0} is already occupied")]
    Occupied(Coord),

    /// The piece handed to `apply_move` is not the one on its recorded square
    #[error("piece {id:?} is not on {at}")]
    PieceMismatch { id: PieceId, at: Coord },

    /// A jump whose midpoint is empty, i.e. a move from a stale enumeration
    #[error("no piece to capture on {0}")]
    NothingJumped(Coord),
}

/// Summary of a committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// The moved piece as it now stands
    pub piece: Piece,
    /// Pieces removed from the board
    pub captured: Vec<Piece>,
    /// Whether this move crowned the piece
    pub promoted: bool,
}

/// Square grid of optional pieces.
///
/// Squares are addressed either by `(x, y)` or by the linear index
/// `y * size + x`, with index 0 in the top-left corner as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    squares: Vec<Option<Piece>>,
    next_id: u32,
}

impl Board {
    /// Creates a board in the opening position: white on the dark squares
    /// of the first three rows, black on those of the last three.
    pub fn new(size: usize) -> Self {
        let mut board = Self::empty(size);
        let black_from = size.saturating_sub(STARTING_ROWS);

        for y in 0..size {
            for x in 0..size {
                let coord = Coord::new(x as i32, y as i32);
                if !coord.is_dark() {
                    continue;
                }
                if y < STARTING_ROWS {
                    board.spawn(coord, Color::White);
                } else if y >= black_from {
                    board.spawn(coord, Color::Black);
                }
            }
        }
        board
    }

    /// Creates a board with no pieces, for setting up custom positions.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            squares: vec![None; size * size],
            next_id: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Puts a new man on an empty dark square.
    pub fn place(&mut self, x: i32, y: i32, color: Color) -> Result<PieceId, BoardError> {
        let coord = Coord::new(x, y);
        if !coord.is_dark() {
            return Err(BoardError::LightSquare(coord));
        }
        if self.at(coord)?.is_some() {
            return Err(BoardError::Occupied(coord));
        }
        Ok(self.spawn(coord, color))
    }

    /// Puts a new king on an empty dark square.
    pub fn place_king(&mut self, x: i32, y: i32, color: Color) -> Result<PieceId, BoardError> {
        let id = self.place(x, y, color)?;
        let slot = self.slot(Coord::new(x, y))?;
        if let Some(piece) = self.squares[slot].as_mut() {
            piece.crown();
        }
        Ok(id)
    }

    fn spawn(&mut self, coord: Coord, color: Color) -> PieceId {
        let id = PieceId::new(self.next_id);
        self.next_id += 1;
        let slot = coord.y as usize * self.size + coord.x as usize;
        self.squares[slot] = Some(Piece::new(id, color, coord));
        id
    }

    /// Get the piece at `(x, y)`, if any.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Result<Option<&Piece>, BoardError> {
        let slot = self.to_index(x, y)?;
        Ok(self.squares[slot].as_ref())
    }

    /// Get the piece at a coordinate, if any.
    #[inline]
    pub fn at(&self, coord: Coord) -> Result<Option<&Piece>, BoardError> {
        self.get(coord.x, coord.y)
    }

    /// Get the piece at a linear index, if any.
    #[inline]
    pub fn get_index(&self, index: usize) -> Result<Option<&Piece>, BoardError> {
        if self.is_index_out_of_bounds(index) {
            return Err(BoardError::IndexOutOfBounds {
                index,
                size: self.size,
            });
        }
        Ok(self.squares[index].as_ref())
    }

    /// True when either coordinate lies outside `[0, size)`.
    #[inline]
    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        let size = self.size as i64;
        !(0..size).contains(&(x as i64)) || !(0..size).contains(&(y as i64))
    }

    #[inline]
    pub fn is_index_out_of_bounds(&self, index: usize) -> bool {
        index >= self.squares.len()
    }

    #[inline]
    pub fn is_dark_square(&self, x: i32, y: i32) -> bool {
        Coord::new(x, y).is_dark()
    }

    /// True for an on-board square with nobody on it.
    #[inline]
    pub fn is_vacant(&self, coord: Coord) -> bool {
        matches!(self.at(coord), Ok(None))
    }

    /// Converts `(x, y)` to its linear index.
    #[inline]
    pub fn to_index(&self, x: i32, y: i32) -> Result<usize, BoardError> {
        if self.is_out_of_bounds(x, y) {
            return Err(BoardError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        Ok(y as usize * self.size + x as usize)
    }

    /// Converts a linear index back to `(x, y)`; x varies fastest.
    #[inline]
    pub fn from_index(&self, index: usize) -> Result<Coord, BoardError> {
        if self.is_index_out_of_bounds(index) {
            return Err(BoardError::IndexOutOfBounds {
                index,
                size: self.size,
            });
        }
        Ok(Coord::new(
            (index % self.size) as i32,
            (index / self.size) as i32,
        ))
    }

    #[inline]
    fn slot(&self, coord: Coord) -> Result<usize, BoardError> {
        self.to_index(coord.x, coord.y)
    }

    /// All pieces on the board, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten()
    }

    /// Number of pieces of one color.
    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|piece| piece.color() == color).count()
    }

    /// Commits `mv` for `piece`, the only way the board changes.
    ///
    /// Captures are resolved against the board before anything moves. The
    /// piece leaves the square it has recorded, which for a multi-jump is
    /// not the start of the last link. It is crowned if it lands on its far
    /// rank. On error the board is left untouched.
    pub fn apply_move(&mut self, mv: &Move, piece: &Piece) -> Result<AppliedMove, BoardError> {
        let from = piece.coord();
        let from_slot = self.slot(from)?;
        let to = mv.end();
        let to_slot = self.slot(to)?;

        match &self.squares[from_slot] {
            Some(occupant) if occupant.id() == piece.id() => {}
            _ => {
                return Err(BoardError::PieceMismatch {
                    id: piece.id(),
                    at: from,
                });
            }
        }
        if to != from && self.squares[to_slot].is_some() {
            return Err(BoardError::Occupied(to));
        }

        let captured = mv.jumped_pieces(self)?;
        for jumped in &captured {
            let slot = self.slot(jumped.coord())?;
            self.squares[slot] = None;
        }

        let mut moving = self.squares[from_slot]
            .take()
            .ok_or(BoardError::PieceMismatch {
                id: piece.id(),
                at: from,
            })?;
        moving.move_to(to);

        let promoted = !moving.is_king() && moving.should_be_king(self.size);
        if promoted {
            moving.crown();
        }

        self.squares[to_slot] = Some(moving);

        debug!(
            "{} applied: {} captured{}",
            mv,
            captured.len(),
            if promoted { ", crowned" } else { "" }
        );

        Ok(AppliedMove {
            piece: moving,
            captured,
            promoted,
        })
    }

    /// A new board rotated half a turn, so each side sees the other's view.
    ///
    /// Built square by square into fresh storage; the original is not
    /// shared or modified.
    pub fn flipped(&self) -> Board {
        let last = self.size as i32 - 1;
        let mut flipped = Board {
            size: self.size,
            squares: vec![None; self.squares.len()],
            next_id: self.next_id,
        };

        for piece in self.pieces() {
            let coord = piece.coord();
            let mirrored = Coord::new(last - coord.x, last - coord.y);
            let mut copy = *piece;
            copy.move_to(mirrored);
            let slot = mirrored.y as usize * self.size + mirrored.x as usize;
            flipped.squares[slot] = Some(copy);
        }
        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use test_case::test_case;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    /// Every stored piece records the square it sits on, and it is dark.
    fn assert_consistent(board: &Board) {
        for index in 0..board.size() * board.size() {
            if let Some(piece) = board.get_index(index).unwrap() {
                let coord = board.from_index(index).unwrap();
                assert_eq!(piece.coord(), coord, "piece {:?} misplaced", piece.id());
                assert!(coord.is_dark(), "piece on light square {coord}");
            }
        }
    }

    #[test_case(8, 12; "standard")]
    #[test_case(9, 14; "nine by nine")]
    #[test_case(10, 15; "ten by ten")]
    fn test_opening_position(size: usize, per_side: usize) {
        let board = Board::new(size);

        assert_eq!(board.count(Color::White), per_side);
        assert_eq!(board.count(Color::Black), per_side);
        assert_consistent(&board);
        assert!(board.pieces().all(|p| !p.is_king()));
    }

    #[test]
    fn test_opening_rows() {
        let board = Board::new(8);

        assert_eq!(board.get(0, 0).unwrap().map(Piece::color), Some(Color::White));
        assert_eq!(board.get(2, 2).unwrap().map(Piece::color), Some(Color::White));
        assert_eq!(board.get(1, 5).unwrap().map(Piece::color), Some(Color::Black));
        assert_eq!(board.get(7, 7).unwrap().map(Piece::color), Some(Color::Black));
        assert_eq!(board.get(1, 0).unwrap(), None);
        assert_eq!(board.get(3, 3).unwrap(), None);
        assert_eq!(board.get(4, 4).unwrap(), None);
    }

    #[test]
    fn test_piece_ids_are_unique() {
        let board = Board::new(8);
        let mut ids: Vec<PieceId> = board.pieces().map(Piece::id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 24);
    }

    #[test_case(-1, 0; "left")]
    #[test_case(0, -1; "top")]
    #[test_case(8, 0; "right")]
    #[test_case(0, 8; "bottom")]
    #[test_case(i32::MIN, i32::MAX; "extremes")]
    fn test_out_of_bounds(x: i32, y: i32) {
        let board = Board::new(8);
        assert!(board.is_out_of_bounds(x, y));
        assert_eq!(
            board.get(x, y),
            Err(BoardError::OutOfBounds { x, y, size: 8 })
        );
    }

    #[test]
    fn test_index_out_of_bounds() {
        let board = Board::new(8);
        assert!(!board.is_index_out_of_bounds(63));
        assert!(board.is_index_out_of_bounds(64));
        assert_eq!(
            board.get_index(64),
            Err(BoardError::IndexOutOfBounds { index: 64, size: 8 })
        );
        assert!(board.from_index(64).is_err());
    }

    #[test]
    fn test_index_conversion_is_inverse() {
        let board = Board::new(9);
        for y in 0..9 {
            for x in 0..9 {
                let index = board.to_index(x, y).unwrap();
                assert_eq!(board.from_index(index), Ok(c(x, y)));
                assert_eq!(board.get_index(index), board.get(x, y));
            }
        }
        for index in 0..81 {
            let coord = board.from_index(index).unwrap();
            assert_eq!(board.to_index(coord.x, coord.y), Ok(index));
        }
    }

    #[test]
    fn test_index_is_row_major() {
        let board = Board::new(8);
        assert_eq!(board.to_index(3, 0), Ok(3));
        assert_eq!(board.to_index(0, 1), Ok(8));
        assert_eq!(board.from_index(10), Ok(c(2, 1)));
    }

    #[test]
    fn test_place_rejects_light_and_occupied() {
        let mut board = Board::empty(8);
        assert_eq!(
            board.place(1, 0, Color::White),
            Err(BoardError::LightSquare(c(1, 0)))
        );
        board.place(1, 1, Color::White).unwrap();
        assert_eq!(
            board.place(1, 1, Color::Black),
            Err(BoardError::Occupied(c(1, 1)))
        );
        assert!(board.place(9, 9, Color::Black).is_err());
    }

    #[test]
    fn test_apply_simple_move() {
        let mut board = Board::new(8);
        let piece = *board.get(2, 2).unwrap().unwrap();
        let mv = Move::step(c(2, 2), c(3, 3));

        let applied = board.apply_move(&mv, &piece).unwrap();

        assert_eq!(applied.piece.id(), piece.id());
        assert_eq!(applied.piece.coord(), c(3, 3));
        assert!(applied.captured.is_empty());
        assert!(!applied.promoted);
        assert_eq!(board.get(2, 2).unwrap(), None);
        assert_eq!(board.get(3, 3).unwrap().map(Piece::id), Some(piece.id()));
        assert_consistent(&board);
    }

    #[test]
    fn test_apply_double_jump() {
        let mut board = Board::empty(8);
        board.place(2, 2, Color::White).unwrap();
        board.place(3, 3, Color::Black).unwrap();
        board.place(5, 5, Color::Black).unwrap();
        let piece = *board.get(2, 2).unwrap().unwrap();

        let chain = piece
            .possible_moves(&board)
            .unwrap()
            .into_iter()
            .find(|mv| mv.end() == c(6, 6))
            .unwrap();
        let applied = board.apply_move(&chain, &piece).unwrap();

        assert_eq!(applied.captured.len(), 2);
        assert_eq!(board.count(Color::Black), 0);
        for square in [c(2, 2), c(3, 3), c(4, 4), c(5, 5)] {
            assert_eq!(board.at(square).unwrap(), None, "{square} should be empty");
        }
        assert_eq!(board.get(6, 6).unwrap().map(Piece::id), Some(piece.id()));
        assert_consistent(&board);
    }

    #[test]
    fn test_apply_uses_recorded_position() {
        // The last link starts at (4,4), but the piece stands on (2,2).
        let mut board = Board::empty(8);
        board.place(2, 2, Color::White).unwrap();
        board.place(3, 3, Color::Black).unwrap();
        board.place(5, 5, Color::Black).unwrap();
        let piece = *board.get(2, 2).unwrap().unwrap();

        let first = Move::jump(c(2, 2), c(4, 4), None);
        let second = Move::jump(c(4, 4), c(6, 6), Some(Rc::new(first)));
        board.apply_move(&second, &piece).unwrap();

        assert_eq!(board.get(2, 2).unwrap(), None);
        assert_eq!(board.pieces().count(), 1);
    }

    #[test_case(Color::White, (6, 6), (7, 7); "white crowned on last row")]
    #[test_case(Color::Black, (1, 1), (0, 0); "black crowned on first row")]
    fn test_promotion(color: Color, from: (i32, i32), to: (i32, i32)) {
        let mut board = Board::empty(8);
        board.place(from.0, from.1, color).unwrap();
        let piece = *board.get(from.0, from.1).unwrap().unwrap();

        let applied = board
            .apply_move(&Move::step(c(from.0, from.1), c(to.0, to.1)), &piece)
            .unwrap();

        assert!(applied.promoted);
        assert!(board.get(to.0, to.1).unwrap().unwrap().is_king());
    }

    #[test]
    fn test_promotion_is_sticky() {
        let mut board = Board::empty(8);
        board.place(6, 6, Color::White).unwrap();
        let piece = *board.get(6, 6).unwrap().unwrap();
        board.apply_move(&Move::step(c(6, 6), c(7, 7)), &piece).unwrap();

        let king = *board.get(7, 7).unwrap().unwrap();
        let applied = board.apply_move(&Move::step(c(7, 7), c(6, 6)), &king).unwrap();

        assert!(!applied.promoted);
        assert!(applied.piece.is_king());
        assert!(board.get(6, 6).unwrap().unwrap().is_king());
    }

    #[test]
    fn test_apply_rejects_wrong_piece() {
        let mut board = Board::new(8);
        let mut stale = *board.get(2, 2).unwrap().unwrap();
        stale.move_to(c(4, 4));
        let before = board.clone();

        let result = board.apply_move(&Move::step(c(4, 4), c(5, 5)), &stale);

        assert_eq!(
            result,
            Err(BoardError::PieceMismatch {
                id: stale.id(),
                at: c(4, 4)
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_stale_jump_leaves_board_untouched() {
        let mut board = Board::empty(8);
        board.place(2, 2, Color::White).unwrap();
        let piece = *board.get(2, 2).unwrap().unwrap();
        let before = board.clone();

        let result = board.apply_move(&Move::jump(c(2, 2), c(4, 4), None), &piece);

        assert_eq!(result, Err(BoardError::NothingJumped(c(3, 3))));
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_onto_occupied_square() {
        let mut board = Board::new(8);
        let piece = *board.get(1, 1).unwrap().unwrap();
        let result = board.apply_move(&Move::step(c(1, 1), c(2, 2)), &piece);
        assert_eq!(result, Err(BoardError::Occupied(c(2, 2))));
    }

    #[test]
    fn test_flipped_is_deep_copy() {
        let mut board = Board::new(8);
        board.place_king(3, 3, Color::White).unwrap();

        let mut flipped = board.flipped();

        assert_consistent(&flipped);
        let king = flipped.get(4, 4).unwrap().unwrap();
        assert!(king.is_king());
        assert_eq!(king.color(), Color::White);
        assert_eq!(flipped.get(7, 7).unwrap().map(Piece::color), Some(Color::White));

        // Changing the copy leaves the original alone.
        let piece = *flipped.get(4, 4).unwrap().unwrap();
        flipped
            .apply_move(&Move::step(c(4, 4), c(5, 3)), &piece)
            .unwrap();
        assert_eq!(flipped.get(4, 4).unwrap(), None);
        assert!(board.get(3, 3).unwrap().is_some_and(|p| p.is_king()));
        assert_eq!(board.get(2, 4).unwrap(), None);
    }
}
