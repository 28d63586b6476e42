use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::board::Board;
use crate::coord::Coord;
use crate::moves::Move;

/// Side a piece plays for. White starts on the low rows and moves toward
/// higher `y`; black starts on the high rows and moves toward `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction a man of this color advances in.
    #[inline]
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row on which a man of this color is crowned.
    #[inline]
    pub const fn far_rank(self, size: usize) -> i32 {
        match self {
            Color::White => size as i32 - 1,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

/// Stable identity of a piece for the lifetime of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u32);

impl PieceId {
    #[inline]
    pub(crate) const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// A piece standing on the board.
///
/// Pieces are owned by the board square they occupy. Copies handed out by
/// [`Board::get`] are snapshots; the board's own copy is the one that
/// moves and gets crowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    color: Color,
    king: bool,
    coord: Coord,
}

impl Piece {
    pub(crate) const fn new(id: PieceId, color: Color, coord: Coord) -> Self {
        Self {
            id,
            color,
            king: false,
            coord,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.king
    }

    #[inline]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Two-character board symbol: color letter, then `K` for kings.
    pub fn symbol(&self) -> &'static str {
        match (self.color, self.king) {
            (Color::White, false) => "W ",
            (Color::White, true) => "WK",
            (Color::Black, false) => "B ",
            (Color::Black, true) => "BK",
        }
    }

    /// Whether the piece currently stands on its far rank.
    #[inline]
    pub fn should_be_king(&self, size: usize) -> bool {
        self.coord.y == self.color.far_rank(size)
    }

    /// Updates the recorded position only; the board moves the piece.
    #[inline]
    pub(crate) fn move_to(&mut self, coord: Coord) {
        self.coord = coord;
    }

    #[inline]
    pub(crate) fn crown(&mut self) {
        self.king = true;
    }

    /// Generates every physically possible move of this piece.
    ///
    /// Simple steps come first, followed by every jump reachable through
    /// recursive capture search. Each intermediate landing square of a
    /// multi-jump is its own entry, so the caller may stop a chain early.
    /// Returns `None` when the piece cannot move at all.
    pub fn possible_moves(&self, board: &Board) -> Option<Vec<Move>> {
        let probe = Probe::from(self);

        let mut moves: Vec<Move> = probe
            .targets(1)
            .filter(|&to| board.is_vacant(to))
            .map(|to| Move::step(self.coord, to))
            .collect();
        let steps = moves.len();

        let max_depth = board.count(self.color.opposite());
        probe.collect_jumps(board, None, max_depth, &mut moves);

        debug!(
            "{} {} at {}: {} steps, {} jumps",
            self.color,
            if self.king { "king" } else { "man" },
            self.coord,
            steps,
            moves.len() - steps
        );

        (!moves.is_empty()).then_some(moves)
    }
}

/// Stand-in for a piece partway through a capture chain.
///
/// Carries only what the search needs and never enters the board, so it
/// cannot alias a real occupant.
#[derive(Debug, Clone, Copy)]
struct Probe {
    color: Color,
    king: bool,
    at: Coord,
}

impl From<&Piece> for Probe {
    fn from(piece: &Piece) -> Self {
        Self {
            color: piece.color,
            king: piece.king,
            at: piece.coord,
        }
    }
}

impl Probe {
    /// Men check the forward row only; kings also check the row behind.
    #[inline]
    fn rows_to_check(self) -> usize {
        if self.king { 2 } else { 1 }
    }

    /// Diagonal squares `distance` away, column by column, forward row first.
    fn targets(self, distance: i32) -> impl Iterator<Item = Coord> {
        let forward = self.color.forward() * distance;
        let rows = self.rows_to_check();
        [-distance, distance].into_iter().flat_map(move |dx| {
            [forward, -forward]
                .into_iter()
                .take(rows)
                .map(move |dy| self.at.offset(dx, dy))
        })
    }

    /// Appends every jump available from here, then recurses from each
    /// landing square as if the piece stood there.
    ///
    /// Only the immediately preceding jump's start square is off limits, so
    /// a king may loop around a ring of pieces. `depth_left` stops such a
    /// loop once the chain is longer than the number of pieces there are to
    /// capture.
    fn collect_jumps(
        self,
        board: &Board,
        preceding: Option<&Rc<Move>>,
        depth_left: usize,
        out: &mut Vec<Move>,
    ) {
        if depth_left == 0 {
            return;
        }

        for landing in self.targets(2) {
            if preceding.is_some_and(|prev| prev.start() == landing) {
                continue;
            }
            if !board.is_vacant(landing) {
                continue;
            }

            let between = board.at(self.at.midpoint(landing)).ok().flatten();
            if !between.is_some_and(|piece| piece.color() != self.color) {
                continue;
            }

            let jump = Rc::new(Move::jump(self.at, landing, preceding.cloned()));
            out.push(Move::clone(&jump));

            let landed = Probe {
                at: landing,
                ..self
            };
            landed.collect_jumps(board, Some(&jump), depth_left - 1, out);
        }
    }
}
