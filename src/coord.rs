use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A square on the board, addressed by column `x` and row `y`.
///
/// Both components are signed so neighbour arithmetic may step off the
/// board. Check [`Board::is_out_of_bounds`](crate::board::Board::is_out_of_bounds)
/// before reading a computed coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The square halfway between `self` and `other`.
    ///
    /// Only meaningful for two squares on the same diagonal an even
    /// distance apart, which is what every jump is.
    #[inline]
    pub const fn midpoint(self, other: Coord) -> Self {
        Self::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }

    /// Dark squares are the only ones pieces ever stand on.
    #[inline]
    pub const fn is_dark(self) -> bool {
        self.x.rem_euclid(2) == self.y.rem_euclid(2)
    }
}

/// Error when parsing a coordinate typed at the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordParseError {
    /// Needs exactly one column letter and a row number
    #[error("expected a letter and a number (e.g. 'A3'), got '{0}'")]
    Malformed(String),
    /// Rows are numbered from 1
    #[error("row numbers start at 1")]
    BadRank,
}

/// Parse console notation like "c3" into a Coord.
///
/// The letter picks the column (`a` is x = 0), the number the row
/// counting from 1. Case is ignored and the two parts may come in
/// either order.
///
/// # Examples
/// ```
/// # use checkers_engine::coord::Coord;
/// let coord: Coord = "C3".parse().unwrap();
/// assert_eq!(coord, Coord::new(2, 2));
/// assert_eq!("3c".parse::<Coord>().unwrap(), coord);
/// ```
impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || CoordParseError::Malformed(s.to_string());

        let (file, number) = match (s.chars().next(), s.chars().last()) {
            (Some(first), _) if first.is_ascii_alphabetic() => (first, &s[1..]),
            (_, Some(last)) if last.is_ascii_alphabetic() => (last, &s[..s.len() - 1]),
            _ => return Err(malformed()),
        };

        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let rank: i32 = number.parse().map_err(|_| malformed())?;
        if rank == 0 {
            return Err(CoordParseError::BadRank);
        }

        let x = file.to_ascii_lowercase() as i32 - 'a' as i32;
        Ok(Coord::new(x, rank - 1))
    }
}

/// Display in console notation (e.g. "C3"), falling back to the raw pair
/// for coordinates that have no letter.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (0..26).contains(&self.x) && self.y >= 0 {
            let file = (b'A' + self.x as u8) as char;
            write!(f, "{}{}", file, self.y + 1)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}
