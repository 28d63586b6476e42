use std::io::{self, Write};

use crate::board::Board;
use crate::coord::Coord;
use crate::moves::Move;

/// Error type for board rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

/// Clears the screen and moves cursor to top-left.
pub fn clear_screen(w: &mut impl Write) -> Result<(), RenderError> {
    write!(w, "\x1B[2J\x1B[H")?;
    Ok(())
}

/// Render the board to any writer, row 1 at the top.
///
/// With `moves`, every square a move ends on shows that move's 1-based
/// number instead of its contents, and the numbered moves are listed
/// below the grid.
pub fn render_board(
    w: &mut impl Write,
    board: &Board,
    moves: Option<&[Move]>,
) -> Result<(), RenderError> {
    let size = board.size() as i32;

    write!(w, "    ")?;
    for x in 0..size {
        write!(w, "  {} ", column_letter(x))?;
    }
    writeln!(w)?;

    for y in 0..size {
        write!(w, "{:>3} ", y + 1)?;
        for x in 0..size {
            let coord = Coord::new(x, y);
            let label = moves.and_then(|moves| move_number(moves, coord));
            match (label, board.at(coord).ok().flatten()) {
                (Some(number), _) => write!(w, "| {number:<2}")?,
                (None, Some(piece)) => write!(w, "| {}", piece.symbol())?,
                (None, None) if coord.is_dark() => write!(w, "| . ")?,
                (None, None) => write!(w, "|   ")?,
            }
        }
        writeln!(w, "|")?;
    }

    if let Some(moves) = moves {
        writeln!(w)?;
        for (i, mv) in moves.iter().enumerate() {
            writeln!(w, "[{}] {}", i + 1, mv)?;
        }
    }

    w.flush()?;
    Ok(())
}

/// First move ending on `coord`, numbered from 1.
fn move_number(moves: &[Move], coord: Coord) -> Option<usize> {
    moves.iter().position(|mv| mv.end() == coord).map(|i| i + 1)
}

fn column_letter(x: i32) -> char {
    (b'A' + (x % 26) as u8) as char
}
