use std::io::{self, BufRead, Read, Write};

use log::warn;

use super::PlayerError;
use crate::board::Board;
use crate::coord::Coord;
use crate::moves::Move;
use crate::piece::{Color, Piece};
use crate::render::{clear_screen, render_board};
use crate::{Player, Turn};

/// A human at a terminal.
///
/// Shows the board, asks for a piece by its coordinates, then shows that
/// piece's moves numbered on the board and asks for a number. Generic over
/// the reader and writer so whole sessions can be scripted in tests.
#[derive(Debug)]
pub struct ConsolePlayer<R, W> {
    color: Color,
    input: R,
    output: W,
}

/// Standard input, locked only while a single line is read.
///
/// Never buffers past the end of that line, so any number of readers can
/// take turns on the same stdin.
#[derive(Debug, Default)]
pub struct StdinLines {
    line: Vec<u8>,
    pos: usize,
}

impl Read for StdinLines {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            io::stdin().lock().read_until(b'\n', &mut self.line)?;
        }
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}

impl ConsolePlayer<StdinLines, io::Stdout> {
    /// Reads from stdin and draws on stdout.
    pub fn stdio(color: Color) -> Self {
        Self::new(color, StdinLines::default(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePlayer<R, W> {
    pub fn new(color: Color, input: R, output: W) -> Self {
        Self {
            color,
            input,
            output,
        }
    }

    /// Everything written to the player so far.
    pub fn output(&self) -> &W {
        &self.output
    }

    fn read_line(&mut self) -> Result<String, PlayerError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PlayerError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the player names one of their own pieces.
    /// `None` means they typed `exit`.
    fn ask_piece(&mut self, board: &Board) -> Result<Option<Piece>, PlayerError> {
        loop {
            writeln!(
                self.output,
                "{}, please select a piece by its coordinates (i.e. A3):",
                self.color
            )?;
            let line = self.read_line()?;
            if line.eq_ignore_ascii_case("exit") {
                return Ok(None);
            }

            let coord = match line.parse::<Coord>() {
                Ok(coord) if !board.is_out_of_bounds(coord.x, coord.y) => coord,
                _ => {
                    warn!("rejected piece input '{line}'");
                    writeln!(
                        self.output,
                        "Please enter a coordinate on the board in the form '[letter][number]'."
                    )?;
                    continue;
                }
            };

            match board.at(coord)? {
                None => writeln!(self.output, "There is no piece there!\n")?,
                Some(piece) if piece.color() != self.color => {
                    writeln!(self.output, "That's not your piece!\n")?
                }
                Some(piece) => return Ok(Some(*piece)),
            }
        }
    }

    /// Asks for one of the numbered moves. `None` means go back (0).
    fn ask_move(&mut self, moves: &[Move]) -> Result<Option<Move>, PlayerError> {
        loop {
            writeln!(
                self.output,
                "{}, please select a move by its number (enter 0 to go back):",
                self.color
            )?;
            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(0) => return Ok(None),
                Ok(n) if n <= moves.len() => return Ok(Some(moves[n - 1].clone())),
                _ => {
                    warn!("rejected move input '{line}'");
                    writeln!(
                        self.output,
                        "Please enter one of the numbers on the board or 0 to go back."
                    )?;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> Player for ConsolePlayer<R, W> {
    fn color(&self) -> Color {
        self.color
    }

    fn select_move(&mut self, board: &Board) -> Result<Turn, PlayerError> {
        clear_screen(&mut self.output)?;
        render_board(&mut self.output, board, None)?;

        loop {
            let Some(piece) = self.ask_piece(board)? else {
                return Ok(Turn::Quit);
            };

            let Some(moves) = piece.possible_moves(board) else {
                writeln!(
                    self.output,
                    "That piece has no possible moves! Please choose another:"
                )?;
                continue;
            };

            clear_screen(&mut self.output)?;
            render_board(&mut self.output, board, Some(moves.as_slice()))?;
            if let Some(mv) = self.ask_move(&moves)? {
                return Ok(Turn::Play { piece, mv });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn player(color: Color, input: &str) -> ConsolePlayer<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePlayer::new(color, Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(player: &ConsolePlayer<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(player.output()).into_owned()
    }

    #[test]
    fn test_select_piece_then_move() {
        let board = Board::new(8);
        let mut player = player(Color::White, "c3\n2\n");

        let turn = player.select_move(&board).unwrap();

        let Turn::Play { piece, mv } = turn else {
            panic!("expected a move");
        };
        assert_eq!(piece.coord(), Coord::new(2, 2));
        let moves = piece.possible_moves(&board).unwrap();
        assert_eq!(mv, moves[1]);
    }

    #[test]
    fn test_rejections_then_success() {
        let board = Board::new(8);
        let input = "zz\nd4\nb6\nb2\nc3\n9\n1\n";
        let mut player = player(Color::White, input);

        let turn = player.select_move(&board).unwrap();

        assert!(matches!(turn, Turn::Play { .. }));
        let out = transcript(&player);
        assert!(out.contains("in the form '[letter][number]'"));
        assert!(out.contains("There is no piece there!"));
        assert!(out.contains("That's not your piece!"));
        assert!(out.contains("That piece has no possible moves!"));
        assert!(out.contains("Please enter one of the numbers"));
    }

    #[test]
    fn test_go_back_and_pick_another() {
        let board = Board::new(8);
        let mut player = player(Color::Black, "b6\n0\nh6\n1\n");

        let Turn::Play { piece, mv } = player.select_move(&board).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(piece.coord(), Coord::new(7, 5));
        assert_eq!(mv.end(), Coord::new(6, 4));
    }

    #[test]
    fn test_exit_quits() {
        let board = Board::new(8);
        let mut player = player(Color::White, "EXIT\n");
        assert_eq!(player.select_move(&board).unwrap(), Turn::Quit);
    }

    #[test]
    fn test_stdio_players_share_stdin() {
        let white = ConsolePlayer::stdio(Color::White);
        let black = ConsolePlayer::stdio(Color::Black);
        assert_eq!(white.color(), Color::White);
        assert_eq!(black.color(), Color::Black);
        assert!(white.input.line.is_empty());
    }

    #[test]
    fn test_closed_input() {
        let board = Board::new(8);
        let mut player = player(Color::White, "c3\n");
        assert!(matches!(
            player.select_move(&board),
            Err(PlayerError::InputClosed)
        ));
    }
}
