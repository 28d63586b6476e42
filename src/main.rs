use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use checkers_engine::config::{GameConfig, Mode};
use clap::Parser;

/// Console checkers for one or two players.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Side length of the board
    #[arg(long, default_value_t = GameConfig::DEFAULT_SIZE)]
    size: usize,

    /// Game mode; asked interactively when omitted
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Seed for the computer player
    #[arg(long)]
    seed: Option<u64>,
}

/// Shows the welcome menu until the user picks a mode.
/// `None` means they typed `exit` or closed the input.
fn ask_mode(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<Option<Mode>> {
    loop {
        write!(output, "\x1B[2J\x1B[H")?;
        writeln!(output, "*******Welcome to checkers!*******\n")?;
        writeln!(output, "Enter 'exit' to exit at any point (or 0 when moving a piece).\n")?;
        writeln!(output, "We offer two game modes:")?;
        writeln!(output, "[1] 1 Player Mode (vs Computer) - EXPERIMENTAL")?;
        writeln!(output, "[2] 2 Player Mode")?;
        writeln!(output, "\nWhich one would you like to play? Enter a number: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim() {
            "1" => return Ok(Some(Mode::OnePlayer)),
            "2" => return Ok(Some(Mode::TwoPlayer)),
            "exit" => return Ok(None),
            _ => continue,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mode = match cli.mode {
        Some(mode) => mode,
        None => match ask_mode(&mut io::stdin().lock(), &mut io::stdout()) {
            Ok(Some(mode)) => mode,
            Ok(None) => return ExitCode::SUCCESS,
            Err(e) => {
                log::error!("failed to read game mode: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let config = GameConfig {
        size: cli.size,
        mode,
        seed: cli.seed,
    };
    let mut game = match config.into_game() {
        Ok(game) => game,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match game.run() {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("game aborted: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
