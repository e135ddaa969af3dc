//! Interactive arbiter: reads commands from stdin and reports on stdout.
//!
//! Supported commands:
//!
//! - `position startpos` or `position [fen] <FEN>` starts a new game
//! - `moves` lists the legal moves in UCI form
//! - `d` prints the current position
//! - `status` prints the status of the game
//! - `undo` takes back the last move
//! - `quit`
//!
//! Any other line is a sequence of moves in Standard Algebraic Notation.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use arbiter::chess::game::Game;
use arbiter::chess::position::Position;
use itertools::Itertools;

fn setup(description: &str) -> anyhow::Result<Position> {
    let position = match description.trim() {
        "startpos" => Position::starting(),
        fen => Position::try_from(fen)?,
    };
    if !position.is_legal() {
        bail!("illegal position: {position}");
    }
    Ok(position)
}

fn arbitrate(input: &mut impl BufRead, output: &mut impl Write) -> anyhow::Result<()> {
    let mut game = Game::starting();
    let mut line = String::new();
    loop {
        line.clear();
        // EOF reached.
        if input.read_line(&mut line).context("reading command")? == 0 {
            break;
        }
        match line.trim() {
            "" => {},
            "quit" => break,
            "moves" => writeln!(output, "{}", game.legal_moves().iter().join(" "))?,
            "d" => write!(output, "{:?}", game.position())?,
            "status" => writeln!(output, "{}", game.status())?,
            "undo" => match game.undo().map(|_| ()) {
                Ok(()) => writeln!(output, "{}", game.position())?,
                Err(e) => writeln!(output, "Error: {e}")?,
            },
            command => {
                if let Some(description) = command.strip_prefix("position ") {
                    match setup(description) {
                        Ok(position) => {
                            game = Game::new(position);
                            writeln!(output, "{}", game.position())?;
                        },
                        Err(e) => writeln!(output, "Error: {e:#}")?,
                    }
                    continue;
                }
                match arbiter::notation::do_moves(&mut game, command.split_whitespace()) {
                    Ok(status) => writeln!(output, "{status}")?,
                    Err(e) => writeln!(output, "Error: {e}")?,
                }
            },
        }
        output.flush()?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    arbiter::print_engine_info();
    arbiter::print_binary_info();
    arbitrate(&mut io::stdin().lock(), &mut io::stdout().lock())
}
