// Connections – A word grouping game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

mod puzzle;
mod catalog;
mod shuffle;
mod session;
mod progress;
mod game;

use std::fmt;
use std::str::FromStr;
use std::io::BufRead;
use std::{fs, process::ExitCode, ffi::OsString};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};
use catalog::Catalog;
use game::{Game, Renderer, View};
use progress::{ProgressObserver, Status};
use session::{MAX_ATTEMPTS, Outcome, SubmitResult};

const GRID_COLUMNS: usize = 4;

#[derive(Parser)]
#[command(name = "Connections")]
struct Cli {
    #[arg(value_name = "FILE", default_value = "puzzles.json")]
    puzzles: OsString,
    #[arg(short, long, value_name = "NUMBER", default_value_t = 1)]
    puzzle: usize,
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(Vec<String>),
    Submit,
    Shuffle,
    Clear,
    Load(usize),
    Archive,
    Hint,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum CommandError {
    Empty,
    UnknownCommand(String),
    MissingWords,
    InvalidPuzzleNumber,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::UnknownCommand(c) => {
                write!(f, "unknown command: {}", c)
            },
            CommandError::MissingWords => write!(f, "no words to select"),
            CommandError::InvalidPuzzleNumber => {
                write!(f, "invalid puzzle number")
            },
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Command, CommandError> {
        let s = s.trim();

        let (command, tail) = match s.split_once(char::is_whitespace) {
            Some((command, tail)) => (command, tail.trim()),
            None => (s, ""),
        };

        match command {
            "" => Err(CommandError::Empty),
            "select" | "s" => {
                // Words can contain spaces so they are separated by commas
                let words = tail.split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>();

                if words.is_empty() {
                    Err(CommandError::MissingWords)
                } else {
                    Ok(Command::Select(words))
                }
            },
            "submit" | "go" => Ok(Command::Submit),
            "shuffle" => Ok(Command::Shuffle),
            "clear" | "deselect" => Ok(Command::Clear),
            "load" => match tail.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Command::Load(n)),
                _ => Err(CommandError::InvalidPuzzleNumber),
            },
            "archive" => Ok(Command::Archive),
            "hint" => Ok(Command::Hint),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::UnknownCommand(command.to_string())),
        }
    }
}

struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &View) {
        print!("{}", format_view(view));
    }
}

struct ArchivePrinter {
    names: Vec<String>,
}

impl ProgressObserver for ArchivePrinter {
    fn progress_changed(&mut self, index: usize, status: Status) {
        if let Some(name) = self.names.get(index) {
            println!("{} {}", status.icon(), name);
        }
    }
}

fn format_view(view: &View) -> String {
    let mut text = format!("\n{}", view.puzzle_name);

    if view.replay {
        text.push_str(" (replay)");
    }

    text.push('\n');

    for group in view.solved.iter() {
        text.push_str(if group.credited { "  ✔ " } else { "  ✘ " });
        text.push_str(&group.description);
        text.push_str(": ");
        text.push_str(&group.words.join(", "));
        text.push('\n');
    }

    let width = view.words.iter()
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(0) + 2;

    for row in view.words.chunks(GRID_COLUMNS) {
        for word in row.iter() {
            let cell = if view.is_selected(word) {
                format!("[{}]", word)
            } else {
                format!(" {} ", word)
            };
            text.push_str(&format!(" {:<width$}", cell, width = width));
        }
        text.push('\n');
    }

    text.push_str("Attempts: ");

    for i in 0..MAX_ATTEMPTS {
        text.push(if i < view.attempts_remaining { '●' } else { '○' });
    }

    text.push('\n');

    match view.outcome {
        Some(Outcome::Completed) => text.push_str("Puzzle complete!\n"),
        Some(Outcome::Failed) => text.push_str("Out of attempts\n"),
        None => (),
    }

    text
}

fn print_help() {
    println!(
        "Commands:\n  \
         select WORD[, WORD…]  toggle words in the selection\n  \
         submit                check the four selected words\n  \
         shuffle               rearrange the remaining words\n  \
         clear                 deselect everything\n  \
         load N                play puzzle number N\n  \
         archive               show the status of every puzzle\n  \
         hint                  show the group descriptions\n  \
         quit                  leave the game"
    );
}

// An exact match wins, otherwise ASCII case is ignored
fn resolve_word(view: &View, typed: &str) -> String {
    view.words.iter()
        .find(|w| w.as_str() == typed)
        .or_else(|| view.words.iter().find(|w| w.eq_ignore_ascii_case(typed)))
        .cloned()
        .unwrap_or_else(|| typed.to_string())
}

fn run_command(game: &mut Game<StdRng>, command: Command) -> bool {
    match command {
        Command::Select(words) => {
            for typed in words.iter() {
                let word = resolve_word(&game.view(), typed);

                if !game.toggle_select(&word) {
                    println!("Can’t select {}", typed);
                }
            }
        },
        Command::Submit => match game.submit() {
            Some(SubmitResult::Correct(_)) => println!("Correct!"),
            Some(SubmitResult::Incorrect) => println!("Not quite"),
            Some(SubmitResult::GameWon) => println!("You found every group!"),
            Some(SubmitResult::GameLost) => println!("Better luck next time"),
            None => println!("Select four words first"),
        },
        Command::Shuffle => game.reshuffle(),
        Command::Clear => {
            game.clear_selection();
        },
        Command::Load(n) => {
            if !game.load_puzzle(n - 1) {
                println!("There is no puzzle {}", n);
            }
        },
        Command::Archive => {
            for entry in game.archive() {
                println!(
                    "{} {}. {}",
                    entry.status.icon(),
                    entry.index + 1,
                    entry.name,
                );
            }
        },
        Command::Hint => {
            for description in game.hints() {
                println!("• {}", description);
            }
        },
        Command::Help => print_help(),
        Command::Quit => return false,
    }

    true
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let catalog = match fs::read_to_string(&cli.puzzles) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", cli.puzzles.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    let catalog = match catalog.parse::<Catalog>() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", cli.puzzles.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    let names = catalog.puzzles().iter()
        .enumerate()
        .map(|(index, puzzle)| puzzle.display_name(index))
        .collect::<Vec<_>>();

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let Some(first_puzzle) = cli.puzzle.checked_sub(1)
    else {
        eprintln!("puzzle numbers start at 1");
        return ExitCode::FAILURE;
    };

    let mut game = match Game::new(
        catalog,
        rng,
        Box::new(TerminalRenderer),
        first_puzzle,
    ) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    game.subscribe(Box::new(ArchivePrinter { names }));

    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin: {}", e);
                return ExitCode::FAILURE;
            },
        };

        match line.parse::<Command>() {
            Ok(command) => {
                if !run_command(&mut game, command) {
                    break;
                }
            },
            Err(CommandError::Empty) => (),
            Err(e) => println!("{} (try “help”)", e),
        }
    }

    ExitCode::SUCCESS
}
