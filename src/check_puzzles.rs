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

use std::{fs, process::ExitCode, ffi::OsString};
use clap::Parser;
use catalog::Catalog;
use puzzle::Puzzle;

#[derive(Parser)]
#[command(name = "Check puzzles")]
struct Cli {
    #[arg(required = true, value_name = "FILE")]
    catalogs: Vec<OsString>,
    #[arg(short = 'H', long)]
    human_readable: bool,
}

fn format_puzzle(index: usize, puzzle: &Puzzle) -> String {
    let mut text = format!("{}. {}\n", index + 1, puzzle.display_name(index));

    for group in puzzle.groups() {
        text.push_str(&format!(
            "  {}: {}\n",
            group.description(),
            group.words().join(", "),
        ));
    }

    text
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    for filename in cli.catalogs.iter() {
        let catalog_string = match fs::read_to_string(filename) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}: {}", filename.to_string_lossy(), e);
                return ExitCode::FAILURE;
            },
        };

        let catalog = match catalog_string.parse::<Catalog>() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}: {}", filename.to_string_lossy(), e);
                return ExitCode::FAILURE;
            },
        };

        if cli.human_readable {
            for (index, puzzle) in catalog.puzzles().iter().enumerate() {
                if index > 0 {
                    println!();
                }
                print!("{}", format_puzzle(index, puzzle));
            }
        } else {
            println!(
                "{}: {} puzzles",
                filename.to_string_lossy(),
                catalog.len(),
            );
        }
    }

    ExitCode::SUCCESS
}
