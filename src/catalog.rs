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

use std::fmt;
use std::str::FromStr;
use super::puzzle::{self, Puzzle, PuzzleData};

#[derive(Debug)]
pub struct Catalog {
    puzzles: Vec<Puzzle>,
}

#[derive(Debug)]
pub enum Error {
    Json(serde_json::Error),
    Puzzle { index: usize, error: puzzle::Error },
    Empty,
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Json(e) => e.fmt(f),
            Error::Puzzle { index, error } => {
                write!(f, "puzzle {}: {}", index + 1, error)
            },
            Error::Empty => write!(f, "no puzzles in catalog"),
        }
    }
}

impl Catalog {
    pub fn new<I>(puzzles: I) -> Result<Catalog, Error>
        where I: IntoIterator<Item = Puzzle>
    {
        let puzzles = puzzles.into_iter().collect::<Vec<_>>();

        if puzzles.is_empty() {
            Err(Error::Empty)
        } else {
            Ok(Catalog { puzzles })
        }
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }
}

impl FromStr for Catalog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Catalog, Error> {
        let data = serde_json::from_str::<Vec<PuzzleData>>(s)?;

        let puzzles = data.into_iter()
            .enumerate()
            .map(|(index, data)| {
                Puzzle::try_from(data)
                    .map_err(|error| Error::Puzzle { index, error })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Catalog::new(puzzles)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::puzzle::{GROUP_SIZE, N_GROUPS};

    const TWO_PUZZLES: &str = r#"[
      {
        "name": "Philosophy Puzzle 1",
        "groups": [
          {
            "words": ["DIVE", "ESTABLISHMENT", "HAUNT", "JOINT"],
            "description": "LOCAL WATERING HOLE"
          },
          {
            "words": ["FENCE", "RIDE", "SHOOT", "SWIM"],
            "description": "COMPETE IN A MODERN PENTATHLON"
          },
          {
            "words": ["CINCH", "GUARANTEE", "ICE", "LOCK"],
            "description": "ENSURE, AS A VICTORY"
          },
          {
            "words": ["HEDGE", "MUTUAL", "SLUSH", "TRUST"],
            "description": "___ FUND"
          }
        ]
      },
      {
        "groups": [
          {
            "words": ["Being", "Essence", "Existence", "Reality"],
            "description": "Metaphysical Concepts"
          },
          {
            "words": ["Virtue", "Justice", "Courage", "Wisdom"],
            "description": "Cardinal Virtues"
          },
          {
            "words": [
              "Utilitarianism", "Eudaimonia", "Golden Mean", "Imperative"
            ],
            "description": "Ethical Theories"
          },
          {
            "words": ["Dialectic", "Phenomenology", "Ontology", "Socratic"],
            "description": "Philosophical Methods"
          }
        ]
      }
    ]"#;

    #[test]
    fn parse() {
        let catalog = TWO_PUZZLES.parse::<Catalog>().unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.puzzles().len(), 2);
        assert!(catalog.get(2).is_none());

        let first = catalog.get(0).unwrap();
        assert_eq!(first.name(), Some("Philosophy Puzzle 1"));
        assert_eq!(first.group(1).words()[3], "SWIM");

        let second = catalog.get(1).unwrap();
        assert!(second.name().is_none());
        assert_eq!(second.display_name(1), "Puzzle 2");
        assert_eq!(second.group_of("Golden Mean"), Some(2));
    }

    #[test]
    fn every_puzzle_is_well_formed() {
        let catalog = TWO_PUZZLES.parse::<Catalog>().unwrap();

        for puzzle in catalog.puzzles() {
            assert_eq!(puzzle.groups().len(), N_GROUPS);

            for (i, a) in puzzle.groups().iter().enumerate() {
                assert_eq!(a.words().len(), GROUP_SIZE);

                for b in puzzle.groups()[i + 1..].iter() {
                    assert!(a.words().iter().all(|w| !b.contains(w)));
                }
            }
        }
    }

    #[test]
    fn parse_error() {
        assert_eq!(
            &"[]".parse::<Catalog>().unwrap_err().to_string(),
            "no puzzles in catalog",
        );

        assert!(matches!(
            "{".parse::<Catalog>().unwrap_err(),
            Error::Json(_),
        ));

        assert!(matches!(
            r#"[{"groups": [{"words": ["a"]}]}]"#.parse::<Catalog>()
                .unwrap_err(),
            Error::Json(_),
        ));

        let three_groups = r#"[
          {"groups": [
            {"words": ["a", "b", "c", "d"], "description": "x"},
            {"words": ["e", "f", "g", "h"], "description": "y"},
            {"words": ["i", "j", "k", "l"], "description": "z"}
          ]}
        ]"#;

        assert_eq!(
            &three_groups.parse::<Catalog>().unwrap_err().to_string(),
            "puzzle 1: expected 4 groups but found 3",
        );

        let second_bad = TWO_PUZZLES.replace("\"Wisdom\"", "\"Being\"");

        assert_eq!(
            &second_bad.parse::<Catalog>().unwrap_err().to_string(),
            "puzzle 2: duplicate word: Being",
        );
    }
}
