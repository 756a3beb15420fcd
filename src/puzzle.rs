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
use std::collections::HashSet;
use serde::Deserialize;

pub const GROUP_SIZE: usize = 4;
pub const N_GROUPS: usize = 4;
pub const N_WORDS: usize = GROUP_SIZE * N_GROUPS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    words: Vec<String>,
    description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    name: Option<String>,
    groups: Vec<Group>,
}

/// The puzzle as it appears in the JSON catalog, before any of the
/// structural checks have been made.
#[derive(Deserialize, Debug)]
pub struct PuzzleData {
    #[serde(default)]
    pub name: Option<String>,
    pub groups: Vec<GroupData>,
}

#[derive(Deserialize, Debug)]
pub struct GroupData {
    pub words: Vec<String>,
    pub description: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    WrongGroupCount(usize),
    WrongGroupSize { group: usize, size: usize },
    EmptyWord { group: usize },
    DuplicateWord(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::WrongGroupCount(count) => write!(
                f,
                "expected {} groups but found {}",
                N_GROUPS,
                count,
            ),
            Error::WrongGroupSize { group, size } => write!(
                f,
                "group {} has {} words instead of {}",
                group + 1,
                size,
                GROUP_SIZE,
            ),
            Error::EmptyWord { group } => write!(
                f,
                "group {} contains an empty word",
                group + 1,
            ),
            Error::DuplicateWord(word) => write!(f, "duplicate word: {}", word),
        }
    }
}

impl Group {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Returns true if `selection` contains exactly the words of the
    /// group, in any order.
    pub fn matches<I, T>(&self, selection: I) -> bool
        where I: IntoIterator<Item = T>,
              T: AsRef<str>
    {
        let selection = selection.into_iter().collect::<Vec<T>>();
        let selection = selection.iter()
            .map(|w| w.as_ref())
            .collect::<HashSet<&str>>();

        selection == self.words.iter()
            .map(String::as_str)
            .collect::<HashSet<&str>>()
    }
}

impl Puzzle {
    pub fn new<I>(name: Option<String>, groups: I) -> Result<Puzzle, Error>
        where I: IntoIterator<Item = (Vec<String>, String)>
    {
        let groups = groups.into_iter()
            .map(|(words, description)| Group { words, description })
            .collect::<Vec<_>>();

        if groups.len() != N_GROUPS {
            return Err(Error::WrongGroupCount(groups.len()));
        }

        let mut seen = HashSet::new();

        for (group_num, group) in groups.iter().enumerate() {
            if group.words.len() != GROUP_SIZE {
                return Err(Error::WrongGroupSize {
                    group: group_num,
                    size: group.words.len(),
                });
            }

            for word in group.words.iter() {
                if word.is_empty() {
                    return Err(Error::EmptyWord { group: group_num });
                }

                if !seen.insert(word.as_str()) {
                    return Err(Error::DuplicateWord(word.clone()));
                }
            }
        }

        Ok(Puzzle { name, groups })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name to show for the puzzle at the given catalog position.
    pub fn display_name(&self, index: usize) -> String {
        match self.name.as_deref() {
            Some(name) => name.to_string(),
            None => format!("Puzzle {}", index + 1),
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> &Group {
        &self.groups[index]
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.groups.iter()
            .flat_map(|group| group.words.iter().map(String::as_str))
    }

    pub fn group_of(&self, word: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.contains(word))
    }
}

impl TryFrom<PuzzleData> for Puzzle {
    type Error = Error;

    fn try_from(data: PuzzleData) -> Result<Puzzle, Error> {
        Puzzle::new(
            data.name,
            data.groups.into_iter().map(|g| (g.words, g.description)),
        )
    }
}

#[cfg(test)]
pub fn watering_hole_puzzle() -> Puzzle {
    fn group(
        words: [&str; GROUP_SIZE],
        description: &str,
    ) -> (Vec<String>, String) {
        (
            words.iter().map(|w| w.to_string()).collect(),
            description.to_string(),
        )
    }

    Puzzle::new(
        Some("Philosophy Puzzle 1".to_string()),
        [
            group(
                ["DIVE", "ESTABLISHMENT", "HAUNT", "JOINT"],
                "LOCAL WATERING HOLE",
            ),
            group(
                ["FENCE", "RIDE", "SHOOT", "SWIM"],
                "COMPETE IN A MODERN PENTATHLON",
            ),
            group(
                ["CINCH", "GUARANTEE", "ICE", "LOCK"],
                "ENSURE, AS A VICTORY",
            ),
            group(
                ["HEDGE", "MUTUAL", "SLUSH", "TRUST"],
                "___ FUND",
            ),
        ],
    ).unwrap()
}
