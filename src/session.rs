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

use super::puzzle::{Puzzle, GROUP_SIZE, N_GROUPS};
use super::progress::Status;
use super::shuffle;
use rand::Rng;

pub const MAX_ATTEMPTS: u32 = 5;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SubmitResult {
    Correct(usize),
    Incorrect,
    GameWon,
    GameLost,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Outcome {
    Completed,
    Failed,
}

/// One play-through of a puzzle.
pub struct PuzzleSession {
    puzzle: Puzzle,
    // Words still in play, in display order
    words: Vec<String>,
    selected: Vec<String>,
    found_groups: Vec<usize>,
    revealed_groups: Vec<usize>,
    attempts_remaining: u32,
    outcome: Option<Outcome>,
    replay: bool,
}

impl PuzzleSession {
    pub fn load<R>(
        puzzle: &Puzzle,
        prior_status: Status,
        rng: &mut R,
    ) -> PuzzleSession
        where R: Rng + ?Sized
    {
        let words = puzzle.words()
            .map(str::to_string)
            .collect::<Vec<_>>();

        PuzzleSession {
            puzzle: puzzle.clone(),
            words: shuffle::shuffled(&words, rng),
            selected: Vec::with_capacity(GROUP_SIZE),
            found_groups: Vec::new(),
            revealed_groups: Vec::new(),
            attempts_remaining: MAX_ATTEMPTS,
            outcome: None,
            replay: prior_status.is_finished(),
        }
    }

    /// Selects or deselects a word. Returns true if the selection
    /// changed.
    pub fn toggle_select(&mut self, word: &str) -> bool {
        if !self.words.iter().any(|w| w == word) {
            return false;
        }

        if let Some(pos) = self.selected.iter().position(|w| w == word) {
            self.selected.remove(pos);
        } else if self.selected.len() < GROUP_SIZE {
            self.selected.push(word.to_string());
        } else {
            return false;
        }

        tracing::debug!(word, selected = self.selected.len(), "toggled word");

        true
    }

    pub fn can_submit(&self) -> bool {
        self.selected.len() == GROUP_SIZE &&
            self.attempts_remaining > 0 &&
            self.outcome.is_none()
    }

    pub fn submit(&mut self) -> Option<SubmitResult> {
        if !self.can_submit() {
            return None;
        }

        let selected = std::mem::take(&mut self.selected);

        let matched = self.puzzle.groups().iter()
            .enumerate()
            .find(|&(index, group)| {
                !self.found_groups.contains(&index) &&
                    group.matches(&selected)
            })
            .map(|(index, _)| index);

        let result = match matched {
            Some(index) => {
                self.found_groups.push(index);
                self.remove_group_words(index);

                if self.found_groups.len() >= N_GROUPS {
                    self.outcome = Some(Outcome::Completed);
                    SubmitResult::GameWon
                } else {
                    SubmitResult::Correct(index)
                }
            },
            None => {
                self.attempts_remaining -= 1;

                if self.attempts_remaining == 0 {
                    self.outcome = Some(Outcome::Failed);
                    self.reveal_remaining();
                    SubmitResult::GameLost
                } else {
                    SubmitResult::Incorrect
                }
            },
        };

        tracing::debug!(
            ?selected,
            ?result,
            attempts_remaining = self.attempts_remaining,
            "evaluated guess"
        );

        Some(result)
    }

    /// Puts the words still in play in a new random order. The
    /// selection doesn’t survive the new layout.
    pub fn reshuffle<R>(&mut self, rng: &mut R)
        where R: Rng + ?Sized
    {
        self.words = shuffle::shuffled(&self.words, rng);
        self.selected.clear();
    }

    /// Returns true if there was anything to clear.
    pub fn clear_selection(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    fn remove_group_words(&mut self, index: usize) {
        let group = self.puzzle.group(index);
        self.words.retain(|w| !group.contains(w));
    }

    fn reveal_remaining(&mut self) {
        for index in 0..self.puzzle.groups().len() {
            if !self.found_groups.contains(&index) &&
                !self.revealed_groups.contains(&index)
            {
                self.revealed_groups.push(index);
                self.remove_group_words(index);
            }
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, word: &str) -> bool {
        self.selected.iter().any(|w| w == word)
    }

    pub fn found_groups(&self) -> &[usize] {
        &self.found_groups
    }

    pub fn revealed_groups(&self) -> &[usize] {
        &self.revealed_groups
    }

    /// All the groups that are on display in the order they were
    /// shown, along with whether the player gets credit for them.
    pub fn solved_groups(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.found_groups.iter().map(|&index| (index, true))
            .chain(self.revealed_groups.iter().map(|&index| (index, false)))
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_replay(&self) -> bool {
        self.replay
    }

    pub fn hints(&self) -> impl Iterator<Item = &str> {
        self.puzzle.groups().iter().map(|group| group.description())
    }
}
