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
use rand::Rng;
use super::catalog::Catalog;
use super::progress::{ProgressObserver, ProgressTracker, Status};
use super::session::{Outcome, PuzzleSession, SubmitResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedGroup {
    pub index: usize,
    pub description: String,
    pub words: Vec<String>,
    // False if the group was only shown because the game was lost
    pub credited: bool,
}

/// Everything a front end needs to draw the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub puzzle_index: usize,
    pub puzzle_name: String,
    pub words: Vec<String>,
    pub selected: Vec<String>,
    pub solved: Vec<SolvedGroup>,
    pub attempts_remaining: u32,
    pub can_submit: bool,
    pub outcome: Option<Outcome>,
    pub replay: bool,
}

impl View {
    pub fn is_selected(&self, word: &str) -> bool {
        self.selected.iter().any(|w| w == word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub index: usize,
    pub name: String,
    pub status: Status,
}

pub trait Renderer {
    fn render(&mut self, view: &View);
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    NoSuchPuzzle(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NoSuchPuzzle(index) => {
                write!(f, "puzzle {} is not available", index + 1)
            },
        }
    }
}

pub struct Game<R> {
    catalog: Catalog,
    tracker: ProgressTracker,
    session: PuzzleSession,
    puzzle_index: usize,
    rng: R,
    renderer: Box<dyn Renderer>,
}

impl<R: Rng> Game<R> {
    pub fn new(
        catalog: Catalog,
        mut rng: R,
        renderer: Box<dyn Renderer>,
        first_puzzle: usize,
    ) -> Result<Game<R>, Error> {
        let Some(puzzle) = catalog.get(first_puzzle)
        else {
            return Err(Error::NoSuchPuzzle(first_puzzle));
        };

        let mut tracker = ProgressTracker::new(catalog.len());
        tracker.mark_in_progress(first_puzzle);

        let session = PuzzleSession::load(puzzle, Status::NotStarted, &mut rng);

        let mut game = Game {
            catalog,
            tracker,
            session,
            puzzle_index: first_puzzle,
            rng,
            renderer,
        };

        game.render();

        Ok(game)
    }

    /// Registers an observer for status changes. Statuses that were
    /// set before subscribing are available from `archive()`.
    pub fn subscribe(&mut self, observer: Box<dyn ProgressObserver>) {
        self.tracker.subscribe(observer);
    }

    /// Starts a fresh session on the given puzzle. Returns false if
    /// there is no such puzzle.
    pub fn load_puzzle(&mut self, index: usize) -> bool {
        let Some(puzzle) = self.catalog.get(index)
        else {
            return false;
        };

        let prior_status = self.tracker.status_of(index);

        self.tracker.mark_in_progress(index);
        self.session = PuzzleSession::load(puzzle, prior_status, &mut self.rng);
        self.puzzle_index = index;

        tracing::info!(puzzle = index, ?prior_status, "loaded puzzle");

        self.render();

        true
    }

    pub fn toggle_select(&mut self, word: &str) -> bool {
        let changed = self.session.toggle_select(word);

        if changed {
            self.render();
        }

        changed
    }

    pub fn submit(&mut self) -> Option<SubmitResult> {
        let result = self.session.submit()?;

        match result {
            SubmitResult::GameWon => {
                self.tracker.mark_completed(self.puzzle_index);
            },
            SubmitResult::GameLost => {
                self.tracker.mark_failed(self.puzzle_index);
            },
            SubmitResult::Correct(_) | SubmitResult::Incorrect => (),
        }

        self.render();

        Some(result)
    }

    pub fn reshuffle(&mut self) {
        self.session.reshuffle(&mut self.rng);
        self.render();
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.session.clear_selection();

        if changed {
            self.render();
        }

        changed
    }

    pub fn puzzle_index(&self) -> usize {
        self.puzzle_index
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &[Status] {
        self.tracker.all_statuses()
    }

    pub fn archive(&self) -> Vec<ArchiveEntry> {
        self.catalog.puzzles().iter()
            .enumerate()
            .map(|(index, puzzle)| ArchiveEntry {
                index,
                name: puzzle.display_name(index),
                status: self.tracker.status_of(index),
            })
            .collect()
    }

    pub fn hints(&self) -> impl Iterator<Item = &str> {
        self.session.hints()
    }

    pub fn view(&self) -> View {
        let session = &self.session;
        let puzzle = session.puzzle();

        View {
            puzzle_index: self.puzzle_index,
            puzzle_name: puzzle.display_name(self.puzzle_index),
            words: session.words().to_vec(),
            selected: session.selected().to_vec(),
            solved: session.solved_groups()
                .map(|(index, credited)| {
                    let group = puzzle.group(index);

                    SolvedGroup {
                        index,
                        description: group.description().to_string(),
                        words: group.words().to_vec(),
                        credited,
                    }
                })
                .collect(),
            attempts_remaining: session.attempts_remaining(),
            can_submit: session.can_submit(),
            outcome: session.outcome(),
            replay: session.is_replay(),
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.renderer.render(&view);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::puzzle::{Puzzle, watering_hole_puzzle};
    use super::super::session::MAX_ATTEMPTS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::rc::Rc;
    use std::cell::RefCell;

    type Log<T> = Rc<RefCell<Vec<T>>>;

    struct ViewRecorder {
        views: Log<View>,
    }

    impl Renderer for ViewRecorder {
        fn render(&mut self, view: &View) {
            self.views.borrow_mut().push(view.clone());
        }
    }

    struct ProgressRecorder {
        changes: Log<(usize, Status)>,
    }

    impl ProgressObserver for ProgressRecorder {
        fn progress_changed(&mut self, index: usize, status: Status) {
            self.changes.borrow_mut().push((index, status));
        }
    }

    fn anonymous_puzzle() -> Puzzle {
        Puzzle::new(
            None,
            (0..4).map(|g| {
                (
                    (0..4)
                        .map(|w| format!("WORD{}{}", g, w))
                        .collect::<Vec<String>>(),
                    format!("GROUP {}", g),
                )
            }),
        ).unwrap()
    }

    fn new_game(
        puzzles: Vec<Puzzle>,
    ) -> (Game<StdRng>, Log<View>, Log<(usize, Status)>) {
        let views = Rc::new(RefCell::new(Vec::new()));
        let changes = Rc::new(RefCell::new(Vec::new()));

        let mut game = Game::new(
            Catalog::new(puzzles).unwrap(),
            StdRng::seed_from_u64(17),
            Box::new(ViewRecorder { views: views.clone() }),
            0,
        ).unwrap();

        game.subscribe(Box::new(ProgressRecorder { changes: changes.clone() }));

        (game, views, changes)
    }

    fn select_group(game: &mut Game<StdRng>, index: usize) {
        let view = game.view();
        let words = game.catalog().get(view.puzzle_index).unwrap()
            .group(index)
            .words()
            .to_vec();

        for word in words.iter() {
            assert!(game.toggle_select(word));
        }
    }

    fn select_wrong(game: &mut Game<StdRng>) {
        for word in ["DIVE", "HAUNT", "JOINT", "ICE"] {
            assert!(game.toggle_select(word));
        }
    }

    #[test]
    fn starts_on_first_puzzle() {
        let (game, views, changes) = new_game(vec![
            watering_hole_puzzle(),
            anonymous_puzzle(),
        ]);

        let views = views.borrow();
        assert_eq!(views.len(), 1);

        let view = &views[0];
        assert_eq!(view.puzzle_index, 0);
        assert_eq!(view.puzzle_name, "Philosophy Puzzle 1");
        assert_eq!(view.words.len(), 16);
        assert_eq!(view.attempts_remaining, MAX_ATTEMPTS);
        assert!(view.solved.is_empty());
        assert!(view.selected.is_empty());
        assert!(!view.can_submit);
        assert!(view.outcome.is_none());
        assert!(!view.replay);

        assert_eq!(game.progress(), [Status::InProgress, Status::NotStarted]);
        assert!(changes.borrow().is_empty());

        assert_eq!(
            game.archive(),
            [
                ArchiveEntry {
                    index: 0,
                    name: "Philosophy Puzzle 1".to_string(),
                    status: Status::InProgress,
                },
                ArchiveEntry {
                    index: 1,
                    name: "Puzzle 2".to_string(),
                    status: Status::NotStarted,
                },
            ],
        );
    }

    #[test]
    fn bad_first_puzzle() {
        let result = Game::new(
            Catalog::new(vec![anonymous_puzzle()]).unwrap(),
            StdRng::seed_from_u64(1),
            Box::new(ViewRecorder { views: Rc::new(RefCell::new(Vec::new())) }),
            1,
        );

        let Err(e) = result
        else {
            unreachable!("game created with missing puzzle");
        };

        assert_eq!(e, Error::NoSuchPuzzle(1));
        assert_eq!(&e.to_string(), "puzzle 2 is not available");
    }

    #[test]
    fn renders_only_on_change() {
        let (mut game, views, _) = new_game(vec![watering_hole_puzzle()]);

        assert!(!game.toggle_select("NOT A WORD"));
        assert!(!game.clear_selection());
        assert!(game.submit().is_none());
        assert_eq!(views.borrow().len(), 1);

        assert!(game.toggle_select("ICE"));
        assert_eq!(views.borrow().len(), 2);
        assert!(views.borrow()[1].is_selected("ICE"));

        assert!(game.clear_selection());
        assert_eq!(views.borrow().len(), 3);
        assert!(views.borrow()[2].selected.is_empty());

        game.reshuffle();
        assert_eq!(views.borrow().len(), 4);
    }

    #[test]
    fn win_scenario() {
        let (mut game, views, changes) = new_game(vec![watering_hole_puzzle()]);

        for word in ["DIVE", "ESTABLISHMENT", "HAUNT", "JOINT"] {
            game.toggle_select(word);
        }

        assert!(game.view().can_submit);
        assert_eq!(game.submit(), Some(SubmitResult::Correct(0)));

        let view = views.borrow().last().unwrap().clone();
        assert_eq!(view.solved.len(), 1);
        assert_eq!(view.solved[0].index, 0);
        assert_eq!(view.solved[0].description, "LOCAL WATERING HOLE");
        assert!(view.solved[0].credited);
        assert_eq!(view.words.len(), 12);
        assert!(!view.words.iter().any(|w| w == "DIVE"));

        for index in 1..3 {
            select_group(&mut game, index);
            assert_eq!(game.submit(), Some(SubmitResult::Correct(index)));
        }

        select_group(&mut game, 3);
        assert_eq!(game.submit(), Some(SubmitResult::GameWon));

        let view = game.view();
        assert_eq!(view.outcome, Some(Outcome::Completed));
        assert_eq!(view.attempts_remaining, MAX_ATTEMPTS);
        assert!(view.words.is_empty());
        assert_eq!(
            view.solved.iter().map(|g| g.index).collect::<Vec<_>>(),
            [0, 1, 2, 3],
        );

        assert_eq!(game.progress(), [Status::Completed]);
        assert_eq!(*changes.borrow(), [(0, Status::Completed)]);
    }

    #[test]
    fn lose_scenario() {
        let (mut game, _, changes) = new_game(vec![watering_hole_puzzle()]);

        for attempt in 1..=MAX_ATTEMPTS {
            select_wrong(&mut game);

            let result = game.submit();

            assert_eq!(game.view().attempts_remaining, MAX_ATTEMPTS - attempt);

            if attempt < MAX_ATTEMPTS {
                assert_eq!(result, Some(SubmitResult::Incorrect));
            } else {
                assert_eq!(result, Some(SubmitResult::GameLost));
            }
        }

        let view = game.view();
        assert_eq!(view.outcome, Some(Outcome::Failed));
        assert!(!view.can_submit);
        assert!(view.words.is_empty());
        assert_eq!(
            view.solved.iter()
                .map(|g| (g.index, g.credited))
                .collect::<Vec<_>>(),
            [(0, false), (1, false), (2, false), (3, false)],
        );

        assert_eq!(game.progress(), [Status::Failed]);
        assert_eq!(*changes.borrow(), [(0, Status::Failed)]);

        // Everything is out of play now
        assert!(!game.toggle_select("DIVE"));
        assert!(game.submit().is_none());
    }

    #[test]
    fn switch_puzzles() {
        let (mut game, views, changes) = new_game(vec![
            watering_hole_puzzle(),
            anonymous_puzzle(),
        ]);

        game.toggle_select("DIVE");

        assert!(!game.load_puzzle(2));
        assert_eq!(game.puzzle_index(), 0);

        assert!(game.load_puzzle(1));
        assert_eq!(game.puzzle_index(), 1);

        let view = views.borrow().last().unwrap().clone();
        assert_eq!(view.puzzle_index, 1);
        assert_eq!(view.puzzle_name, "Puzzle 2");
        assert!(view.selected.is_empty());
        assert!(view.words.iter().all(|w| w.starts_with("WORD")));

        assert_eq!(
            game.hints().collect::<Vec<_>>(),
            ["GROUP 0", "GROUP 1", "GROUP 2", "GROUP 3"],
        );

        assert_eq!(game.progress(), [Status::InProgress, Status::InProgress]);
        assert_eq!(*changes.borrow(), [(1, Status::InProgress)]);
    }

    #[test]
    fn replay_keeps_status() {
        let (mut game, _, changes) = new_game(vec![watering_hole_puzzle()]);

        for index in 0..4 {
            select_group(&mut game, index);
            game.submit();
        }

        assert_eq!(game.progress(), [Status::Completed]);

        assert!(game.load_puzzle(0));

        let view = game.view();
        assert!(view.replay);
        assert!(view.solved.is_empty());
        assert_eq!(view.words.len(), 16);
        assert_eq!(view.attempts_remaining, MAX_ATTEMPTS);
        assert_eq!(game.progress(), [Status::Completed]);

        // Losing the replay overwrites the earlier result
        for _ in 0..MAX_ATTEMPTS {
            select_wrong(&mut game);
            game.submit();
        }

        assert_eq!(game.progress(), [Status::Failed]);
        assert_eq!(
            *changes.borrow(),
            [(0, Status::Completed), (0, Status::Failed)],
        );
    }
}
