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

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Status {
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::NotStarted => 0,
            Status::InProgress => 1,
            Status::Completed => 2,
            Status::Failed => 3,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Status::NotStarted => "⚪",
            Status::InProgress => "◑",
            Status::Completed => "✅",
            Status::Failed => "❌",
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, Status::Completed | Status::Failed)
    }
}

pub trait ProgressObserver {
    fn progress_changed(&mut self, index: usize, status: Status);
}

/// Status of every puzzle in the catalog.
pub struct ProgressTracker {
    statuses: Vec<Status>,
    observers: Vec<Box<dyn ProgressObserver>>,
}

impl ProgressTracker {
    pub fn new(n_puzzles: usize) -> ProgressTracker {
        ProgressTracker {
            statuses: vec![Status::NotStarted; n_puzzles],
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn ProgressObserver>) {
        self.observers.push(observer);
    }

    pub fn status_of(&self, index: usize) -> Status {
        self.statuses.get(index).copied().unwrap_or(Status::NotStarted)
    }

    pub fn all_statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn mark_in_progress(&mut self, index: usize) {
        if self.status_of(index) == Status::NotStarted {
            self.set_status(index, Status::InProgress);
        }
    }

    pub fn mark_completed(&mut self, index: usize) {
        self.set_status(index, Status::Completed);
    }

    pub fn mark_failed(&mut self, index: usize) {
        self.set_status(index, Status::Failed);
    }

    fn set_status(&mut self, index: usize, status: Status) {
        let Some(slot) = self.statuses.get_mut(index)
        else {
            return;
        };

        if std::mem::replace(slot, status) == status {
            return;
        }

        tracing::info!(puzzle = index, ?status, "progress changed");

        for observer in self.observers.iter_mut() {
            observer.progress_changed(index, status);
        }
    }
}
