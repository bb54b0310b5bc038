/// Completion logs and their persisted form
///
/// A completion log is the set of days on which an item was marked done.
/// The only mutation is toggling a single day, and toggling hands back a new
/// log rather than changing the one it was called on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, ScheduledDays, StreakEngine};

/// Days on which an item was completed
///
/// Backed by a `BTreeSet`, so keys are unique and iterate oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLog {
    dates: BTreeSet<DateKey>,
}

impl CompletionLog {
    /// An empty log, as for a freshly created item
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order
    pub fn iter(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.dates.iter().copied()
    }

    pub fn earliest(&self) -> Option<DateKey> {
        self.dates.first().copied()
    }

    pub fn latest(&self) -> Option<DateKey> {
        self.dates.last().copied()
    }

    /// Whether any logged date falls within `start..=end`
    pub fn any_between(&self, start: DateKey, end: DateKey) -> bool {
        start <= end && self.dates.range(start..=end).next().is_some()
    }

    /// A copy of this log with `date` flipped in or out
    pub fn toggled(&self, date: DateKey) -> Self {
        let mut dates = self.dates.clone();
        if !dates.remove(&date) {
            dates.insert(date);
        }
        Self { dates }
    }
}

impl FromIterator<DateKey> for CompletionLog {
    fn from_iter<I: IntoIterator<Item = DateKey>>(iter: I) -> Self {
        Self { dates: iter.into_iter().collect() }
    }
}

/// What gets persisted for an item: its log plus the running best streak
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub log: CompletionLog,
    pub best_streak: u32,
}

impl CompletionRecord {
    pub fn new(log: CompletionLog, best_streak: u32) -> Self {
        Self { log, best_streak }
    }

    /// Raise `best_streak` to at least the longest run the log itself shows,
    /// counted in due days of `schedule`
    ///
    /// Used when loading, so a stale or missing best value can only grow.
    pub fn reconciled(self, schedule: &ScheduledDays) -> Self {
        let longest = StreakEngine::longest_run_on_schedule(&self.log, schedule);
        Self {
            best_streak: StreakEngine::best_streak(self.best_streak, longest),
            log: self.log,
        }
    }
}
