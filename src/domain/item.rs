/// Trackable item entity and related functionality
///
/// A trackable item is anything with a completion log: a habit or a
/// supplement. This module holds the entity, its validation rules, and the
/// glue that runs the streak engine over an item's persisted record.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CompletionLog, CompletionRecord, DateKey, DomainError, FrequencyPolicy, ItemKind,
    ScheduledDays, StreakEngine, StreakStats, TrackableId, WeekCompletionGrid,
};

/// Maximum length of an item name after trimming
const MAX_NAME_LEN: usize = 100;

/// Something the user marks done on some days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackableItem {
    /// Unique identifier for this item
    pub id: TrackableId,
    /// Display name (e.g., "Morning Run", "Vitamin D")
    pub name: String,
    /// Habit or supplement
    pub kind: ItemKind,
    /// What counts as complete for one period
    pub frequency: FrequencyPolicy,
    /// Weekdays the item is due on; empty means every day
    pub scheduled_days: ScheduledDays,
    /// Local day the item was created; earlier grid days are greyed out
    pub created_on: DateKey,
    /// Whether this item is currently active (can be paused)
    pub is_active: bool,
}

impl TrackableItem {
    /// Create a new item with validation
    ///
    /// A missing frequency falls back to `daily`. Habits only support the
    /// daily policy; their variation comes from `scheduled_days`.
    pub fn new(
        name: String,
        kind: ItemKind,
        frequency: Option<FrequencyPolicy>,
        scheduled_days: ScheduledDays,
        created_on: DateKey,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;
        let frequency = frequency.unwrap_or_default();
        Self::validate_frequency_for_kind(kind, frequency)?;

        Ok(Self {
            id: TrackableId::new(),
            name,
            kind,
            frequency,
            scheduled_days,
            created_on,
            is_active: true,
        })
    }

    /// Create an item from existing data (used when loading from database)
    pub fn from_existing(
        id: TrackableId,
        name: String,
        kind: ItemKind,
        frequency: FrequencyPolicy,
        scheduled_days: ScheduledDays,
        created_on: DateKey,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            frequency,
            scheduled_days,
            created_on,
            is_active,
        }
    }

    /// Update the item's properties with validation
    ///
    /// Nothing is applied unless every new value is valid.
    pub fn update(
        &mut self,
        name: Option<String>,
        frequency: Option<FrequencyPolicy>,
        scheduled_days: Option<ScheduledDays>,
        is_active: Option<bool>,
    ) -> Result<(), DomainError> {
        let name = name.map(|n| Self::validate_name(&n)).transpose()?;
        if let Some(new_frequency) = frequency {
            Self::validate_frequency_for_kind(self.kind, new_frequency)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_frequency) = frequency {
            self.frequency = new_frequency;
        }
        if let Some(new_schedule) = scheduled_days {
            self.scheduled_days = new_schedule;
        }
        if let Some(new_is_active) = is_active {
            self.is_active = new_is_active;
        }

        Ok(())
    }

    /// Whether the item is due on the given day
    pub fn is_due_on(&self, date: DateKey) -> bool {
        self.frequency != FrequencyPolicy::AsNeeded && self.scheduled_days.is_due(date)
    }

    /// Whether the period containing `today` is satisfied
    pub fn is_complete_for_period(&self, log: &CompletionLog, today: DateKey) -> bool {
        StreakEngine::is_complete_for_period(log, self.frequency, today)
    }

    /// Current streak, honouring the weekday schedule when there is one
    pub fn current_streak(&self, log: &CompletionLog, reference: DateKey) -> u32 {
        StreakEngine::current_streak_on_schedule(log, &self.scheduled_days, reference)
    }

    pub fn stats(&self, record: &CompletionRecord, reference: DateKey) -> StreakStats {
        StreakStats::fold(record.best_streak, self.current_streak(&record.log, reference))
    }

    /// Toggle `date` and fold the resulting streak into the best streak
    ///
    /// The streak is measured as of `today`, whichever day was toggled. The
    /// returned record is what the caller persists.
    pub fn apply_toggle(
        &self,
        record: &CompletionRecord,
        date: DateKey,
        today: DateKey,
    ) -> CompletionRecord {
        let log = StreakEngine::toggle(&record.log, date);
        let stats = StreakStats::fold(record.best_streak, self.current_streak(&log, today));
        CompletionRecord::new(log, stats.best_streak)
    }

    pub fn week_grid(&self, log: &CompletionLog, reference: DateKey) -> WeekCompletionGrid {
        StreakEngine::week_grid(log, self.created_on, reference)
    }

    /// Everything a status screen needs about this item as of `today`
    pub fn summarize(&self, record: &CompletionRecord, today: DateKey) -> ItemSummary {
        let stats = self.stats(record, today);
        ItemSummary {
            item_id: self.id.to_string(),
            name: self.name.clone(),
            kind: self.kind,
            frequency: self.frequency,
            is_due_today: self.is_due_on(today),
            is_complete: self.is_complete_for_period(&record.log, today),
            current_streak: stats.current_streak,
            best_streak: stats.best_streak,
            total_completions: record.log.len() as u32,
            last_completed: record.log.latest(),
            week: self.week_grid(&record.log, today),
            message: stats.motivational_message(),
        }
    }

    // Validation helper methods

    /// Validate item name according to business rules, returning it trimmed
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidItemName(
                "Item name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidItemName(format!(
                "Item name cannot be longer than {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(trimmed.to_string())
    }

    fn validate_frequency_for_kind(
        kind: ItemKind,
        frequency: FrequencyPolicy,
    ) -> Result<(), DomainError> {
        if kind == ItemKind::Habit && frequency != FrequencyPolicy::Daily {
            return Err(DomainError::InvalidFrequency(format!(
                "habits are tracked daily (use scheduled days to skip weekdays), got '{}'",
                frequency
            )));
        }
        Ok(())
    }
}

/// Derived view of one item for status output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub item_id: String,
    pub name: String,
    pub kind: ItemKind,
    pub frequency: FrequencyPolicy,
    pub is_due_today: bool,
    pub is_complete: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_completions: u32,
    pub last_completed: Option<DateKey>,
    pub week: WeekCompletionGrid,
    pub message: String,
}
