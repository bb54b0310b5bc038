/// Core types and enums used throughout the domain layer
///
/// This module defines identifiers, the kind of a trackable item, the closed
/// frequency policy, and weekday schedules. These are shared by the item
/// entity, the streak engine, and the storage layer.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DateKey, DomainError};

/// Unique identifier for a trackable item
///
/// This is a wrapper around UUID to provide type safety - you can't
/// accidentally pass some other UUID where an item ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackableId(pub Uuid);

impl TrackableId {
    /// Generate a new random item ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an item ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for TrackableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What sort of thing is being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A daily habit, optionally restricted to some weekdays
    Habit,
    /// A supplement or medication with its own frequency policy
    Supplement,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Habit => "habit",
            ItemKind::Supplement => "supplement",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "habit" => Ok(ItemKind::Habit),
            "supplement" => Ok(ItemKind::Supplement),
            other => Err(DomainError::Validation {
                message: format!("Invalid item kind '{}'. Valid options: habit, supplement", other),
            }),
        }
    }
}

/// What counts as "done" for one period of an item
///
/// Items with no stored policy are `Daily`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyPolicy {
    /// Once per calendar day
    #[default]
    Daily,
    /// Twice per day; a single completion still satisfies the day
    TwiceDaily,
    /// Once per Monday-Sunday week
    Weekly,
    /// No period at all, so never "complete"
    AsNeeded,
}

impl FrequencyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyPolicy::Daily => "daily",
            FrequencyPolicy::TwiceDaily => "twice_daily",
            FrequencyPolicy::Weekly => "weekly",
            FrequencyPolicy::AsNeeded => "as_needed",
        }
    }

    /// Human-readable label for tool output
    pub fn display_name(&self) -> &'static str {
        match self {
            FrequencyPolicy::Daily => "Daily",
            FrequencyPolicy::TwiceDaily => "Twice daily",
            FrequencyPolicy::Weekly => "Weekly",
            FrequencyPolicy::AsNeeded => "As needed",
        }
    }
}

impl fmt::Display for FrequencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "daily" => Ok(FrequencyPolicy::Daily),
            "twice_daily" => Ok(FrequencyPolicy::TwiceDaily),
            "weekly" => Ok(FrequencyPolicy::Weekly),
            "as_needed" => Ok(FrequencyPolicy::AsNeeded),
            other => Err(DomainError::InvalidFrequency(format!(
                "'{}'. Valid options: daily, twice_daily, weekly, as_needed",
                other
            ))),
        }
    }
}

/// Weekdays on which an item is due, numbered 0-6 with 0 = Sunday
///
/// An empty schedule means the item is due every day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ScheduledDays(BTreeSet<u8>);

impl ScheduledDays {
    /// Due every day
    pub fn every_day() -> Self {
        Self::default()
    }

    /// Build a schedule from weekday numbers, rejecting anything outside 0-6
    pub fn from_weekdays(days: &[u8]) -> Result<Self, DomainError> {
        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(DomainError::InvalidSchedule(format!(
                "Weekday numbers must be 0-6 (0 = Sunday), got {}",
                bad
            )));
        }

        let set: BTreeSet<u8> = days.iter().copied().collect();
        // All seven days is the same as no restriction
        if set.len() == 7 {
            return Ok(Self::every_day());
        }
        Ok(Self(set))
    }

    pub fn is_every_day(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the item is due on the given day
    pub fn is_due(&self, date: DateKey) -> bool {
        self.is_every_day() || self.0.contains(&date.weekday_number())
    }

    /// The latest due day on or before `date`
    pub fn latest_due_on_or_before(&self, date: DateKey) -> DateKey {
        let mut checking = date;
        // A non-empty schedule has a due day within any 7-day window
        for _ in 0..7 {
            if self.is_due(checking) {
                return checking;
            }
            checking = checking.previous_day();
        }
        checking
    }

    pub fn weekdays(&self) -> Vec<u8> {
        self.0.iter().copied().collect()
    }

    /// Short label such as "Mo We Fr", or "Every day"
    pub fn display(&self) -> String {
        const LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
        if self.is_every_day() {
            return "Every day".to_string();
        }
        self.0
            .iter()
            .map(|d| LABELS[*d as usize])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<Vec<u8>> for ScheduledDays {
    type Error = DomainError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_weekdays(&days)
    }
}

impl From<ScheduledDays> for Vec<u8> {
    fn from(schedule: ScheduledDays) -> Self {
        schedule.weekdays()
    }
}
