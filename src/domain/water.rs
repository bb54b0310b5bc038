/// Water-intake tracking
///
/// Water goals work like other items but over a quantity: each local day
/// accumulates millilitres, and the day is complete once the total reaches
/// the target. Days are keyed with the same `DateKey` contract as
/// completion logs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, DomainError};

/// How many of the most recent days the tracker keeps
pub const WATER_RETENTION_DAYS: usize = 30;

/// Daily target used when none has been configured
pub const DEFAULT_WATER_TARGET_ML: u32 = 2000;

/// Largest single intake accepted
pub const MAX_INTAKE_ML: u32 = 10_000;

/// Millilitres drunk per local day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaterLog {
    days: BTreeMap<DateKey, u32>,
}

impl WaterLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intake to a day and return the day's new total
    pub fn add_intake(&mut self, date: DateKey, amount_ml: u32) -> Result<u32, DomainError> {
        if amount_ml == 0 || amount_ml > MAX_INTAKE_ML {
            return Err(DomainError::InvalidValue {
                message: format!("Intake must be between 1 and {} ml", MAX_INTAKE_ML),
            });
        }

        let total = self.days.entry(date).or_insert(0);
        *total = total.saturating_add(amount_ml);
        Ok(*total)
    }

    /// Set a day's total directly (used when loading from storage)
    pub fn set_total(&mut self, date: DateKey, total_ml: u32) {
        self.days.insert(date, total_ml);
    }

    pub fn total_on(&self, date: DateKey) -> u32 {
        self.days.get(&date).copied().unwrap_or(0)
    }

    /// Whether the day's total reaches a non-zero target
    pub fn is_goal_met(&self, date: DateKey, target_ml: u32) -> bool {
        target_ml > 0 && self.total_on(date) >= target_ml
    }

    /// Drop everything but the `keep` most recent days
    pub fn retain_recent(&mut self, keep: usize) {
        while self.days.len() > keep {
            self.days.pop_first();
        }
    }

    /// Days with their totals, oldest first
    pub fn days(&self) -> impl Iterator<Item = (DateKey, u32)> + '_ {
        self.days.iter().map(|(date, total)| (*date, *total))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn progress(&self, date: DateKey, target_ml: u32) -> WaterProgress {
        let total_ml = self.total_on(date);
        WaterProgress {
            date,
            total_ml,
            target_ml,
            goal_met: self.is_goal_met(date, target_ml),
            remaining_ml: target_ml.saturating_sub(total_ml),
        }
    }
}

/// One day's intake against the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaterProgress {
    pub date: DateKey,
    pub total_ml: u32,
    pub target_ml: u32,
    pub goal_met: bool,
    pub remaining_ml: u32,
}
