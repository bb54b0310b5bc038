/// Streak calculation and tracking functionality
///
/// Everything here is a pure function of its arguments: completion logs go
/// in, derived statistics come out. There is one notion of "today" (the
/// local calendar day from `today_key`) and one streak rule shared by every
/// kind of item.
///
/// Streak rule: when the reference day is not logged yet, the walk starts
/// from the day before, so a perfect streak still reads correctly before the
/// user has acted today. From there it counts consecutive logged days
/// backwards and stops at the first gap.

use serde::{Deserialize, Serialize};

use crate::domain::{CompletionLog, DateKey, FrequencyPolicy, ScheduledDays};

/// Today's date key in the device's local time zone
pub fn today_key() -> DateKey {
    DateKey::today()
}

/// Number of days shown in the week grid
pub const WEEK_GRID_DAYS: i64 = 7;

/// The pure streak engine
///
/// A namespace for the streak calculations; it holds no state.
pub struct StreakEngine;

impl StreakEngine {
    /// Whether the period containing `today` is already satisfied
    pub fn is_complete_for_period(
        log: &CompletionLog,
        policy: FrequencyPolicy,
        today: DateKey,
    ) -> bool {
        match policy {
            // One completion covers both doses of a twice-daily item
            FrequencyPolicy::Daily | FrequencyPolicy::TwiceDaily => log.contains(today),
            FrequencyPolicy::Weekly => log.any_between(today.week_start(), today.week_end()),
            FrequencyPolicy::AsNeeded => false,
        }
    }

    /// Flip one day in or out of the log
    pub fn toggle(log: &CompletionLog, date: DateKey) -> CompletionLog {
        log.toggled(date)
    }

    /// Consecutive logged days ending at `reference` (or the day before it)
    pub fn current_streak(log: &CompletionLog, reference: DateKey) -> u32 {
        let Some(earliest) = log.earliest() else {
            return 0;
        };

        let mut checking = if log.contains(reference) {
            reference
        } else {
            reference.previous_day()
        };

        let mut streak = 0;
        while checking >= earliest && log.contains(checking) {
            streak += 1;
            checking = checking.previous_day();
        }
        streak
    }

    /// Like `current_streak`, but only due days of `schedule` count
    ///
    /// Days off the schedule are stepped over: they neither extend nor break
    /// the streak. The grace step only applies when `reference` itself is a
    /// due day that has not been logged yet.
    pub fn current_streak_on_schedule(
        log: &CompletionLog,
        schedule: &ScheduledDays,
        reference: DateKey,
    ) -> u32 {
        if schedule.is_every_day() {
            return Self::current_streak(log, reference);
        }

        let Some(earliest) = log.earliest() else {
            return 0;
        };

        let mut checking = if schedule.is_due(reference) && !log.contains(reference) {
            schedule.latest_due_on_or_before(reference.previous_day())
        } else {
            schedule.latest_due_on_or_before(reference)
        };

        let mut streak = 0;
        while checking >= earliest && log.contains(checking) {
            streak += 1;
            checking = schedule.latest_due_on_or_before(checking.previous_day());
        }
        streak
    }

    /// The running best: never lower than what was stored before
    pub fn best_streak(previous_best: u32, current_streak: u32) -> u32 {
        previous_best.max(current_streak)
    }

    /// Longest run of consecutive days anywhere in the log
    pub fn longest_run(log: &CompletionLog) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<DateKey> = None;

        for date in log.iter() {
            run = match previous {
                Some(prev) if prev.next_day() == date => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(date);
        }

        longest
    }

    /// Longest run of consecutive due days of `schedule` anywhere in the log
    ///
    /// Logged days off the schedule are ignored, so this is measured in the
    /// same unit as `current_streak_on_schedule`.
    pub fn longest_run_on_schedule(log: &CompletionLog, schedule: &ScheduledDays) -> u32 {
        if schedule.is_every_day() {
            return Self::longest_run(log);
        }

        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<DateKey> = None;

        for date in log.iter().filter(|d| schedule.is_due(*d)) {
            let expected_previous = schedule.latest_due_on_or_before(date.previous_day());
            run = match previous {
                Some(prev) if prev == expected_previous => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(date);
        }

        longest
    }

    /// The trailing seven days ending at `reference`, oldest first
    pub fn week_grid(
        log: &CompletionLog,
        item_created_on: DateKey,
        reference: DateKey,
    ) -> WeekCompletionGrid {
        (0..WEEK_GRID_DAYS)
            .rev()
            .map(|offset| {
                let date = reference.shift_days(-offset);
                WeekDay {
                    date_key: date,
                    weekday_letter: date.weekday_letter(),
                    is_today: date == reference,
                    completed: log.contains(date),
                    is_before_item_creation: date < item_created_on,
                }
            })
            .collect()
    }
}

/// Derived streak figures for one item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    /// Consecutive days up to the reference day
    pub current_streak: u32,
    /// Best streak ever recorded; never decreases
    pub best_streak: u32,
}

impl StreakStats {
    /// Recompute after a mutation, folding the new current streak into the best
    pub fn after_toggle(previous_best: u32, log: &CompletionLog, reference: DateKey) -> Self {
        Self::fold(previous_best, StreakEngine::current_streak(log, reference))
    }

    /// Pair a freshly computed current streak with the stored best
    pub fn fold(previous_best: u32, current_streak: u32) -> Self {
        Self {
            current_streak,
            best_streak: StreakEngine::best_streak(previous_best, current_streak),
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 if self.best_streak > 0 => format!(
                "Fresh start! Your best is {} days - time to chase it again.",
                self.best_streak
            ),
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", self.current_streak),
            7..=13 => format!("Excellent! {} days strong. You're in the groove now!", self.current_streak),
            14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", self.current_streak),
            30..=99 => format!("Incredible! {} days of consistency. You're a habit master!", self.current_streak),
            _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", self.current_streak),
        }
    }
}

/// One cell of the week grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDay {
    pub date_key: DateKey,
    pub weekday_letter: char,
    pub is_today: bool,
    pub completed: bool,
    /// Lets the UI grey out days before the item existed instead of
    /// showing them as missed
    pub is_before_item_creation: bool,
}

/// Seven `WeekDay`s in ascending date order
pub type WeekCompletionGrid = Vec<WeekDay>;

/// Render a grid as a compact line such as `M✓ T✓ W· T· F✓ S· S○`
pub fn render_week_grid(grid: &[WeekDay]) -> String {
    grid.iter()
        .map(|day| {
            let mark = if day.completed {
                '✓'
            } else if day.is_before_item_creation {
                ' '
            } else if day.is_today {
                '○'
            } else {
                '·'
            };
            format!("{}{}", day.weekday_letter, mark)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
