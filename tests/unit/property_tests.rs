/// Property-based tests for the streak engine
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use streak_tracker_mcp::*;

fn base() -> DateKey {
    DateKey::from_ymd(2024, 1, 1).unwrap()
}

/// A log of days drawn from the first ~two months of 2024
fn arb_log() -> impl Strategy<Value = CompletionLog> {
    btree_set(0i64..60, 0..40)
        .prop_map(|offsets| offsets.into_iter().map(|o| base().shift_days(o)).collect())
}

fn arb_date() -> impl Strategy<Value = DateKey> {
    (0i64..60).prop_map(|o| base().shift_days(o))
}

proptest! {
    #[test]
    fn toggle_twice_is_identity(log in arb_log(), date in arb_date()) {
        let twice = StreakEngine::toggle(&StreakEngine::toggle(&log, date), date);
        prop_assert_eq!(twice, log);
    }

    #[test]
    fn consecutive_days_give_their_length(n in 1i64..60, reference in arb_date()) {
        let log: CompletionLog = (0..n).map(|o| reference.shift_days(-o)).collect();
        prop_assert_eq!(StreakEngine::current_streak(&log, reference), n as u32);
    }

    #[test]
    fn gap_before_reference_breaks_streak(log in arb_log(), reference in arb_date()) {
        let mut log = log;
        if log.contains(reference.previous_day()) {
            log = log.toggled(reference.previous_day());
        }

        let expected = if log.contains(reference) { 1 } else { 0 };
        prop_assert_eq!(StreakEngine::current_streak(&log, reference), expected);
    }

    #[test]
    fn best_streak_never_decreases(toggles in vec(0i64..30, 1..60)) {
        let item = TrackableItem::new(
            "Meditate".to_string(),
            ItemKind::Habit,
            None,
            ScheduledDays::every_day(),
            base(),
        )
        .unwrap();
        let today = base().shift_days(29);

        let mut record = CompletionRecord::default();
        for offset in toggles {
            let next = item.apply_toggle(&record, base().shift_days(offset), today);
            prop_assert!(next.best_streak >= record.best_streak);
            prop_assert!(next.best_streak >= item.current_streak(&next.log, today));
            record = next;
        }
    }

    #[test]
    fn as_needed_is_never_complete(log in arb_log(), today in arb_date()) {
        prop_assert!(!StreakEngine::is_complete_for_period(&log, FrequencyPolicy::AsNeeded, today));
    }

    #[test]
    fn weekly_matches_any_day_in_monday_week(log in arb_log(), today in arb_date()) {
        let start = today.week_start();
        let any_this_week = (0..7).any(|o| log.contains(start.shift_days(o)));
        prop_assert_eq!(
            StreakEngine::is_complete_for_period(&log, FrequencyPolicy::Weekly, today),
            any_this_week
        );
    }

    #[test]
    fn week_grid_is_seven_ascending_days(log in arb_log(), reference in arb_date(), created in arb_date()) {
        let grid = StreakEngine::week_grid(&log, created, reference);
        prop_assert_eq!(grid.len(), 7);
        prop_assert_eq!(grid[6].date_key, reference);
        for pair in grid.windows(2) {
            prop_assert_eq!(pair[0].date_key.next_day(), pair[1].date_key);
        }
        for day in &grid {
            prop_assert_eq!(day.completed, log.contains(day.date_key));
        }
    }

    #[test]
    fn scheduled_streak_never_exceeds_longest_scheduled_run(
        log in arb_log(),
        reference in arb_date(),
        days in btree_set(0u8..7, 0..7),
    ) {
        let days: Vec<u8> = days.into_iter().collect();
        let schedule = ScheduledDays::from_weekdays(&days).unwrap();

        let current = StreakEngine::current_streak_on_schedule(&log, &schedule, reference);
        prop_assert!(current <= StreakEngine::longest_run_on_schedule(&log, &schedule));

        let record = CompletionRecord::new(log.clone(), 0).reconciled(&schedule);
        prop_assert_eq!(record.best_streak, StreakEngine::longest_run_on_schedule(&log, &schedule));
    }

    #[test]
    fn reconciled_best_covers_longest_run(log in arb_log(), stored in 0u32..10) {
        let record = CompletionRecord::new(log.clone(), stored).reconciled(&ScheduledDays::every_day());
        prop_assert!(record.best_streak >= stored);
        prop_assert!(record.best_streak >= StreakEngine::longest_run(&log));
    }
}
