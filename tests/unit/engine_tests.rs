/// Streak engine behaviour through the public API
use chrono::{FixedOffset, TimeZone};
use streak_tracker_mcp::*;

fn key(s: &str) -> DateKey {
    s.parse().expect("valid date key")
}

fn log_of(days: &[&str]) -> CompletionLog {
    days.iter().map(|d| key(d)).collect()
}

#[cfg(test)]
mod streak_engine_tests {
    use super::*;

    #[test]
    fn test_three_day_streak_then_toggle_today_off() {
        let today = key("2024-06-03");
        let log = log_of(&["2024-06-01", "2024-06-02", "2024-06-03"]);
        assert_eq!(StreakEngine::current_streak(&log, today), 3);

        let log = StreakEngine::toggle(&log, today);
        assert_eq!(log, log_of(&["2024-06-01", "2024-06-02"]));

        // Today not logged yet: counting starts from yesterday
        assert_eq!(StreakEngine::current_streak(&log, today), 2);
    }

    #[test]
    fn test_two_day_gap_ends_streak() {
        let log = log_of(&["2024-06-01", "2024-06-02"]);
        assert_eq!(StreakEngine::current_streak(&log, key("2024-06-04")), 0);
    }

    #[test]
    fn test_weekly_is_satisfied_by_any_day_of_the_week() {
        let sunday = key("2024-06-09");
        let log = log_of(&["2024-06-03"]);
        assert!(StreakEngine::is_complete_for_period(&log, FrequencyPolicy::Weekly, sunday));

        let monday = key("2024-06-03");
        let previous_week_only = log_of(&["2024-06-02"]);
        assert!(!StreakEngine::is_complete_for_period(
            &previous_week_only,
            FrequencyPolicy::Weekly,
            monday
        ));
    }

    #[test]
    fn test_daily_and_twice_daily_need_today() {
        let today = key("2024-06-03");
        let log = log_of(&["2024-06-02"]);
        assert!(!StreakEngine::is_complete_for_period(&log, FrequencyPolicy::Daily, today));
        assert!(!StreakEngine::is_complete_for_period(&log, FrequencyPolicy::TwiceDaily, today));

        let log = StreakEngine::toggle(&log, today);
        assert!(StreakEngine::is_complete_for_period(&log, FrequencyPolicy::Daily, today));
        assert!(StreakEngine::is_complete_for_period(&log, FrequencyPolicy::TwiceDaily, today));
    }

    #[test]
    fn test_scheduled_days_are_skipped_over() {
        // Mon/Wed/Fri, checked on the following Sunday
        let schedule = ScheduledDays::from_weekdays(&[1, 3, 5]).unwrap();
        let log = log_of(&["2024-06-03", "2024-06-05", "2024-06-07"]);
        let sunday = key("2024-06-09");

        assert_eq!(StreakEngine::current_streak_on_schedule(&log, &schedule, sunday), 3);
        assert_eq!(StreakEngine::current_streak(&log, sunday), 0);

        // Missing Wednesday breaks it
        let log = log_of(&["2024-06-03", "2024-06-07"]);
        assert_eq!(StreakEngine::current_streak_on_schedule(&log, &schedule, sunday), 1);
    }

    #[test]
    fn test_week_grid_marks_days_before_creation() {
        let today = key("2024-06-09");
        let created = key("2024-06-06");
        let log = log_of(&["2024-06-06", "2024-06-08"]);

        let grid = StreakEngine::week_grid(&log, created, today);
        let letters: String = grid.iter().map(|d| d.weekday_letter).collect();
        assert_eq!(letters, "MTWTFSS");
        assert_eq!(grid.iter().filter(|d| d.is_before_item_creation).count(), 3);
        assert!(grid[6].is_today);
        assert_eq!(render_week_grid(&grid), "M  T  W  T✓ F· S✓ S○");
    }

    #[test]
    fn test_today_key_uses_local_calendar_day() {
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        let late_evening = pacific.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap();

        assert_eq!(DateKey::today_at(&late_evening).to_string(), "2024-06-01");
    }

    #[test]
    fn test_best_streak_survives_a_broken_run() {
        let item = TrackableItem::new(
            "Stretch".to_string(),
            ItemKind::Habit,
            None,
            ScheduledDays::every_day(),
            key("2024-06-01"),
        )
        .unwrap();

        let mut record = CompletionRecord::default();
        for day in ["2024-06-01", "2024-06-02", "2024-06-03"] {
            record = item.apply_toggle(&record, key(day), key(day));
        }
        assert_eq!(record.best_streak, 3);

        let later = key("2024-06-10");
        let stats = item.stats(&record, later);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.best_streak, 3);
        assert!(stats.motivational_message().starts_with("Fresh start"));
    }
}
