/// End-to-end tool flows over a SQLite database
use streak_tracker_mcp::*;
use tempfile::TempDir;

fn key(s: &str) -> DateKey {
    s.parse().expect("valid date key")
}

fn open(dir: &TempDir) -> SqliteStorage {
    SqliteStorage::new(dir.path().join("streaks.db")).expect("Failed to open storage")
}

fn toggle(storage: &SqliteStorage, item_id: &str, date: &str, today: DateKey) -> ToggleItemResponse {
    let params = ToggleItemParams {
        item_id: item_id.to_string(),
        date: Some(date.to_string()),
    };
    toggle_item(storage, params, today).expect("toggle succeeds")
}

#[cfg(test)]
mod tool_workflow_tests {
    use super::*;

    #[test]
    fn test_habit_week_flow() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let today = key("2024-06-03");

        let created = create_item(
            &storage,
            CreateItemParams {
                name: "  Morning run ".to_string(),
                kind: ItemKind::Habit,
                frequency: None,
                scheduled_days: None,
            },
            key("2024-06-01"),
        )
        .unwrap();
        let id = created.item_id;

        toggle(&storage, &id, "2024-06-01", today);
        toggle(&storage, &id, "2024-06-02", today);
        let on = toggle(&storage, &id, "2024-06-03", today);
        assert!(on.completed);
        assert!(on.is_complete_for_period);
        assert_eq!(on.current_streak, 3);
        assert_eq!(on.best_streak, 3);

        let off = toggle(&storage, &id, "2024-06-03", today);
        assert!(!off.completed);
        assert_eq!(off.current_streak, 2);
        assert_eq!(off.best_streak, 3);

        let status = get_item_status(
            &storage,
            StatusParams { item_id: Some(id.clone()) },
            today,
        )
        .unwrap();
        let summary = &status.items[0];
        assert_eq!(summary.name, "Morning run");
        assert!(summary.is_due_today);
        assert!(!summary.is_complete);
        assert_eq!(summary.total_completions, 2);
        assert_eq!(summary.last_completed, Some(key("2024-06-02")));
        assert_eq!(summary.week.len(), 7);
        assert!(status.summary.contains("0 of 1"));
    }

    #[test]
    fn test_scheduled_habit_best_streak_in_due_days() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let sunday = key("2024-06-09");

        let created = create_item(
            &storage,
            CreateItemParams {
                name: "Gym".to_string(),
                kind: ItemKind::Habit,
                frequency: None,
                scheduled_days: Some(vec![1, 3, 5]),
            },
            key("2024-06-03"),
        )
        .unwrap();

        // Logged on every day of the week, including the days off
        for day in 3..=9 {
            let date = format!("2024-06-0{}", day);
            toggle(&storage, &created.item_id, &date, key(&date));
        }

        let status = get_item_status(
            &storage,
            StatusParams { item_id: Some(created.item_id.clone()) },
            sunday,
        )
        .unwrap();
        assert_eq!(status.items[0].current_streak, 3);
        assert_eq!(status.items[0].best_streak, 3);
        assert_eq!(status.items[0].total_completions, 7);
    }

    #[test]
    fn test_weekly_supplement_and_as_needed() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let monday = key("2024-06-03");
        let friday = key("2024-06-07");

        let weekly = create_item(
            &storage,
            CreateItemParams {
                name: "Vitamin B12".to_string(),
                kind: ItemKind::Supplement,
                frequency: Some(FrequencyPolicy::Weekly),
                scheduled_days: None,
            },
            monday,
        )
        .unwrap();
        let as_needed = create_item(
            &storage,
            CreateItemParams {
                name: "Ibuprofen".to_string(),
                kind: ItemKind::Supplement,
                frequency: Some(FrequencyPolicy::AsNeeded),
                scheduled_days: None,
            },
            monday,
        )
        .unwrap();

        toggle(&storage, &weekly.item_id, "2024-06-04", friday);
        let taken = toggle(&storage, &as_needed.item_id, "2024-06-07", friday);
        assert!(taken.completed);
        assert!(!taken.is_complete_for_period);

        let status = get_item_status(&storage, StatusParams::default(), friday).unwrap();
        let weekly_summary = status.items.iter().find(|s| s.name == "Vitamin B12").unwrap();
        assert!(weekly_summary.is_complete);
        let as_needed_summary = status.items.iter().find(|s| s.name == "Ibuprofen").unwrap();
        assert!(!as_needed_summary.is_due_today);
        assert!(!as_needed_summary.is_complete);

        // The next week starts incomplete
        let next_monday = key("2024-06-10");
        let status = get_item_status(
            &storage,
            StatusParams { item_id: Some(weekly.item_id.clone()) },
            next_monday,
        )
        .unwrap();
        assert!(!status.items[0].is_complete);
    }

    #[test]
    fn test_invalid_requests_are_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let today = key("2024-06-03");

        let weekly_habit = create_item(
            &storage,
            CreateItemParams {
                name: "Long run".to_string(),
                kind: ItemKind::Habit,
                frequency: Some(FrequencyPolicy::Weekly),
                scheduled_days: None,
            },
            today,
        );
        assert!(matches!(
            weekly_habit,
            Err(ToolError::Domain(DomainError::InvalidFrequency(_)))
        ));

        let bad_schedule = create_item(
            &storage,
            CreateItemParams {
                name: "Yoga".to_string(),
                kind: ItemKind::Habit,
                frequency: None,
                scheduled_days: Some(vec![7]),
            },
            today,
        );
        assert!(matches!(
            bad_schedule,
            Err(ToolError::Domain(DomainError::InvalidSchedule(_)))
        ));

        let item = create_item(
            &storage,
            CreateItemParams {
                name: "Yoga".to_string(),
                kind: ItemKind::Habit,
                frequency: None,
                scheduled_days: None,
            },
            today,
        )
        .unwrap();

        for date in ["2024-06-04", "2024-6-3", "yesterday"] {
            let result = toggle_item(
                &storage,
                ToggleItemParams {
                    item_id: item.item_id.clone(),
                    date: Some(date.to_string()),
                },
                today,
            );
            assert!(
                matches!(result, Err(ToolError::Domain(DomainError::InvalidDate(_)))),
                "{} should be rejected",
                date
            );
        }

        let missing = toggle_item(
            &storage,
            ToggleItemParams { item_id: TrackableId::new().to_string(), date: None },
            today,
        );
        assert!(matches!(
            missing,
            Err(ToolError::Storage(StorageError::ItemNotFound { .. }))
        ));
    }

    #[test]
    fn test_update_pause_and_delete() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let today = key("2024-06-03");

        let item = create_item(
            &storage,
            CreateItemParams {
                name: "Omega 3".to_string(),
                kind: ItemKind::Supplement,
                frequency: None,
                scheduled_days: None,
            },
            today,
        )
        .unwrap();

        update_item(
            &storage,
            UpdateItemParams {
                item_id: item.item_id.clone(),
                name: Some("Fish oil".to_string()),
                frequency: Some(FrequencyPolicy::TwiceDaily),
                scheduled_days: Some(vec![1, 3, 5]),
                is_active: Some(false),
            },
        )
        .unwrap();

        let active = list_items(&storage, ListItemsParams::default(), today).unwrap();
        assert_eq!(active.total_items, 0);

        let all = list_items(
            &storage,
            ListItemsParams { kind: None, active_only: Some(false) },
            today,
        )
        .unwrap();
        let entry = &all.items[0];
        assert_eq!(entry.name, "Fish oil");
        assert_eq!(entry.frequency, FrequencyPolicy::TwiceDaily);
        assert_eq!(entry.schedule, "Mo We Fr");
        assert!(!entry.is_active);

        delete_item(&storage, DeleteItemParams { item_id: item.item_id.clone() }).unwrap();
        let after = list_items(
            &storage,
            ListItemsParams { kind: None, active_only: Some(false) },
            today,
        )
        .unwrap();
        assert!(after.items.is_empty());
    }

    #[test]
    fn test_water_rejects_out_of_range_intake() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let today = key("2024-06-03");

        for amount_ml in [0, MAX_INTAKE_ML + 1] {
            let result = log_water(
                &storage,
                WaterLogParams { amount_ml, date: None },
                today,
                DEFAULT_WATER_TARGET_ML,
            );
            assert!(matches!(result, Err(ToolError::Domain(_))));
        }

        let status = get_water_status(
            &storage,
            WaterStatusParams::default(),
            today,
            DEFAULT_WATER_TARGET_ML,
        )
        .unwrap();
        assert_eq!(status.progress.total_ml, 0);
        assert_eq!(status.progress.remaining_ml, DEFAULT_WATER_TARGET_ML);
    }
}
