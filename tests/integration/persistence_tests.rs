/// Data written through SQLite storage survives reopening the database
use streak_tracker_mcp::*;
use tempfile::TempDir;

fn key(s: &str) -> DateKey {
    s.parse().expect("valid date key")
}

fn daily_habit(name: &str, created_on: DateKey) -> TrackableItem {
    TrackableItem::new(
        name.to_string(),
        ItemKind::Habit,
        None,
        ScheduledDays::every_day(),
        created_on,
    )
    .expect("valid habit")
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_record_survives_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("streaks.db");
        let item = daily_habit("Journal", key("2024-06-01"));

        {
            let storage = SqliteStorage::new(db_path.clone()).expect("Failed to open storage");
            storage.create_item(&item).unwrap();

            let log: CompletionLog = ["2024-06-01", "2024-06-02"].iter().map(|d| key(d)).collect();
            storage.save(&item.id, &CompletionRecord::new(log, 5)).unwrap();
        }

        let storage = SqliteStorage::new(db_path).expect("Failed to reopen storage");
        let loaded = storage.get_item(&item.id).unwrap();
        assert_eq!(loaded, item);

        let record = storage.load(&item.id).unwrap();
        assert_eq!(record.log.len(), 2);
        assert!(record.log.contains(key("2024-06-02")));
        assert_eq!(record.best_streak, 5);
    }

    #[test]
    fn test_delete_removes_history() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("streaks.db")).unwrap();
        let item = daily_habit("Walk", key("2024-06-01"));
        storage.create_item(&item).unwrap();
        storage
            .save(&item.id, &CompletionRecord::new([key("2024-06-01")].into_iter().collect(), 1))
            .unwrap();

        storage.delete_item(&item.id).unwrap();

        assert!(matches!(
            storage.get_item(&item.id),
            Err(StorageError::ItemNotFound { .. })
        ));
        assert!(matches!(
            storage.load(&item.id),
            Err(StorageError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_water_log_and_target_survive_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("streaks.db");
        let today = key("2024-06-03");

        {
            let storage = SqliteStorage::new(db_path.clone()).unwrap();
            let mut log = WaterLog::new();
            log.add_intake(today, 750).unwrap();
            log.add_intake(today, 250).unwrap();
            storage.save_water_log(&log).unwrap();
            storage.set_water_target(2500).unwrap();
        }

        let storage = SqliteStorage::new(db_path).unwrap();
        assert_eq!(storage.load_water_log().unwrap().total_on(today), 1000);
        assert_eq!(storage.water_target().unwrap(), Some(2500));
    }

    #[tokio::test]
    async fn test_server_opens_existing_database() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("streaks.db");

        let first = StreakTrackerServer::new(db_path.clone(), TrackerConfig::default())
            .await
            .expect("Failed to create first server");
        first
            .storage()
            .create_item(&daily_habit("Floss", key("2024-06-01")))
            .unwrap();
        drop(first);

        let config = TrackerConfig { water_target_ml: 3000 };
        let second = StreakTrackerServer::new(db_path, config.clone())
            .await
            .expect("Failed to create second server");
        assert_eq!(second.storage().list_items(None, false).unwrap().len(), 1);
        assert_eq!(second.config(), &config);
    }

    #[test]
    fn test_memory_and_sqlite_agree() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let sqlite = SqliteStorage::new(dir.path().join("streaks.db")).unwrap();
        let memory = MemoryStorage::new();
        let item = daily_habit("Plank", key("2024-06-01"));
        let today = key("2024-06-05");

        fn run<S: TrackerStorage + CompletionRepository>(
            storage: &S,
            item: &TrackableItem,
            today: DateKey,
        ) -> CompletionRecord {
            storage.create_item(item).unwrap();
            for day in ["2024-06-02", "2024-06-03", "2024-06-04", "2024-06-03"] {
                let record = storage.load(&item.id).unwrap();
                let updated = item.apply_toggle(&record, day.parse().unwrap(), today);
                storage.save(&item.id, &updated).unwrap();
            }
            storage.load(&item.id).unwrap()
        }

        assert_eq!(run(&sqlite, &item, today), run(&memory, &item, today));
    }
}
