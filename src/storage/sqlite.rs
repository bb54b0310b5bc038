/// SQLite implementation of the storage interfaces
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving items, completion records and the water log. It handles
/// all SQL queries and data conversion.

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{
    CompletionLog, CompletionRecord, DateKey, FrequencyPolicy, ItemKind, ScheduledDays,
    TrackableId, TrackableItem, WaterLog,
};
use crate::storage::{migrations, CompletionRepository, StorageError, TrackerStorage};

const ITEM_COLUMNS: &str = "id, name, kind, frequency, scheduled_days, created_on, is_active";

const WATER_TARGET_KEY: &str = "water_target_ml";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// both storage traits on top of it.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (used by tests)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions and best streaks cascade on item deletion
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Map a `trackables` row selected with `ITEM_COLUMNS`
    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<TrackableItem> {
        let id_str: String = row.get(0)?;
        let id = TrackableId::from_string(&id_str).map_err(|e| conversion_error(0, e))?;

        let kind_str: String = row.get(2)?;
        let kind: ItemKind = kind_str.parse().map_err(|e| conversion_error(2, e))?;

        let frequency_str: String = row.get(3)?;
        let frequency: FrequencyPolicy = frequency_str.parse().map_err(|e| conversion_error(3, e))?;

        let schedule_json: String = row.get(4)?;
        let scheduled_days: ScheduledDays =
            serde_json::from_str(&schedule_json).map_err(|e| conversion_error(4, e))?;

        let created_on_str: String = row.get(5)?;
        let created_on: DateKey = created_on_str.parse().map_err(|e| conversion_error(5, e))?;

        Ok(TrackableItem::from_existing(
            id,
            row.get(1)?, // name
            kind,
            frequency,
            scheduled_days,
            created_on,
            row.get(6)?, // is_active
        ))
    }

    fn ensure_item_exists(&self, item_id: &TrackableId) -> Result<(), StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM trackables WHERE id = ?1)",
            params![item_id.to_string()],
            |row| row.get(0),
        )?;

        if !exists {
            return Err(StorageError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        }
        Ok(())
    }
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

impl TrackerStorage for SqliteStorage {
    fn create_item(&self, item: &TrackableItem) -> Result<(), StorageError> {
        let schedule_json = serde_json::to_string(&item.scheduled_days)?;

        self.conn.execute(
            "INSERT INTO trackables (
                id, name, kind, frequency, scheduled_days, created_on, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.id.to_string(),
                item.name,
                item.kind.as_str(),
                item.frequency.as_str(),
                schedule_json,
                item.created_on.to_string(),
                item.is_active
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::DuplicateItem {
                    item_id: item.id.to_string(),
                }
            }
            other => StorageError::Query(other),
        })?;

        tracing::debug!("Created {}: {} ({})", item.kind, item.name, item.id);
        Ok(())
    }

    fn get_item(&self, item_id: &TrackableId) -> Result<TrackableItem, StorageError> {
        let sql = format!("SELECT {} FROM trackables WHERE id = ?1", ITEM_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, params![item_id.to_string()], Self::row_to_item);

        match result {
            Ok(item) => Ok(item),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::ItemNotFound {
                item_id: item_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_item(&self, item: &TrackableItem) -> Result<(), StorageError> {
        let schedule_json = serde_json::to_string(&item.scheduled_days)?;

        let rows_affected = self.conn.execute(
            "UPDATE trackables SET
                name = ?2,
                frequency = ?3,
                scheduled_days = ?4,
                is_active = ?5
             WHERE id = ?1",
            params![
                item.id.to_string(),
                item.name,
                item.frequency.as_str(),
                schedule_json,
                item.is_active
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::ItemNotFound {
                item_id: item.id.to_string(),
            });
        }

        tracing::debug!("Updated {}: {} ({})", item.kind, item.name, item.id);
        Ok(())
    }

    fn delete_item(&self, item_id: &TrackableId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM trackables WHERE id = ?1",
            params![item_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        }

        tracing::debug!("Deleted item and its completions: {}", item_id);
        Ok(())
    }

    fn list_items(
        &self,
        kind: Option<ItemKind>,
        active_only: bool,
    ) -> Result<Vec<TrackableItem>, StorageError> {
        let mut sql = format!("SELECT {} FROM trackables WHERE 1 = 1", ITEM_COLUMNS);
        let mut args: Vec<&str> = Vec::new();

        if let Some(kind) = kind {
            sql.push_str(" AND kind = ?1");
            args.push(kind.as_str());
        }
        if active_only {
            sql.push_str(" AND is_active = 1");
        }
        sql.push_str(" ORDER BY created_on ASC, name ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(args), Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn load_water_log(&self) -> Result<WaterLog, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date_key, amount_ml FROM water_intake ORDER BY date_key")?;

        let rows = stmt.query_map([], |row| {
            let date_str: String = row.get(0)?;
            let date: DateKey = date_str.parse().map_err(|e| conversion_error(0, e))?;
            let amount: u32 = row.get(1)?;
            Ok((date, amount))
        })?;

        let mut log = WaterLog::new();
        for row in rows {
            let (date, amount) = row?;
            log.set_total(date, amount);
        }
        Ok(log)
    }

    fn save_water_log(&self, log: &WaterLog) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM water_intake", [])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO water_intake (date_key, amount_ml) VALUES (?1, ?2)")?;
            for (date, amount) in log.days() {
                insert.execute(params![date.to_string(), amount])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Saved water log with {} days", log.len());
        Ok(())
    }

    fn water_target(&self) -> Result<Option<u32>, StorageError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![WATER_TARGET_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(value) => value.parse::<u32>().map(Some).map_err(|e| {
                StorageError::Query(conversion_error(0, e))
            }),
            None => Ok(None),
        }
    }

    fn set_water_target(&self, target_ml: u32) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![WATER_TARGET_KEY, target_ml.to_string()],
        )?;
        Ok(())
    }
}

impl CompletionRepository for SqliteStorage {
    fn load(&self, item_id: &TrackableId) -> Result<CompletionRecord, StorageError> {
        let id = item_id.to_string();

        let schedule_json: String = self
            .conn
            .query_row(
                "SELECT scheduled_days FROM trackables WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StorageError::ItemNotFound { item_id: id.clone() })?;
        let schedule: ScheduledDays = serde_json::from_str(&schedule_json)?;

        let mut stmt = self
            .conn
            .prepare("SELECT date_key FROM completions WHERE item_id = ?1 ORDER BY date_key")?;
        let log = stmt
            .query_map(params![id], |row| {
                let date_str: String = row.get(0)?;
                date_str.parse::<DateKey>().map_err(|e| conversion_error(0, e))
            })?
            .collect::<Result<CompletionLog, _>>()?;

        let best_streak: u32 = self
            .conn
            .query_row(
                "SELECT best_streak FROM item_streaks WHERE item_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);

        Ok(CompletionRecord::new(log, best_streak).reconciled(&schedule))
    }

    fn save(&self, item_id: &TrackableId, record: &CompletionRecord) -> Result<(), StorageError> {
        self.ensure_item_exists(item_id)?;
        let id = item_id.to_string();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM completions WHERE item_id = ?1", params![id])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO completions (item_id, date_key) VALUES (?1, ?2)")?;
            for date in record.log.iter() {
                insert.execute(params![id, date.to_string()])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO item_streaks (item_id, best_streak, updated_at)
             VALUES (?1, ?2, ?3)",
            params![id, record.best_streak, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        tracing::debug!(
            "Saved {} completions for item {} (best streak {})",
            record.log.len(),
            item_id,
            record.best_streak
        );
        Ok(())
    }
}
