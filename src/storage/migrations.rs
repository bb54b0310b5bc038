/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema v{} is newer than this build (v{})",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version, 0 for a fresh database
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get::<_, i32>(0),
    )?;

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: items, completion logs, best streaks, water
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS trackables (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            frequency TEXT NOT NULL DEFAULT 'daily',
            scheduled_days TEXT NOT NULL DEFAULT '[]',
            created_on TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE
        );

        -- One row per (item, local day); toggling inserts or deletes a row
        CREATE TABLE IF NOT EXISTS completions (
            item_id TEXT NOT NULL,
            date_key TEXT NOT NULL,
            PRIMARY KEY (item_id, date_key),
            FOREIGN KEY (item_id) REFERENCES trackables (id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS item_streaks (
            item_id TEXT PRIMARY KEY,
            best_streak INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (item_id) REFERENCES trackables (id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS water_intake (
            date_key TEXT PRIMARY KEY,
            amount_ml INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_trackables_kind
         ON trackables (kind)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_trackables_active
         ON trackables (is_active)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
