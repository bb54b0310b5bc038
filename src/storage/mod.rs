/// Storage layer for persisting tracker data
///
/// The streak engine never touches storage. Callers load a record through
/// these traits, run the engine, and save the result back. Two backends
/// implement them: SQLite for the server and an in-memory store for tests.

pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use thiserror::Error;
use crate::domain::{CompletionRecord, ItemKind, TrackableId, TrackableItem, WaterLog};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: String },

    #[error("Item already exists: {item_id}")]
    DuplicateItem { item_id: String },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Load and save an item's completion log together with its best streak
///
/// The two are always written as one unit so the best streak can never
/// drift away from the log it was computed from.
pub trait CompletionRepository {
    /// Load the record for an item; an item with no completions yields an
    /// empty record
    fn load(&self, item_id: &TrackableId) -> Result<CompletionRecord, StorageError>;

    /// Replace the stored record for an item (last write wins)
    fn save(&self, item_id: &TrackableId, record: &CompletionRecord) -> Result<(), StorageError>;
}

/// Trait defining the storage interface for items and the water log
pub trait TrackerStorage {
    /// Create a new item
    fn create_item(&self, item: &TrackableItem) -> Result<(), StorageError>;

    /// Get an item by ID
    fn get_item(&self, item_id: &TrackableId) -> Result<TrackableItem, StorageError>;

    /// Update an existing item
    fn update_item(&self, item: &TrackableItem) -> Result<(), StorageError>;

    /// Delete an item along with its completion record
    fn delete_item(&self, item_id: &TrackableId) -> Result<(), StorageError>;

    /// List items with optional filtering, oldest first
    fn list_items(
        &self,
        kind: Option<ItemKind>,
        active_only: bool,
    ) -> Result<Vec<TrackableItem>, StorageError>;

    /// Load the whole water log
    fn load_water_log(&self) -> Result<WaterLog, StorageError>;

    /// Replace the stored water log
    fn save_water_log(&self, log: &WaterLog) -> Result<(), StorageError>;

    /// The configured daily water target, if one was ever set
    fn water_target(&self) -> Result<Option<u32>, StorageError>;

    fn set_water_target(&self, target_ml: u32) -> Result<(), StorageError>;
}
