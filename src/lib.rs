/// Public library interface for the Streak Tracker MCP server
///
/// This module exports the streak engine, the domain types, the storage
/// layer, and the server that exposes them as MCP tools.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{
    CompletionRepository, MemoryStorage, SqliteStorage, StorageError, TrackerStorage,
};
pub use tools::*;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runtime settings for the tracker server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Daily water target used until one is stored through `water_status`
    pub water_target_ml: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            water_target_ml: DEFAULT_WATER_TARGET_ML,
        }
    }
}

/// Main tracker server that implements the MCP protocol
///
/// This server manages item data through a SQLite database and exposes
/// tools for creating items, toggling completions, and reading streaks.
pub struct StreakTrackerServer {
    storage: SqliteStorage,
    config: TrackerConfig,
}

impl StreakTrackerServer {
    /// Create a new tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf, config: TrackerConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing Streak Tracker server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage, config))
    }

    /// Wrap an already opened storage
    pub fn with_storage(storage: SqliteStorage, config: TrackerConfig) -> Self {
        Self { storage, config }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let items = self.storage.list_items(None, false)?;
        tracing::info!("Server started successfully, found {} existing items", items.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}
