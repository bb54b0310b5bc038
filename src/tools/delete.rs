/// Tool for deleting items
///
/// This module implements the item_delete MCP tool. Deleting an item also
/// discards its completion log and best streak.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::TrackerStorage;
use crate::tools::{parse_item_id, ToolError};

/// Parameters for deleting an item
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteItemParams {
    /// ID of the item to delete
    pub item_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteItemResponse {
    pub success: bool,
    pub message: String,
}

/// Delete an item and everything logged for it
pub fn delete_item<S: TrackerStorage>(
    storage: &S,
    params: DeleteItemParams,
) -> Result<DeleteItemResponse, ToolError> {
    let item_id = parse_item_id(&params.item_id)?;
    let item = storage.get_item(&item_id)?;
    storage.delete_item(&item_id)?;

    tracing::info!("Deleted {} '{}' ({})", item.kind, item.name, item.id);
    Ok(DeleteItemResponse {
        success: true,
        message: format!("🗑️ Deleted {} '{}' and its history", item.kind, item.name),
    })
}
