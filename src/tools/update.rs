/// Tool for updating existing items
///
/// This module implements the item_update MCP tool to modify an item's
/// name, frequency, schedule or active flag. The completion log is left
/// untouched.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{FrequencyPolicy, ScheduledDays};
use crate::storage::TrackerStorage;
use crate::tools::{parse_item_id, ToolError};

/// Parameters for updating an existing item
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateItemParams {
    /// ID of the item to update
    pub item_id: String,
    /// New name (optional)
    pub name: Option<String>,
    /// New frequency (optional; habits stay daily)
    pub frequency: Option<FrequencyPolicy>,
    /// New weekday schedule, 0 = Sunday; an empty list means every day (optional)
    pub scheduled_days: Option<Vec<u8>>,
    /// Pause (false) or resume (true) the item (optional)
    pub is_active: Option<bool>,
}

/// Response from updating an item
#[derive(Debug, Serialize)]
pub struct UpdateItemResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing item using the provided storage
pub fn update_item<S: TrackerStorage>(
    storage: &S,
    params: UpdateItemParams,
) -> Result<UpdateItemResponse, ToolError> {
    let item_id = parse_item_id(&params.item_id)?;
    let mut item = storage.get_item(&item_id)?;

    let schedule = params
        .scheduled_days
        .map(|days| ScheduledDays::from_weekdays(&days))
        .transpose()?;

    item.update(params.name, params.frequency, schedule, params.is_active)?;
    storage.update_item(&item)?;

    let status = if item.is_active { "" } else { " (paused)" };
    Ok(UpdateItemResponse {
        success: true,
        message: format!(
            "✏️ Updated '{}': {} · {}{}",
            item.name,
            item.frequency.display_name(),
            item.scheduled_days.display(),
            status
        ),
    })
}
