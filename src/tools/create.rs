/// Tool for creating new habits and supplements
///
/// This module implements the item_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, FrequencyPolicy, ItemKind, TrackableItem};
use crate::storage::TrackerStorage;
use crate::tools::{parse_schedule, ToolError};

/// Parameters for creating a new item
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateItemParams {
    /// Name of the habit or supplement
    pub name: String,
    /// "habit" or "supplement"
    pub kind: ItemKind,
    /// daily, twice_daily, weekly or as_needed (defaults to daily; habits are always daily)
    pub frequency: Option<FrequencyPolicy>,
    /// Weekdays the item is due, 0 = Sunday .. 6 = Saturday (defaults to every day)
    pub scheduled_days: Option<Vec<u8>>,
}

/// Response from creating an item
#[derive(Debug, Serialize)]
pub struct CreateItemResponse {
    pub success: bool,
    pub item_id: String,
    pub message: String,
}

/// Create a new item using the provided storage
pub fn create_item<S: TrackerStorage>(
    storage: &S,
    params: CreateItemParams,
    today: DateKey,
) -> Result<CreateItemResponse, ToolError> {
    let schedule = parse_schedule(params.scheduled_days.as_deref())?;
    let item = TrackableItem::new(params.name, params.kind, params.frequency, schedule, today)?;

    storage.create_item(&item)?;

    let schedule_note = if item.scheduled_days.is_every_day() {
        String::new()
    } else {
        format!(" on {}", item.scheduled_days.display())
    };

    Ok(CreateItemResponse {
        success: true,
        item_id: item.id.to_string(),
        message: format!(
            "✅ Created {} '{}' ({}{}). Ready to start your streak!\nItem ID: {}",
            item.kind,
            item.name,
            item.frequency.display_name(),
            schedule_note,
            item.id
        ),
    })
}
