/// Tool for marking an item done (or not done) on a day
///
/// This module implements the item_toggle MCP tool: toggle one day in the
/// item's log, recompute the streak as of today, and persist the log and
/// best streak together.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DateKey;
use crate::storage::{CompletionRepository, TrackerStorage};
use crate::tools::{parse_date_or_today, parse_item_id, plural_days, ToolError};

/// Parameters for toggling a completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleItemParams {
    /// ID of the habit or supplement
    pub item_id: String,
    /// Day to toggle as YYYY-MM-DD (optional - defaults to today)
    pub date: Option<String>,
}

/// Response from toggling a completion
#[derive(Debug, Serialize)]
pub struct ToggleItemResponse {
    pub success: bool,
    pub date: DateKey,
    /// Whether `date` is logged after the toggle
    pub completed: bool,
    pub is_complete_for_period: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    pub message: String,
}

/// Toggle a day in an item's completion log
pub fn toggle_item<S: TrackerStorage + CompletionRepository>(
    storage: &S,
    params: ToggleItemParams,
    today: DateKey,
) -> Result<ToggleItemResponse, ToolError> {
    let item_id = parse_item_id(&params.item_id)?;
    let item = storage.get_item(&item_id)?;
    let date = parse_date_or_today(params.date.as_deref(), today)?;

    let record = storage.load(&item_id)?;
    let updated = item.apply_toggle(&record, date, today);
    storage.save(&item_id, &updated)?;

    let completed = updated.log.contains(date);
    let stats = item.stats(&updated, today);
    tracing::debug!(
        "Toggled {} for '{}': completed={} streak={} best={}",
        date,
        item.name,
        completed,
        stats.current_streak,
        stats.best_streak
    );

    let message = if completed {
        format!(
            "🔥 Marked '{}' done for {}! Current streak: {} (best: {})",
            item.name,
            date,
            plural_days(stats.current_streak),
            plural_days(stats.best_streak)
        )
    } else {
        format!(
            "↩️ Unmarked '{}' for {}. Current streak: {} (best: {})",
            item.name,
            date,
            plural_days(stats.current_streak),
            plural_days(stats.best_streak)
        )
    };

    Ok(ToggleItemResponse {
        success: true,
        date,
        completed,
        is_complete_for_period: item.is_complete_for_period(&updated.log, today),
        current_streak: stats.current_streak,
        best_streak: stats.best_streak,
        message,
    })
}
