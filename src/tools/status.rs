/// Tool for checking item status and streaks
///
/// This module implements the item_status MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{render_week_grid, DateKey, ItemSummary};
use crate::storage::{CompletionRepository, TrackerStorage};
use crate::tools::{parse_item_id, plural_days, ToolError};

/// Parameters for checking item status
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// ID of a specific item (optional - shows all active items if omitted)
    pub item_id: Option<String>,
}

/// Response from checking item status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub items: Vec<ItemSummary>,
    pub summary: String,
    pub message: String,
}

/// Get status for items using the provided storage
pub fn get_item_status<S: TrackerStorage + CompletionRepository>(
    storage: &S,
    params: StatusParams,
    today: DateKey,
) -> Result<StatusResponse, ToolError> {
    let items = match params.item_id {
        Some(raw_id) => vec![storage.get_item(&parse_item_id(&raw_id)?)?],
        None => storage.list_items(None, true)?,
    };

    let mut summaries = Vec::with_capacity(items.len());
    for item in &items {
        let record = storage.load(&item.id)?;
        summaries.push(item.summarize(&record, today));
    }

    let summary = if summaries.is_empty() {
        "No items found. Create your first habit or supplement to get started!".to_string()
    } else {
        let due: Vec<&ItemSummary> = summaries.iter().filter(|s| s.is_due_today).collect();
        let done = due.iter().filter(|s| s.is_complete).count();
        format!(
            "📊 Status for {}: {} of {} due items complete",
            today,
            done,
            due.len()
        )
    };

    let details = summaries
        .iter()
        .map(|s| {
            let state = if s.is_complete {
                "✅ done"
            } else if s.is_due_today {
                "⏳ pending"
            } else {
                "💤 not due"
            };
            format!(
                "🎯 {} [{} · {}] {}\n   Current streak: {} | Best: {} | Total: {}\n   {}\n   {}",
                s.name,
                s.kind,
                s.frequency.display_name(),
                state,
                plural_days(s.current_streak),
                plural_days(s.best_streak),
                s.total_completions,
                render_week_grid(&s.week),
                s.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let message = if details.is_empty() {
        summary.clone()
    } else {
        format!("{}\n\n{}", summary, details)
    };

    Ok(StatusResponse {
        items: summaries,
        summary,
        message,
    })
}
