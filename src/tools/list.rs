/// Tool for listing habits and supplements
///
/// This module implements the item_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, FrequencyPolicy, ItemKind};
use crate::storage::{CompletionRepository, TrackerStorage};
use crate::tools::ToolError;

/// Parameters for listing items
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListItemsParams {
    /// Filter by "habit" or "supplement" (optional)
    pub kind: Option<ItemKind>,
    /// Show only active items (default: true)
    pub active_only: Option<bool>,
}

/// Information about an item in the list
#[derive(Debug, Serialize)]
pub struct ItemListEntry {
    pub item_id: String,
    pub name: String,
    pub kind: ItemKind,
    pub frequency: FrequencyPolicy,
    pub schedule: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_completions: u32,
    pub is_active: bool,
}

/// Response from listing items
#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<ItemListEntry>,
    pub total_items: u32,
    pub active_items: u32,
    pub message: String,
}

/// List items using the provided storage
pub fn list_items<S: TrackerStorage + CompletionRepository>(
    storage: &S,
    params: ListItemsParams,
    today: DateKey,
) -> Result<ListItemsResponse, ToolError> {
    let active_only = params.active_only.unwrap_or(true);
    let items = storage.list_items(params.kind, active_only)?;

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let record = storage.load(&item.id)?;
        let stats = item.stats(&record, today);
        entries.push(ItemListEntry {
            item_id: item.id.to_string(),
            schedule: item.scheduled_days.display(),
            current_streak: stats.current_streak,
            best_streak: stats.best_streak,
            total_completions: record.log.len() as u32,
            is_active: item.is_active,
            name: item.name,
            kind: item.kind,
            frequency: item.frequency,
        });
    }

    let total_items = entries.len() as u32;
    let active_items = entries.iter().filter(|e| e.is_active).count() as u32;
    let message = format_listing(&entries, active_items);

    Ok(ListItemsResponse {
        items: entries,
        total_items,
        active_items,
        message,
    })
}

fn format_listing(entries: &[ItemListEntry], active_items: u32) -> String {
    if entries.is_empty() {
        return "No items found. Create your first habit or supplement to get started!".to_string();
    }

    let detailed_list = entries
        .iter()
        .map(|e| {
            format!(
                "🎯 **{}** ({})\n   📅 {} · {} | 🔥 Streak: {} | 🏆 Best: {} | ✅ Total: {}{}\n   ID: {}",
                e.name,
                e.kind,
                e.frequency.display_name(),
                e.schedule,
                e.current_streak,
                e.best_streak,
                e.total_completions,
                if e.is_active { "" } else { " ⏸️ (paused)" },
                e.item_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "📋 **Tracked items** ({} total, {} active)\n\n{}",
        entries.len(),
        active_items,
        detailed_list
    )
}
