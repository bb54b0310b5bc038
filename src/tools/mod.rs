/// MCP tools for item and water tracking
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the tracker. Each tool takes its parameters, the storage,
/// and the caller's notion of today, so results are reproducible in tests.

mod create;
mod delete;
mod list;
mod status;
mod toggle;
mod update;
mod water;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use list::*;
pub use status::*;
pub use toggle::*;
pub use update::*;
pub use water::*;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{DateKey, DomainError, ScheduledDays, TrackableId};
use crate::storage::StorageError;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A tool response: structured data plus the text shown to the user
pub trait ToolResponse: Serialize {
    fn message(&self) -> &str;
}

macro_rules! impl_tool_response {
    ($($response:ty),* $(,)?) => {
        $(
            impl ToolResponse for $response {
                fn message(&self) -> &str {
                    &self.message
                }
            }
        )*
    };
}

impl_tool_response!(
    CreateItemResponse,
    DeleteItemResponse,
    ListItemsResponse,
    StatusResponse,
    ToggleItemResponse,
    UpdateItemResponse,
    WaterResponse,
);

/// Parse an item ID argument
pub(crate) fn parse_item_id(raw: &str) -> Result<TrackableId, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidArgument("item_id cannot be empty".to_string()));
    }
    TrackableId::from_string(raw)
        .map_err(|_| ToolError::InvalidArgument(format!("'{}' is not a valid item ID", raw)))
}

/// Parse an optional date argument, defaulting to `today`
///
/// Dates after `today` are rejected: nothing can be completed in the future.
pub(crate) fn parse_date_or_today(
    raw: Option<&str>,
    today: DateKey,
) -> Result<DateKey, ToolError> {
    let date = match raw {
        Some(s) => s.trim().parse::<DateKey>()?,
        None => today,
    };

    if date > today {
        return Err(DomainError::InvalidDate(format!(
            "{} is in the future (today is {})",
            date, today
        ))
        .into());
    }
    Ok(date)
}

/// Build a schedule from an optional weekday list
pub(crate) fn parse_schedule(days: Option<&[u8]>) -> Result<ScheduledDays, ToolError> {
    match days {
        Some(days) => Ok(ScheduledDays::from_weekdays(days)?),
        None => Ok(ScheduledDays::every_day()),
    }
}

/// "1 day" / "3 days"
pub(crate) fn plural_days(n: u32) -> String {
    format!("{} day{}", n, if n == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_date_defaults_to_today() {
        let today = key("2024-06-03");
        assert_eq!(parse_date_or_today(None, today).unwrap(), today);
        assert_eq!(parse_date_or_today(Some("2024-06-01"), today).unwrap(), key("2024-06-01"));
    }

    #[test]
    fn test_future_date_rejected() {
        let result = parse_date_or_today(Some("2024-06-04"), key("2024-06-03"));
        assert!(matches!(result, Err(ToolError::Domain(DomainError::InvalidDate(_)))));
    }

    #[test]
    fn test_item_id_validation() {
        assert!(matches!(parse_item_id(""), Err(ToolError::InvalidArgument(_))));
        assert!(matches!(parse_item_id("not-a-uuid"), Err(ToolError::InvalidArgument(_))));
        assert!(parse_item_id(&TrackableId::new().to_string()).is_ok());
    }
}
