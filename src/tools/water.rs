/// Tools for water-intake tracking
///
/// This module implements the water_log and water_status MCP tools. The
/// tracker only keeps the most recent `WATER_RETENTION_DAYS` days; older
/// days are dropped whenever intake is logged, and intake for a day that
/// would be dropped straight away is refused.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, DomainError, WaterProgress, WATER_RETENTION_DAYS};
use crate::storage::TrackerStorage;
use crate::tools::{parse_date_or_today, ToolError};

/// Parameters for logging water intake
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WaterLogParams {
    /// Amount drunk in millilitres
    pub amount_ml: u32,
    /// Day to add it to as YYYY-MM-DD (optional - defaults to today)
    pub date: Option<String>,
}

/// Parameters for checking water progress
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct WaterStatusParams {
    /// Set a new daily target in millilitres (optional)
    pub target_ml: Option<u32>,
}

/// Response from both water tools
#[derive(Debug, Serialize)]
pub struct WaterResponse {
    pub success: bool,
    pub progress: WaterProgress,
    pub message: String,
}

/// The stored target, or `default_target_ml` if none was ever set
fn current_target<S: TrackerStorage>(storage: &S, default_target_ml: u32) -> Result<u32, ToolError> {
    Ok(storage.water_target()?.unwrap_or(default_target_ml))
}

fn progress_message(progress: &WaterProgress) -> String {
    if progress.goal_met {
        format!(
            "💧 {} ml of {} ml on {}. Goal reached!",
            progress.total_ml, progress.target_ml, progress.date
        )
    } else {
        format!(
            "💧 {} ml of {} ml on {}. {} ml to go.",
            progress.total_ml, progress.target_ml, progress.date, progress.remaining_ml
        )
    }
}

/// Add intake to a day and apply the retention window
pub fn log_water<S: TrackerStorage>(
    storage: &S,
    params: WaterLogParams,
    today: DateKey,
    default_target_ml: u32,
) -> Result<WaterResponse, ToolError> {
    let date = parse_date_or_today(params.date.as_deref(), today)?;

    let mut log = storage.load_water_log()?;
    log.add_intake(date, params.amount_ml)?;
    log.retain_recent(WATER_RETENTION_DAYS);
    if log.total_on(date) == 0 {
        return Err(ToolError::InvalidArgument(format!(
            "{} is older than the {} most recent days kept in the water log",
            date, WATER_RETENTION_DAYS
        )));
    }
    storage.save_water_log(&log)?;

    let progress = log.progress(date, current_target(storage, default_target_ml)?);
    tracing::debug!("Logged {} ml of water for {}", params.amount_ml, date);

    Ok(WaterResponse {
        success: true,
        message: progress_message(&progress),
        progress,
    })
}

/// Today's intake against the target, optionally setting a new target first
pub fn get_water_status<S: TrackerStorage>(
    storage: &S,
    params: WaterStatusParams,
    today: DateKey,
    default_target_ml: u32,
) -> Result<WaterResponse, ToolError> {
    if let Some(target_ml) = params.target_ml {
        if target_ml == 0 {
            return Err(DomainError::InvalidValue {
                message: "Water target must be greater than 0".to_string(),
            }
            .into());
        }
        storage.set_water_target(target_ml)?;
        tracing::info!("Water target set to {} ml", target_ml);
    }

    let log = storage.load_water_log()?;
    let progress = log.progress(today, current_target(storage, default_target_ml)?);

    Ok(WaterResponse {
        success: true,
        message: progress_message(&progress),
        progress,
    })
}
