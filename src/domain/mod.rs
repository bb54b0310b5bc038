/// Domain module containing the streak engine and the tracked entities
///
/// This module defines the date key contract, completion logs, trackable
/// items (habits and supplements), the water-intake log, and the pure
/// streak calculations that run over them.

pub mod date_key;
pub mod completion;
pub mod item;
pub mod streak;
pub mod types;
pub mod water;

// Re-export public types for easy access
pub use date_key::*;
pub use completion::*;
pub use item::*;
pub use streak::*;
pub use types::*;
pub use water::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid item name: {0}")]
    InvalidItemName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
