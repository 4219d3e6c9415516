// ⚠️ Errors - Roster ingestion and settings failures

use thiserror::Error;

/// Errors at the ingestion/config boundary.
///
/// The matching and balancing core never fails; these only come from
/// reading rosters and settings files.
#[derive(Debug, Error)]
pub enum SquadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read roster CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Roster row {row} has an empty name")]
    EmptyName { row: usize },

    #[error("Unknown position: {value}")]
    InvalidPosition { value: String },
}

impl SquadError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SquadError::InvalidConfig {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SquadError>;
