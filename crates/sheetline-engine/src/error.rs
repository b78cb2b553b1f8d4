//! Error types for the Sheetline engine.

use thiserror::Error;

/// Structural precondition failures detected by the engine.
///
/// Every variant is raised eagerly, before any output is produced, so a
/// failed call never yields partial results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("No cell data to reshape")]
    EmptyInput,

    #[error("Sheet has no columns to align against")]
    NoColumns,

    #[error("None of the supplied keys match existing column headers")]
    NoMatchingColumns,
}

pub type Result<T> = std::result::Result<T, EngineError>;
