//! Error types for the Sheetline request layer.

use sheetline_engine::EngineError;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by [`SheetService`](crate::SheetService) operations.
///
/// [`ServiceError::status`] gives the HTTP-style code a front end should
/// answer with.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Missing range")]
    MissingRange,

    #[error("Spreadsheet id not provided")]
    MissingSpreadsheetId,

    #[error("Sheet name not provided")]
    MissingSheetName,

    #[error(
        "Invalid range, expected [sheet, from, to], [sheet, from], [-, from, to] or a sheet name: {0}"
    )]
    BadRange(String),

    #[error("Could not decode request data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Spreadsheet or sheet not found: {0}")]
    NotFound(#[source] TransportError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ServiceError {
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::MissingRange
            | ServiceError::MissingSpreadsheetId
            | ServiceError::MissingSheetName
            | ServiceError::BadRange(_)
            | ServiceError::Decode(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Engine(err) => match err {
                EngineError::InvalidRange(_) => 400,
                EngineError::EmptyInput => 404,
                EngineError::NoColumns | EngineError::NoMatchingColumns => 409,
            },
            ServiceError::Transport(err) => err.status(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
