//! The boundary with whatever actually holds the grid.
//!
//! The service hands a [`GridTransport`] addressing strings and aligned rows
//! and receives raw matrices back. Credentials, retries and quotas all live
//! behind this trait.

use serde::{Deserialize, Serialize};
use sheetline_engine::engine::{CellMatrix, StyledRow};
use thiserror::Error;

/// `fields` mask used for appends: every field of every cell is written.
pub const APPEND_ALL_FIELDS: &str = "*";

/// Failures reported by a transport. The service passes these through or
/// maps them; it never retries.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TransportError {
    pub fn status(&self) -> u16 {
        match self {
            TransportError::NotFound(_) => 404,
            TransportError::BadRequest(_) => 400,
            TransportError::Io(_) | TransportError::Csv(_) => 500,
        }
    }
}

/// An `appendCells` request in batch-update form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendCellsRequest {
    pub sheet_id: u32,
    pub fields: String,
    pub rows: Vec<StyledRow>,
}

impl AppendCellsRequest {
    pub fn new(sheet_id: u32, rows: Vec<StyledRow>) -> Self {
        AppendCellsRequest {
            sheet_id,
            fields: APPEND_ALL_FIELDS.to_string(),
            rows,
        }
    }
}

/// What a transport reports after appending rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendReply {
    pub spreadsheet_id: String,
    pub sheet_id: u32,
    pub updated_range: String,
    pub updated_rows: usize,
}

/// The written range and values, echoed back after an update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdatedData {
    pub range: String,
    pub values: CellMatrix,
}

pub trait GridTransport {
    /// Values inside `range`, or `None` when the range holds nothing.
    fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Option<CellMatrix>, TransportError>;

    /// Append styled rows after the last row with data.
    fn append_cells(
        &self,
        spreadsheet_id: &str,
        request: &AppendCellsRequest,
    ) -> Result<AppendReply, TransportError>;

    /// Write `values` verbatim (no input parsing) starting at `range`.
    fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &CellMatrix,
    ) -> Result<UpdatedData, TransportError>;
}

impl<T: GridTransport + ?Sized> GridTransport for &T {
    fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Option<CellMatrix>, TransportError> {
        (**self).get_values(spreadsheet_id, range)
    }

    fn append_cells(
        &self,
        spreadsheet_id: &str,
        request: &AppendCellsRequest,
    ) -> Result<AppendReply, TransportError> {
        (**self).append_cells(spreadsheet_id, request)
    }

    fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &CellMatrix,
    ) -> Result<UpdatedData, TransportError> {
        (**self).update_values(spreadsheet_id, range, values)
    }
}
