//! The three grid operations: read-and-reshape, append-with-style and
//! partial-update-by-key.
//!
//! Each call decodes its request, asks the transport for whatever rows it
//! needs, runs the engine over them and hands the result back to the
//! transport (for writes) or to the caller (for reads).

use sheetline_engine::EngineError;
use sheetline_engine::engine::{
    CellMatrix, CellValue, ColumnAligner, RangeDescriptor, Reshaped, StyleSpec, reshape,
};
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::request::{
    AppendBody, AppendQuery, ReadQuery, UpdateBody, UpdateQuery, range_is_blank,
};
use crate::transport::{AppendCellsRequest, AppendReply, GridTransport, TransportError, UpdatedData};

/// Runs grid operations over a transport, with a configured default style.
pub struct SheetService<T> {
    transport: T,
    style: StyleSpec,
}

impl<T: GridTransport> SheetService<T> {
    pub fn new(transport: T) -> Self {
        SheetService {
            transport,
            style: StyleSpec::default(),
        }
    }

    /// Replace the default style applied to appends.
    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &StyleSpec {
        &self.style
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a range and reshape it.
    pub fn read(&self, query: &ReadQuery) -> Result<Reshaped> {
        if range_is_blank(&query.range) {
            return Err(ServiceError::MissingRange);
        }
        let descriptor = decode_range(&query.range)?;
        let address = descriptor.address();

        let values = self
            .transport
            .get_values(&query.id, &address)
            .map_err(|err| match err {
                TransportError::BadRequest(msg) => ServiceError::BadRange(msg),
                other => ServiceError::NotFound(other),
            })?;

        info!(spreadsheet = %query.id, %address, mode = ?query.mode, "read range");
        Ok(reshape(values, query.mode, query.limit)?)
    }

    /// Align records against the sheet's header and append them, styled.
    pub fn append(&self, query: &AppendQuery, body: AppendBody) -> Result<AppendReply> {
        if query.id.trim().is_empty() {
            return Err(ServiceError::MissingSpreadsheetId);
        }
        if query.sheet_name.trim().is_empty() {
            return Err(ServiceError::MissingSheetName);
        }

        let records = body.data.decode()?;
        let style = match &body.props {
            Some(props) => self.style.with_overrides(props),
            None => self.style.clone(),
        };

        let header_range = RangeDescriptor::sheet_only(query.sheet_name.as_str()).address();
        let header = self
            .transport
            .get_values(&query.id, &header_range)
            .map_err(ServiceError::NotFound)?;
        let aligner = ColumnAligner::new(&header_row(header))?;
        let rows = aligner.align_for_append(&records, &style)?;
        debug!(rows = rows.len(), font = %style.font, "appending styled rows");

        let request = AppendCellsRequest::new(query.sheet_id, rows);
        let reply = self
            .transport
            .append_cells(&query.id, &request)
            .map_err(ServiceError::NotFound)?;

        info!(
            spreadsheet = %query.id,
            range = %reply.updated_range,
            rows = reply.updated_rows,
            "appended rows"
        );
        Ok(reply)
    }

    /// Align records against the target sheet's header and write them over
    /// the target range.
    pub fn update(&self, query: &UpdateQuery, body: UpdateBody) -> Result<UpdatedData> {
        if query.id.trim().is_empty() {
            return Err(ServiceError::MissingSpreadsheetId);
        }

        let data = body.data.decode()?;
        if range_is_blank(&data.range) {
            return Err(ServiceError::MissingRange);
        }
        let descriptor = decode_range(&data.range)?;
        let sheet = descriptor
            .sheet()
            .ok_or_else(|| ServiceError::BadRange("update range must name a sheet".to_string()))?;
        let records = data.values.decode()?;

        let header_range = RangeDescriptor::sheet_only(sheet).address();
        let header = self.transport.get_values(&query.id, &header_range)?;
        let rows = ColumnAligner::new(&header_row(header))?.align_for_update(&records)?;

        let address = descriptor.address();
        let updated = self.transport.update_values(&query.id, &address, &rows)?;
        info!(spreadsheet = %query.id, range = %updated.range, "updated range");
        Ok(updated)
    }
}

fn decode_range(segments: &[Option<String>]) -> Result<RangeDescriptor> {
    RangeDescriptor::from_segments(segments).map_err(|err| match err {
        EngineError::InvalidRange(reason) => ServiceError::BadRange(reason),
        other => ServiceError::Engine(other),
    })
}

/// First row of a fetched matrix; empty when the sheet holds nothing.
fn header_row(matrix: Option<CellMatrix>) -> Vec<CellValue> {
    matrix
        .and_then(|rows| rows.into_iter().next())
        .unwrap_or_default()
}
