//! CSV sheet reading and writing.

use crate::transport::TransportError;
use sheetline_engine::engine::{CellMatrix, CellValue};
use std::path::Path;

/// Read a whole sheet. Rows keep their own width; nothing is padded.
pub fn read_sheet(path: &Path) -> Result<CellMatrix, TransportError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(parse_csv_field).collect());
    }
    Ok(rows)
}

/// Replace a sheet's contents with `rows`.
pub fn write_sheet(path: &Path, rows: &CellMatrix) -> Result<(), TransportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)?;

    for row in rows {
        if row.is_empty() {
            // The csv writer refuses empty records; a lone empty field reads
            // back as an empty row.
            writer.write_record([""])?;
        } else {
            writer.write_record(row.iter().map(ToString::to_string))?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Parse a CSV field into a cell value
/// - Empty string -> empty text
/// - Valid number -> Number (unless it has leading zeros like "007")
/// - Otherwise -> Text
pub fn parse_csv_field(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::empty();
    }

    // Keep explicit surrounding whitespace as text.
    let trimmed = field.trim();
    if field != trimmed {
        return CellValue::from(field);
    }

    // Preserve strings that look like numbers but have leading zeros (e.g., "007", "00123")
    // unless they're just "0" or start with "0."
    if trimmed.starts_with('0')
        && trimmed.len() > 1
        && !trimmed.starts_with("0.")
        && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return CellValue::from(trimmed);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::from(trimmed),
    }
}
