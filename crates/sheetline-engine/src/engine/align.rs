//! Column alignment: laying key/value records out against a header row.
//!
//! The header row fixes output order and width. For every record, position
//! `j` of the output row holds the value whose key equals `header[j]`, or the
//! empty-string sentinel when no key matches. Header labels are indexed once
//! per call; when a label repeats, the first column carrying it wins.

use std::collections::HashMap;
use tracing::debug;

use super::style::{StyleSpec, StyledCell, StyledRow};
use super::value::{CellValue, InputRecord};
use crate::error::{EngineError, Result};

/// A row laid out in header order, as wide as the header.
pub type AlignedRow = Vec<CellValue>;

/// Header row indexed by label.
#[derive(Clone, Debug)]
pub struct ColumnAligner {
    width: usize,
    positions: HashMap<String, usize>,
}

impl ColumnAligner {
    /// Index `header` for alignment. Fails when the header has no columns.
    pub fn new<L: ToString>(header: &[L]) -> Result<Self> {
        if header.is_empty() {
            return Err(EngineError::NoColumns);
        }
        let mut positions = HashMap::with_capacity(header.len());
        for (col, label) in header.iter().enumerate() {
            positions.entry(label.to_string()).or_insert(col);
        }
        Ok(ColumnAligner {
            width: header.len(),
            positions,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Align one record; returns the row and whether any key matched.
    fn align_record(&self, record: &InputRecord) -> (AlignedRow, bool) {
        let mut row = vec![CellValue::empty(); self.width];
        let mut matched = false;
        for (key, value) in record {
            if let Some(&col) = self.positions.get(key) {
                row[col] = value.clone();
                matched = true;
            }
        }
        (row, matched)
    }

    /// Align every record into plain scalar rows.
    ///
    /// Records matching nothing still produce an all-empty row; only a batch
    /// in which no key matches any header label is rejected.
    pub fn align_for_update(&self, records: &[InputRecord]) -> Result<Vec<AlignedRow>> {
        let mut any_matched = false;
        let rows: Vec<AlignedRow> = records
            .iter()
            .map(|record| {
                let (row, matched) = self.align_record(record);
                any_matched |= matched;
                row
            })
            .collect();

        if !any_matched {
            return Err(EngineError::NoMatchingColumns);
        }
        debug!(rows = rows.len(), width = self.width, "aligned records");
        Ok(rows)
    }

    /// Align every record and wrap each cell with `style`.
    pub fn align_for_append(
        &self,
        records: &[InputRecord],
        style: &StyleSpec,
    ) -> Result<Vec<StyledRow>> {
        let rows = self.align_for_update(records)?;
        let format = style.cell_format();
        Ok(rows
            .into_iter()
            .map(|row| StyledRow {
                values: row
                    .into_iter()
                    .map(|value| StyledCell::new(value, format.clone()))
                    .collect(),
            })
            .collect())
    }
}

/// Align `records` against `header` into plain rows.
pub fn align_for_update<L: ToString>(
    records: &[InputRecord],
    header: &[L],
) -> Result<Vec<AlignedRow>> {
    ColumnAligner::new(header)?.align_for_update(records)
}

/// Align `records` against `header` into styled rows.
pub fn align_for_append<L: ToString>(
    records: &[InputRecord],
    header: &[L],
    style: &StyleSpec,
) -> Result<Vec<StyledRow>> {
    ColumnAligner::new(header)?.align_for_append(records, style)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> InputRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_duplicate_header_label_first_column_wins() {
        let rows = align_for_update(&[record(&[("a", "1")])], &["a", "b", "a"]).unwrap();
        assert_eq!(rows, vec![vec![CellValue::from("1"), CellValue::empty(), CellValue::empty()]]);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let rows = align_for_update(&[record(&[("a", "1"), ("zzz", "2")])], &["a"]).unwrap();
        assert_eq!(rows, vec![vec![CellValue::from("1")]]);
    }

    #[test]
    fn test_empty_batch_has_nothing_to_match() {
        assert_eq!(
            align_for_update(&[], &["a"]),
            Err(EngineError::NoMatchingColumns)
        );
    }

    #[test]
    fn test_header_cells_are_compared_by_display() {
        let header = vec![CellValue::Number(2024.0), CellValue::from("name")];
        let rows = align_for_update(&[record(&[("2024", "x")])], &header).unwrap();
        assert_eq!(rows[0][0], CellValue::from("x"));
    }

    #[test]
    fn test_no_columns_checked_before_matching() {
        let header: Vec<String> = Vec::new();
        assert_eq!(
            align_for_append(&[record(&[("a", "1")])], &header, &StyleSpec::default()),
            Err(EngineError::NoColumns)
        );
    }
}
