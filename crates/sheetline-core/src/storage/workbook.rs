//! A [`GridTransport`] over local CSV files.
//!
//! Layout: `<root>/<spreadsheet id>/<sheet name>.csv`. Sheet ids are the
//! zero-based position of a sheet in name order. Formatting carried by
//! appended cells is not persisted; only values are written.

use std::fs;
use std::path::{Path, PathBuf};

use sheetline_engine::engine::{CellMatrix, CellRef, CellValue, RangeDescriptor};
use tracing::{debug, warn};

use super::csv::{read_sheet, write_sheet};
use crate::transport::{AppendCellsRequest, AppendReply, GridTransport, TransportError, UpdatedData};

const SHEET_EXTENSION: &str = "csv";

/// Grid limits: rows per sheet and columns up to `ZZZ`.
pub const MAX_ROWS: usize = 10_000_000;
pub const MAX_COLS: usize = 18_278;

/// Workbooks stored as directories of CSV sheets.
#[derive(Clone, Debug)]
pub struct CsvWorkbooks {
    root: PathBuf,
}

/// A rectangle of cells, inclusive on both corners. `end == None` means the
/// rectangle is open to the right and bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Window {
    start: CellRef,
    end: Option<CellRef>,
}

impl Window {
    const WHOLE_SHEET: Window = Window {
        start: CellRef { row: 0, col: 0 },
        end: None,
    };

    fn span(a: CellRef, b: CellRef) -> Window {
        Window {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: Some(CellRef::new(a.col.max(b.col), a.row.max(b.row))),
        }
    }

    fn contains_row(&self, row: usize) -> bool {
        row >= self.start.row && self.end.is_none_or(|end| row <= end.row)
    }

    fn columns<'a>(&self, row: &'a [CellValue]) -> &'a [CellValue] {
        let from = self.start.col.min(row.len());
        let to = match self.end {
            Some(end) => (end.col + 1).min(row.len()),
            None => row.len(),
        };
        &row[from..to.max(from)]
    }
}

/// A resolved addressing string.
#[derive(Debug)]
struct Target {
    sheet: String,
    window: Window,
    /// Whether the range named a single cell; updates may then grow past it.
    anchored: bool,
}

impl CsvWorkbooks {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvWorkbooks { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create an empty spreadsheet directory.
    pub fn create_spreadsheet(&self, spreadsheet_id: &str) -> Result<PathBuf, TransportError> {
        let dir = self.root.join(checked_name(spreadsheet_id, "spreadsheet id")?);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write a whole sheet, creating the spreadsheet if needed.
    pub fn put_sheet(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        rows: &CellMatrix,
    ) -> Result<(), TransportError> {
        let dir = self.create_spreadsheet(spreadsheet_id)?;
        let path = dir.join(format!("{}.{}", checked_name(sheet, "sheet name")?, SHEET_EXTENSION));
        write_sheet(&path, rows)
    }

    /// Sheet names of a spreadsheet, in sheet id order.
    pub fn sheet_names(&self, spreadsheet_id: &str) -> Result<Vec<String>, TransportError> {
        let dir = self.spreadsheet_dir(spreadsheet_id)?;
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SHEET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn spreadsheet_dir(&self, spreadsheet_id: &str) -> Result<PathBuf, TransportError> {
        let dir = self.root.join(checked_name(spreadsheet_id, "spreadsheet id")?);
        if !dir.is_dir() {
            return Err(TransportError::NotFound(format!(
                "Spreadsheet not found: {}",
                spreadsheet_id
            )));
        }
        Ok(dir)
    }

    fn sheet_path(&self, spreadsheet_id: &str, sheet: &str) -> Result<PathBuf, TransportError> {
        Ok(self
            .spreadsheet_dir(spreadsheet_id)?
            .join(format!("{}.{}", sheet, SHEET_EXTENSION)))
    }

    /// Resolve an addressing string to a sheet and window of cells.
    fn resolve(&self, spreadsheet_id: &str, range: &str) -> Result<Target, TransportError> {
        let unparseable =
            || TransportError::BadRequest(format!("Unable to parse range: {}", range));
        let descriptor = RangeDescriptor::parse(range).map_err(|_| unparseable())?;
        let names = self.sheet_names(spreadsheet_id)?;
        let known = |sheet: &str| -> Result<String, TransportError> {
            if names.iter().any(|n| n == sheet) {
                Ok(sheet.to_string())
            } else {
                Err(unparseable())
            }
        };
        let first_sheet = || -> Result<String, TransportError> {
            names.first().cloned().ok_or_else(|| {
                TransportError::NotFound(format!("Spreadsheet has no sheets: {}", spreadsheet_id))
            })
        };
        let cell = |reference: &str| -> Result<CellRef, TransportError> {
            let at = CellRef::from_str(reference).ok_or_else(unparseable)?;
            if at.row >= MAX_ROWS || at.col >= MAX_COLS {
                return Err(TransportError::BadRequest(format!(
                    "Range {} exceeds grid limits of {} rows by {} columns",
                    range, MAX_ROWS, MAX_COLS
                )));
            }
            Ok(at)
        };

        let target = match descriptor {
            RangeDescriptor::SheetOnly { sheet } => {
                if names.contains(&sheet) {
                    Target {
                        sheet,
                        window: Window::WHOLE_SHEET,
                        anchored: true,
                    }
                } else {
                    // A lone segment that is not a sheet may still be a cell
                    // on the first sheet.
                    let at = cell(&sheet)?;
                    Target {
                        sheet: first_sheet()?,
                        window: Window::span(at, at),
                        anchored: true,
                    }
                }
            }
            RangeDescriptor::SheetAndCell { sheet, cell: reference } => {
                let at = cell(&reference)?;
                Target {
                    sheet: known(&sheet)?,
                    window: Window::span(at, at),
                    anchored: true,
                }
            }
            RangeDescriptor::SheetAndSpan { sheet, from, to } => Target {
                sheet: known(&sheet)?,
                window: Window::span(cell(&from)?, cell(&to)?),
                anchored: false,
            },
            RangeDescriptor::BareSpan { from, to } => Target {
                sheet: first_sheet()?,
                window: Window::span(cell(&from)?, cell(&to)?),
                anchored: false,
            },
        };
        Ok(target)
    }

    fn load(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
    ) -> Result<(PathBuf, CellMatrix), TransportError> {
        let path = self.sheet_path(spreadsheet_id, sheet)?;
        let rows = read_sheet(&path)?;
        Ok((path, rows))
    }
}

/// Reject names that would escape the workbook root.
fn checked_name<'a>(name: &'a str, what: &str) -> Result<&'a str, TransportError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(TransportError::BadRequest(format!("Invalid {}: {:?}", what, name)));
    }
    Ok(name)
}

/// Drop trailing empty cells from every row and trailing empty rows.
fn trim_trailing_empty(mut rows: CellMatrix) -> CellMatrix {
    for row in rows.iter_mut() {
        while row.last().is_some_and(CellValue::is_empty) {
            row.pop();
        }
    }
    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }
    rows
}

/// Bottom-right cell of a `rows` x `cols` block at `start`, or `None` for
/// an empty block. Fails when the block would leave the grid.
fn span_end(start: CellRef, rows: usize, cols: usize) -> Result<Option<CellRef>, TransportError> {
    if rows == 0 || cols == 0 {
        return Ok(None);
    }
    let end_row = start.row.checked_add(rows - 1).filter(|&r| r < MAX_ROWS);
    let end_col = start.col.checked_add(cols - 1).filter(|&c| c < MAX_COLS);
    match (end_row, end_col) {
        (Some(row), Some(col)) => Ok(Some(CellRef::new(col, row))),
        _ => Err(TransportError::BadRequest(format!(
            "Writing {} rows by {} columns at {} exceeds grid limits of {} rows by {} columns",
            rows, cols, start, MAX_ROWS, MAX_COLS
        ))),
    }
}

fn a1_span(sheet: &str, start: CellRef, end: Option<CellRef>) -> String {
    match end {
        Some(end) => format!("{}!{}:{}", sheet, start, end),
        None => format!("{}!{}", sheet, start),
    }
}

impl GridTransport for CsvWorkbooks {
    fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Option<CellMatrix>, TransportError> {
        let target = self.resolve(spreadsheet_id, range)?;
        let (_, rows) = self.load(spreadsheet_id, &target.sheet)?;

        let window = target.window;
        let values: CellMatrix = rows
            .iter()
            .enumerate()
            .filter(|(i, _)| window.contains_row(*i))
            .map(|(_, row)| window.columns(row).to_vec())
            .collect();
        let values = trim_trailing_empty(values);
        debug!(%range, sheet = %target.sheet, rows = values.len(), "read csv range");

        Ok((!values.is_empty()).then_some(values))
    }

    fn append_cells(
        &self,
        spreadsheet_id: &str,
        request: &AppendCellsRequest,
    ) -> Result<AppendReply, TransportError> {
        let names = self.sheet_names(spreadsheet_id)?;
        let sheet = usize::try_from(request.sheet_id)
            .ok()
            .and_then(|i| names.get(i))
            .ok_or_else(|| {
                TransportError::NotFound(format!("No sheet with id: {}", request.sheet_id))
            })?;

        let (path, rows) = self.load(spreadsheet_id, sheet)?;
        let mut rows = trim_trailing_empty(rows);
        let start = CellRef::new(0, rows.len());
        let width = request.rows.iter().map(|r| r.values.len()).max().unwrap_or(0);
        let end = span_end(start, request.rows.len(), width)?;

        if request.rows.iter().any(|r| !r.values.is_empty()) {
            debug!(sheet = %sheet, "cell formatting is not persisted by csv workbooks");
        }
        rows.extend(
            request
                .rows
                .iter()
                .map(|r| r.values.iter().map(|c| c.value()).collect::<Vec<_>>()),
        );
        write_sheet(&path, &rows)?;

        Ok(AppendReply {
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_id: request.sheet_id,
            updated_range: a1_span(sheet, start, end),
            updated_rows: request.rows.len(),
        })
    }

    fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &CellMatrix,
    ) -> Result<UpdatedData, TransportError> {
        let target = self.resolve(spreadsheet_id, range)?;
        let start = target.window.start;
        let height = values.len();
        let width = values.iter().map(Vec::len).max().unwrap_or(0);
        let written_end = span_end(start, height, width)?;

        if let (false, Some(end)) = (target.anchored, target.window.end) {
            let fits = height <= end.row - start.row + 1 && width <= end.col - start.col + 1;
            if !fits {
                warn!(%range, height, width, "update does not fit the requested range");
                return Err(TransportError::BadRequest(format!(
                    "Requested writing within range {}, but tried writing {} rows by {} columns",
                    range, height, width
                )));
            }
        }

        let (path, mut rows) = self.load(spreadsheet_id, &target.sheet)?;
        for (i, new_row) in values.iter().enumerate() {
            let r = start.row + i;
            if rows.len() <= r {
                rows.resize_with(r + 1, Vec::new);
            }
            let row = &mut rows[r];
            let needed = start.col + new_row.len();
            if row.len() < needed {
                row.resize(needed, CellValue::empty());
            }
            for (j, value) in new_row.iter().enumerate() {
                row[start.col + j] = value.clone();
            }
        }
        write_sheet(&path, &rows)?;
        debug!(%range, sheet = %target.sheet, rows = height, "wrote csv range");

        Ok(UpdatedData {
            range: a1_span(&target.sheet, start, written_end),
            values: values.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetline_engine::engine::{StyleSpec, StyledCell, StyledRow, text_matrix};

    fn fixture() -> (tempfile::TempDir, CsvWorkbooks) {
        let dir = tempfile::tempdir().unwrap();
        let books = CsvWorkbooks::new(dir.path());
        books
            .put_sheet(
                "book",
                "People",
                &text_matrix([
                    vec!["name", "age", "city"],
                    vec!["ann", "31", "oslo"],
                    vec!["bo", "", ""],
                ]),
            )
            .unwrap();
        books
            .put_sheet("book", "Totals", &text_matrix([["k", "v"]]))
            .unwrap();
        (dir, books)
    }

    #[test]
    fn test_sheet_ids_follow_name_order() {
        let (_dir, books) = fixture();
        assert_eq!(books.sheet_names("book").unwrap(), vec!["People", "Totals"]);
    }

    #[test]
    fn test_get_whole_sheet_trims_trailing_empties() {
        let (_dir, books) = fixture();
        let rows = books.get_values("book", "People").unwrap().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec![CellValue::from("bo")]);
        assert_eq!(rows[1][1], CellValue::Number(31.0));
    }

    #[test]
    fn test_get_span_and_cell() {
        let (_dir, books) = fixture();
        let rows = books.get_values("book", "People!B2:C3").unwrap().unwrap();
        assert_eq!(rows, vec![vec![CellValue::Number(31.0), CellValue::from("oslo")]]);

        let cell = books.get_values("book", "People!A2").unwrap().unwrap();
        assert_eq!(cell, vec![vec![CellValue::from("ann")]]);

        // Bare spans and lone cells address the first sheet.
        let bare = books.get_values("book", "A1:A2").unwrap().unwrap();
        assert_eq!(bare, text_matrix([["name"], ["ann"]]));
        let lone = books.get_values("book", "C2").unwrap().unwrap();
        assert_eq!(lone, text_matrix([["oslo"]]));
    }

    #[test]
    fn test_get_empty_range_is_none() {
        let (_dir, books) = fixture();
        assert_eq!(books.get_values("book", "People!D1:E9").unwrap(), None);
    }

    #[test]
    fn test_get_errors() {
        let (_dir, books) = fixture();
        assert!(matches!(
            books.get_values("missing", "People"),
            Err(TransportError::NotFound(_))
        ));
        assert!(matches!(
            books.get_values("book", "Nope!A1"),
            Err(TransportError::BadRequest(_))
        ));
        assert!(matches!(
            books.get_values("book", "People!1A"),
            Err(TransportError::BadRequest(_))
        ));
        assert!(matches!(
            books.get_values("../etc", "People"),
            Err(TransportError::BadRequest(_))
        ));
    }

    #[test]
    fn test_append_writes_after_last_row() {
        let (_dir, books) = fixture();
        let format = StyleSpec::default().cell_format();
        let row = StyledRow {
            values: vec![
                StyledCell::new(CellValue::from("cy"), format.clone()),
                StyledCell::new(CellValue::Number(5.0), format.clone()),
                StyledCell::new(CellValue::empty(), format),
            ],
        };
        let reply = books
            .append_cells("book", &AppendCellsRequest::new(0, vec![row]))
            .unwrap();
        assert_eq!(reply.updated_range, "People!A4:C4");
        assert_eq!(reply.updated_rows, 1);

        let rows = books.get_values("book", "People").unwrap().unwrap();
        assert_eq!(rows[3], vec![CellValue::from("cy"), CellValue::Number(5.0)]);
    }

    #[test]
    fn test_append_unknown_sheet_id() {
        let (_dir, books) = fixture();
        let err = books
            .append_cells("book", &AppendCellsRequest::new(7, Vec::new()))
            .unwrap_err();
        assert!(matches!(err, TransportError::NotFound(_)));
    }

    #[test]
    fn test_update_from_anchor_cell() {
        let (_dir, books) = fixture();
        let values = text_matrix([["x", "y"], ["z", "w"]]);
        let updated = books.update_values("book", "Totals!B1", &values).unwrap();
        assert_eq!(updated.range, "Totals!B1:C2");
        let rows = books.get_values("book", "Totals").unwrap().unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::from("k"), "x".into(), "y".into()],
                vec![CellValue::empty(), "z".into(), "w".into()],
            ]
        );
    }

    #[test]
    fn test_references_past_grid_limits_are_rejected() {
        let (_dir, books) = fixture();
        let values = text_matrix([["x"]]);
        for range in [
            "Totals!A18446744073709551615",
            "Totals!A4000000000",
            "Totals!A4000000000:A4000000000",
            "Totals!ZZZZ1",
            "A1:A99999999",
        ] {
            assert!(
                matches!(
                    books.update_values("book", range, &values),
                    Err(TransportError::BadRequest(_))
                ),
                "{range} should be rejected"
            );
            assert!(matches!(
                books.get_values("book", range),
                Err(TransportError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_update_running_off_the_grid_is_rejected() {
        let (_dir, books) = fixture();
        let last_row = format!("Totals!A{}", MAX_ROWS);
        let two_rows = text_matrix([["x"], ["y"]]);
        assert!(matches!(
            books.update_values("book", &last_row, &two_rows),
            Err(TransportError::BadRequest(_))
        ));

        let last_col = format!("Totals!{}1", CellRef::col_to_letters(MAX_COLS - 1));
        let two_cols = text_matrix([["x", "y"]]);
        assert!(matches!(
            books.update_values("book", &last_col, &two_cols),
            Err(TransportError::BadRequest(_))
        ));

        let fits = books
            .update_values("book", &last_col, &text_matrix([["x"]]))
            .unwrap();
        assert_eq!(fits.range, "Totals!ZZZ1:ZZZ1");
    }

    #[test]
    fn test_update_overflowing_span_is_rejected() {
        let (_dir, books) = fixture();
        let values = text_matrix([["a", "b", "c"]]);
        assert!(matches!(
            books.update_values("book", "People!A2:B2", &values),
            Err(TransportError::BadRequest(_))
        ));
        let updated = books.update_values("book", "People!A2:C2", &values).unwrap();
        assert_eq!(updated.range, "People!A2:C2");
    }
}
