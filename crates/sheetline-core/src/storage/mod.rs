//! Local storage: workbooks kept as directories of CSV sheets.

mod csv;
mod workbook;

pub use self::csv::{parse_csv_field, read_sheet, write_sheet};
pub use self::workbook::CsvWorkbooks;
