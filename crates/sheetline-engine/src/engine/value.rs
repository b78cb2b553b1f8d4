//! Scalar cell values and the matrix/record shapes built from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar as read from or written to the remote grid.
///
/// Values pass through untouched: the engine never coerces text to numbers
/// or the other way around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// The sentinel written into columns no record key matched.
    pub fn empty() -> CellValue {
        CellValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // f64's Display already drops a trailing ".0" for integral values.
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Rows-then-columns, as returned by or sent to the remote grid.
pub type CellMatrix = Vec<Vec<CellValue>>;

/// One logical row to write, keyed by column label.
pub type InputRecord = BTreeMap<String, CellValue>;

/// Build a [`CellMatrix`] from string literals; handy for fixtures.
pub fn text_matrix<R, C>(rows: R) -> CellMatrix
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<CellValue>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}
