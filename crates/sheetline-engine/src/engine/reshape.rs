//! Reshaping raw cell matrices into the representations callers ask for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::value::{CellMatrix, CellValue};
use crate::error::{EngineError, Result};

/// How a fetched matrix should be presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputMode {
    /// The matrix as-is, optionally truncated.
    #[default]
    List,
    /// First column -> second column, one mapping for the whole matrix.
    KeyValue,
    /// One mapping per data row, keyed by the header row.
    KeyPair,
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LIST" => Ok(OutputMode::List),
            "KEY_VALUE" => Ok(OutputMode::KeyValue),
            "KEY_PAIR" => Ok(OutputMode::KeyPair),
            other => Err(format!(
                "Unknown output mode: {} (expected LIST, KEY_VALUE or KEY_PAIR)",
                other
            )),
        }
    }
}

/// A reshaped result. Serializes without a tag so each shape appears on the
/// wire exactly as callers expect it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reshaped {
    List(CellMatrix),
    KeyValue(BTreeMap<String, CellValue>),
    KeyPair(Vec<BTreeMap<String, CellValue>>),
}

/// Zero, negative or missing limits mean "no limit".
fn effective_limit(limit: Option<i64>) -> Option<usize> {
    limit
        .filter(|&n| n > 0)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
}

fn capped<I: Iterator>(rows: I, limit: Option<usize>) -> std::iter::Take<I> {
    rows.take(limit.unwrap_or(usize::MAX))
}

/// Reshape `matrix` according to `mode`.
///
/// `limit` caps the number of data rows produced: it is applied before
/// shaping for `List` and `KeyValue`, and after the header row is removed
/// for `KeyPair`. A `None` matrix (nothing came back from the grid) is an
/// error; an empty matrix yields an empty result of the requested shape.
pub fn reshape(
    matrix: Option<CellMatrix>,
    mode: OutputMode,
    limit: Option<i64>,
) -> Result<Reshaped> {
    let matrix = matrix.ok_or(EngineError::EmptyInput)?;
    let limit = effective_limit(limit);
    debug!(rows = matrix.len(), ?mode, ?limit, "reshaping matrix");

    let reshaped = match mode {
        OutputMode::List => Reshaped::List(capped(matrix.into_iter(), limit).collect()),
        OutputMode::KeyValue => {
            let mut map = BTreeMap::new();
            for mut row in capped(matrix.into_iter(), limit) {
                if row.len() < 2 {
                    continue;
                }
                row.truncate(2);
                let value = row.pop().unwrap_or_default();
                let key = row.pop().unwrap_or_default();
                // Later rows overwrite earlier ones with the same key.
                map.insert(key.to_string(), value);
            }
            Reshaped::KeyValue(map)
        }
        OutputMode::KeyPair => {
            let mut rows = matrix.into_iter();
            let header: Vec<String> = rows
                .next()
                .map(|h| h.iter().map(ToString::to_string).collect())
                .unwrap_or_default();
            let records = capped(rows, limit)
                .map(|row| {
                    // zip stops at the shorter side: short rows omit trailing
                    // keys, long rows drop excess columns.
                    header.iter().cloned().zip(row).collect::<BTreeMap<_, _>>()
                })
                .collect();
            Reshaped::KeyPair(records)
        }
    };
    Ok(reshaped)
}
