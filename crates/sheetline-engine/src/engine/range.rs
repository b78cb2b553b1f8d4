//! Range addressing.
//!
//! A [`RangeDescriptor`] says explicitly which parts of a range the caller
//! supplied, so turning it into an addressing string never has to guess
//! whether a lone segment was meant as a sheet or a cell. The positional
//! `[sheet?, from?, to?]` form that arrives over the wire is decoded once by
//! [`RangeDescriptor::from_segments`].
//!
//! Sheet names are emitted verbatim. Names containing `!`, `:` or spaces that
//! the remote grid expects quoted are the caller's responsibility.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{EngineError, Result};

/// Maximum number of positional segments accepted by `from_segments`.
pub const MAX_SEGMENTS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeDescriptor {
    /// A whole sheet, addressed by name.
    SheetOnly { sheet: String },
    /// One cell on a named sheet.
    SheetAndCell { sheet: String, cell: String },
    /// A rectangular span on a named sheet.
    SheetAndSpan { sheet: String, from: String, to: String },
    /// A rectangular span on the grid's default sheet.
    BareSpan { from: String, to: String },
}

impl RangeDescriptor {
    pub fn sheet_only(sheet: impl Into<String>) -> Self {
        RangeDescriptor::SheetOnly { sheet: sheet.into() }
    }

    pub fn sheet_and_cell(sheet: impl Into<String>, cell: impl Into<String>) -> Self {
        RangeDescriptor::SheetAndCell {
            sheet: sheet.into(),
            cell: cell.into(),
        }
    }

    pub fn sheet_and_span(
        sheet: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        RangeDescriptor::SheetAndSpan {
            sheet: sheet.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn bare_span(from: impl Into<String>, to: impl Into<String>) -> Self {
        RangeDescriptor::BareSpan {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Decode the positional `[sheet?, from?, to?]` form.
    ///
    /// Empty strings count as absent. A single present segment, wherever it
    /// sits, is taken as a sheet name.
    pub fn from_segments<S: AsRef<str>>(segments: &[Option<S>]) -> Result<Self> {
        if segments.len() > MAX_SEGMENTS {
            return Err(EngineError::InvalidRange(format!(
                "expected at most {} segments, got {}",
                MAX_SEGMENTS,
                segments.len()
            )));
        }

        let seg = |i: usize| {
            segments
                .get(i)
                .and_then(|s| s.as_ref())
                .map(|s| s.as_ref())
                .filter(|s| !s.is_empty())
        };

        let descriptor = match (seg(0), seg(1), seg(2)) {
            (Some(sheet), Some(from), Some(to)) => Self::sheet_and_span(sheet, from, to),
            (Some(sheet), Some(cell), None) => Self::sheet_and_cell(sheet, cell),
            (None, Some(from), Some(to)) => Self::bare_span(from, to),
            (Some(only), None, None) | (None, Some(only), None) | (None, None, Some(only)) => {
                Self::sheet_only(only)
            }
            (Some(_), None, Some(_)) => {
                return Err(EngineError::InvalidRange(
                    "range end given without a range start".to_string(),
                ));
            }
            (None, None, None) => {
                return Err(EngineError::InvalidRange(
                    "at least one range segment is required".to_string(),
                ));
            }
        };
        Ok(descriptor)
    }

    /// Split an addressing string back into a descriptor.
    ///
    /// `"S!A1:B2"`, `"S!A1"`, `"A1:B2"` map to the obvious variants; anything
    /// else without `!` or `:` is a bare sheet name.
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(EngineError::InvalidRange(
                "empty addressing string".to_string(),
            ));
        }

        let (sheet, cells) = match address.split_once('!') {
            Some((sheet, cells)) => (Some(sheet), Some(cells)),
            None if address.contains(':') => (None, Some(address)),
            None => (Some(address), None),
        };

        let invalid = || EngineError::InvalidRange(format!("cannot parse '{}'", address));

        let descriptor = match (sheet, cells) {
            (Some(sheet), None) => Self::sheet_only(sheet),
            (sheet, Some(cells)) => {
                let (from, to) = match cells.split_once(':') {
                    Some((from, to)) => (from, Some(to)),
                    None => (cells, None),
                };
                if from.is_empty() || to.is_some_and(str::is_empty) {
                    return Err(invalid());
                }
                match (sheet, to) {
                    (Some(sheet), Some(to)) if !sheet.is_empty() => {
                        Self::sheet_and_span(sheet, from, to)
                    }
                    (Some(sheet), None) if !sheet.is_empty() => Self::sheet_and_cell(sheet, from),
                    (None, Some(to)) => Self::bare_span(from, to),
                    _ => return Err(invalid()),
                }
            }
            (None, None) => return Err(invalid()),
        };
        Ok(descriptor)
    }

    /// The sheet this range names, if any.
    pub fn sheet(&self) -> Option<&str> {
        match self {
            RangeDescriptor::SheetOnly { sheet }
            | RangeDescriptor::SheetAndCell { sheet, .. }
            | RangeDescriptor::SheetAndSpan { sheet, .. } => Some(sheet),
            RangeDescriptor::BareSpan { .. } => None,
        }
    }

    /// The addressing string understood by the remote grid.
    pub fn address(&self) -> String {
        let address = self.to_string();
        debug!(%address, "computed range address");
        address
    }
}

impl fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeDescriptor::SheetOnly { sheet } => f.write_str(sheet),
            RangeDescriptor::SheetAndCell { sheet, cell } => write!(f, "{}!{}", sheet, cell),
            RangeDescriptor::SheetAndSpan { sheet, from, to } => {
                write!(f, "{}!{}:{}", sheet, from, to)
            }
            RangeDescriptor::BareSpan { from, to } => write!(f, "{}:{}", from, to),
        }
    }
}

/// Decode positional segments and return the addressing string in one step.
pub fn address<S: AsRef<str>>(segments: &[Option<S>]) -> Result<String> {
    RangeDescriptor::from_segments(segments).map(|d| d.address())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[Option<&str>]) -> Vec<Option<String>> {
        parts.iter().map(|p| p.map(str::to_string)).collect()
    }

    #[test]
    fn test_three_segments() {
        assert_eq!(
            address(&segs(&[Some("S"), Some("A1"), Some("B2")])).unwrap(),
            "S!A1:B2"
        );
    }

    #[test]
    fn test_sheet_and_cell() {
        assert_eq!(address(&segs(&[Some("S"), Some("A1")])).unwrap(), "S!A1");
        assert_eq!(address(&segs(&[Some("S"), Some("A1"), None])).unwrap(), "S!A1");
    }

    #[test]
    fn test_bare_span() {
        assert_eq!(
            address(&segs(&[None, Some("A1"), Some("B2")])).unwrap(),
            "A1:B2"
        );
    }

    #[test]
    fn test_single_segment_is_sheet() {
        assert_eq!(
            RangeDescriptor::from_segments(&segs(&[Some("Sheet1")])).unwrap(),
            RangeDescriptor::sheet_only("Sheet1")
        );
        assert_eq!(
            RangeDescriptor::from_segments(&segs(&[None, Some("A1"), None])).unwrap(),
            RangeDescriptor::sheet_only("A1")
        );
    }

    #[test]
    fn test_empty_descriptor_is_invalid() {
        let empty: Vec<Option<String>> = Vec::new();
        assert!(matches!(
            address(&empty),
            Err(EngineError::InvalidRange(_))
        ));
        assert!(matches!(
            address(&segs(&[None, Some(""), None])),
            Err(EngineError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_end_without_start_is_invalid() {
        assert!(address(&segs(&[Some("S"), None, Some("B2")])).is_err());
    }

    #[test]
    fn test_too_many_segments() {
        let parts = segs(&[Some("S"), Some("A1"), Some("B2"), Some("C3")]);
        assert!(RangeDescriptor::from_segments(&parts).is_err());
    }

    #[test]
    fn test_no_quoting_of_sheet_names() {
        let d = RangeDescriptor::sheet_and_cell("My Sheet", "A1");
        assert_eq!(d.address(), "My Sheet!A1");
    }

    #[test]
    fn test_parse_inverts_address() {
        for d in [
            RangeDescriptor::sheet_only("Sheet1"),
            RangeDescriptor::sheet_and_cell("Sheet1", "C4"),
            RangeDescriptor::sheet_and_span("Sheet1", "A1", "B2"),
            RangeDescriptor::bare_span("A1", "B2"),
        ] {
            assert_eq!(RangeDescriptor::parse(&d.address()).unwrap(), d);
        }
    }

    #[test]
    fn test_parse_rejects_dangling_parts() {
        assert!(RangeDescriptor::parse("").is_err());
        assert!(RangeDescriptor::parse("S!").is_err());
        assert!(RangeDescriptor::parse("!A1").is_err());
        assert!(RangeDescriptor::parse("A1:").is_err());
    }

    #[test]
    fn test_sheet_accessor() {
        assert_eq!(RangeDescriptor::sheet_and_cell("S", "A1").sheet(), Some("S"));
        assert_eq!(RangeDescriptor::bare_span("A1", "B2").sheet(), None);
    }
}
