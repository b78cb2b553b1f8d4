//! A1 cell reference parsing and formatting.
//!
//! Converts between grid notation ("A1", "B2", "AA100") and zero-indexed
//! column/row coordinates. Transports use this to resolve addressing strings
//! into concrete cell positions; the range addresser itself never validates
//! references.
//!
//! # Examples
//!
//! ```ignore
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1);  // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("valid A1 regex")
    })
}

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from A1 notation (e.g., "A1", "b2", "AA10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name.trim())?;
        let col = Self::letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(col, row))
    }

    /// Convert column letters to a zero-based index ("A" -> 0, "AA" -> 26).
    pub fn letters_to_col(letters: &str) -> Option<usize> {
        if letters.is_empty() {
            return None;
        }
        let mut acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            if !c.is_ascii_uppercase() {
                return None;
            }
            let digit = (c - b'A') as usize + 1;
            acc = acc.checked_mul(26)?.checked_add(digit)?;
        }
        acc.checked_sub(1)
    }

    /// Convert column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_row_zero_is_invalid() {
        assert!(CellRef::from_str("A0").is_none());
    }

    #[test]
    fn test_letters_round_trip() {
        for col in [0usize, 25, 26, 51, 52, 701, 702, 16_383] {
            let letters = CellRef::col_to_letters(col);
            assert_eq!(CellRef::letters_to_col(&letters), Some(col));
        }
    }

    #[test]
    fn test_display_uses_one_based_rows() {
        assert_eq!(CellRef::new(27, 9).to_string(), "AB10");
    }
}
