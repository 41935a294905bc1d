//! A1-style cell addresses

use crate::error::{Result, SheetEditError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Highest column index in the xlsx format (XFD)
pub const MAX_COLUMN: u32 = 16_384;
/// Highest row index in the xlsx format
pub const MAX_ROW: u32 = 1_048_576;

static CELL_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{1,3})([0-9]{1,7})$").expect("valid regex"));

/// A single cell location, 1-based in both dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    /// Build an address from 1-based indices, checking format bounds
    pub fn new(col: u32, row: u32) -> Option<Self> {
        if (1..=MAX_COLUMN).contains(&col) && (1..=MAX_ROW).contains(&row) {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Parse an address such as "A1" or "xfd1048576"
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| SheetEditError::InvalidAddress {
            address: input.to_string(),
            reason: reason.to_string(),
        };

        if input.is_empty() {
            return Err(invalid("address is empty"));
        }

        let caps = CELL_REF
            .captures(input)
            .ok_or_else(|| invalid("expected column letters followed by a row number"))?;

        let col = letters_to_column(&caps[1]);
        let row: u32 = caps[2]
            .parse()
            .map_err(|_| invalid("row is not a number"))?;

        if row == 0 {
            return Err(invalid("rows start at 1"));
        }
        if col > MAX_COLUMN {
            return Err(invalid("column is beyond XFD"));
        }
        if row > MAX_ROW {
            return Err(invalid("row is beyond 1048576"));
        }

        Ok(Self { row, col })
    }

    /// Column letters for this address (1 -> A, 27 -> AA)
    pub fn column_letters(&self) -> String {
        column_to_letters(self.col)
    }

    /// Coordinate tuple in the (col, row) order the document provider expects
    pub fn coordinate(&self) -> (u32, u32) {
        (self.col, self.row)
    }
}

impl FromStr for CellAddress {
    type Err = SheetEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}

fn letters_to_column(letters: &str) -> u32 {
    letters.chars().fold(0u32, |acc, ch| {
        acc * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
    })
}

/// Convert a 1-based column number to letters
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    result
}
