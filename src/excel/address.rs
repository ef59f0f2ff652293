//! A1-style cell and range addresses
//!
//! Cells are addressed internally by zero-based `(row, col)` pairs. The A1
//! text form (`B3`, `A1:C10`) only appears at the serialization boundary and
//! in error messages.

use crate::error::{SheetMapError, SheetMapResult};
use std::fmt;
use std::str::FromStr;

/// Largest column index accepted by xlsx (`XFD`).
pub const MAX_COL: u32 = 16_383;

/// Convert a zero-based column index to an Excel column letter
///
/// Examples:
/// - 0 → A
/// - 25 → Z
/// - 26 → AA
pub fn column_index_to_letter(index: u32) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Convert an Excel column letter (case-insensitive) to a zero-based index.
pub fn column_letter_to_index(letters: &str) -> SheetMapResult<u32> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SheetMapError::InvalidAddress(letters.to_string()));
    }

    let mut index: u32 = 0;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(digit))
            .ok_or_else(|| SheetMapError::InvalidAddress(letters.to_string()))?;
    }

    Ok(index - 1)
}

/// Zero-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_index_to_letter(self.col), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = SheetMapError;

    fn from_str(s: &str) -> SheetMapResult<Self> {
        let trimmed = s.trim().replace('$', "");
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| SheetMapError::InvalidAddress(s.to_string()))?;
        let (letters, digits) = trimmed.split_at(split);

        let col = column_letter_to_index(letters)
            .map_err(|_| SheetMapError::InvalidAddress(s.to_string()))?;
        let row: u32 = digits
            .parse()
            .map_err(|_| SheetMapError::InvalidAddress(s.to_string()))?;
        if row == 0 || col > MAX_COL {
            return Err(SheetMapError::InvalidAddress(s.to_string()));
        }

        Ok(CellRef::new(row - 1, col))
    }
}

/// Rectangular bounds of the populated cells of a sheet (inclusive on both
/// ends). Values are never mutated; every adjustment returns a new range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsedRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl UsedRange {
    /// Build a range from two corners in any order.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    pub fn single(cell: CellRef) -> Self {
        Self::new(cell, cell)
    }

    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.row..=self.end.row).contains(&cell.row)
            && (self.start.col..=self.end.col).contains(&cell.col)
    }

    /// Same range with a different end column (end row unchanged).
    pub fn with_end_col(&self, end_col: u32) -> Self {
        Self::new(self.start, CellRef::new(self.end.row, end_col))
    }

    /// Smallest range covering both `self` and `cell`.
    pub fn covering(&self, cell: CellRef) -> Self {
        Self {
            start: CellRef::new(self.start.row.min(cell.row), self.start.col.min(cell.col)),
            end: CellRef::new(self.end.row.max(cell.row), self.end.col.max(cell.col)),
        }
    }
}

impl fmt::Display for UsedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for UsedRange {
    type Err = SheetMapError;

    fn from_str(s: &str) -> SheetMapResult<Self> {
        match s.split_once(':') {
            Some((a, b)) => Ok(UsedRange::new(a.parse()?, b.parse()?)),
            None => Ok(UsedRange::single(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(1), "B");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(27), "AB");
        assert_eq!(column_index_to_letter(701), "ZZ");
        assert_eq!(column_index_to_letter(702), "AAA");
        assert_eq!(column_index_to_letter(MAX_COL), "XFD");
    }

    #[test]
    fn test_column_letter_to_index() {
        assert_eq!(column_letter_to_index("A").unwrap(), 0);
        assert_eq!(column_letter_to_index("z").unwrap(), 25);
        assert_eq!(column_letter_to_index("AA").unwrap(), 26);
        assert_eq!(column_letter_to_index("XFD").unwrap(), MAX_COL);
        assert!(column_letter_to_index("").is_err());
        assert!(column_letter_to_index("A1").is_err());
    }

    #[test]
    fn test_cell_ref_display() {
        assert_eq!(CellRef::new(0, 0).to_string(), "A1");
        assert_eq!(CellRef::new(9, 2).to_string(), "C10");
        assert_eq!(CellRef::new(0, 27).to_string(), "AB1");
    }

    #[test]
    fn test_cell_ref_parse() {
        assert_eq!("A1".parse::<CellRef>().unwrap(), CellRef::new(0, 0));
        assert_eq!("c10".parse::<CellRef>().unwrap(), CellRef::new(9, 2));
        assert_eq!("$B$4".parse::<CellRef>().unwrap(), CellRef::new(3, 1));
        assert!("A0".parse::<CellRef>().is_err());
        assert!("11".parse::<CellRef>().is_err());
        assert!("B".parse::<CellRef>().is_err());
        assert!("XFE1".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_range_display_and_parse() {
        let range: UsedRange = "A1:C3".parse().unwrap();
        assert_eq!(range.start, CellRef::new(0, 0));
        assert_eq!(range.end, CellRef::new(2, 2));
        assert_eq!(range.to_string(), "A1:C3");

        let single: UsedRange = "B2".parse().unwrap();
        assert_eq!(single.to_string(), "B2");
        assert_eq!(single.width(), 1);
        assert_eq!(single.height(), 1);
    }

    #[test]
    fn test_range_normalizes_corners() {
        let range: UsedRange = "C3:A1".parse().unwrap();
        assert_eq!(range.to_string(), "A1:C3");
    }

    #[test]
    fn test_with_end_col_returns_new_range() {
        let range: UsedRange = "A1:B3".parse().unwrap();
        let extended = range.with_end_col(range.end.col + 1);

        assert_eq!(range.to_string(), "A1:B3");
        assert_eq!(extended.to_string(), "A1:C3");
        assert_eq!(extended.width(), 3);
        assert_eq!(extended.height(), 3);
    }

    #[test]
    fn test_covering_and_contains() {
        let range: UsedRange = "B2:C3".parse().unwrap();
        assert!(range.contains(CellRef::new(1, 1)));
        assert!(!range.contains(CellRef::new(0, 0)));

        let grown = range.covering(CellRef::new(0, 4));
        assert_eq!(grown.to_string(), "B1:E3");
        assert_eq!(range.covering(CellRef::new(2, 2)), range);
    }
}
