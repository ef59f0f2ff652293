use crate::excel::address::{CellRef, UsedRange};
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Cell Values
//==============================================================================

/// Raw value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    /// Excel serial date-time (days since 1899-12-30)
    DateTime(f64),
    /// Error literal such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) | CellValue::DateTime(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) | CellValue::Error(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) | CellValue::Error(s) => write!(f, "{}", s),
            CellValue::Float(n) | CellValue::DateTime(n) => write!(f, "{}", general_number(*n)),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Format a number the way a spreadsheet's "General" format shows it:
/// rounded to 15 significant digits without trailing zeros, in scientific
/// notation (`1E-10`, `1.5E+20`) outside `1e-9..1e11`.
pub fn general_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if !n.is_finite() {
        return n.to_string();
    }

    let scientific = format!("{:.14e}", n);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-9..=10).contains(&exponent) {
        let rounded: f64 = scientific.parse().unwrap_or(n);
        let decimals = (14 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, rounded)).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}E{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

//==============================================================================
// Cells
//==============================================================================

/// A populated cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    /// Raw value
    pub value: CellValue,
    /// Formatted text as the spreadsheet displays it; only present on cells
    /// that came from a decoded file
    pub display: Option<String>,
    /// Formula text without the leading `=`
    pub formula: Option<String>,
}

impl Cell {
    /// Cell holding only a raw value (what the mapper writes)
    pub fn raw(value: CellValue) -> Self {
        Self {
            value,
            display: None,
            formula: None,
        }
    }

    /// Cell holding a raw value plus its display text
    pub fn decoded(value: CellValue, display: impl Into<String>) -> Self {
        Self {
            value,
            display: Some(display.into()),
            formula: None,
        }
    }
}

//==============================================================================
// Sheets
//==============================================================================

/// One worksheet: populated cells keyed by position, plus the used range
/// that bounds them.
///
/// Storage is sparse, so memory follows the number of populated cells rather
/// than the extent of the range. Iteration is row-major because [`CellRef`]
/// orders by row first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    name: String,
    range: Option<UsedRange>,
    cells: BTreeMap<CellRef, Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Used range, `None` while the sheet is empty
    pub fn range(&self) -> Option<UsedRange> {
        self.range
    }

    /// Cell at an absolute position
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&CellRef::new(row, col))
    }

    /// Display value at an absolute position; `None` for absent cells and
    /// cells that only carry a raw value
    pub fn display_value(&self, row: u32, col: u32) -> Option<&str> {
        self.cell(row, col).and_then(|c| c.display.as_deref())
    }

    /// Raw value at an absolute position
    pub fn value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cell(row, col).map(|c| &c.value)
    }

    /// Replace the cell at an absolute position with a raw value. Positions
    /// outside the used range extend it.
    pub fn set_value(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        self.set_cell(row, col, Cell::raw(value.into()));
    }

    /// Replace the cell at an absolute position. Positions outside the used
    /// range extend it.
    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        let target = CellRef::new(row, col);
        self.range = Some(match self.range {
            Some(range) => range.covering(target),
            None => UsedRange::single(target),
        });
        self.cells.insert(target, cell);
    }

    /// Store a new used range. Cells inside the new range are kept, cells
    /// outside it are dropped.
    pub fn set_range(&mut self, range: UsedRange) {
        let grows = self
            .range
            .map_or(true, |old| range.contains(old.start) && range.contains(old.end));
        if !grows {
            self.cells.retain(|at, _| range.contains(*at));
        }
        self.range = Some(range);
    }

    /// Populated cells in row-major order with their absolute positions
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        self.cells.iter().map(|(at, cell)| (*at, cell))
    }

    /// Populated cells of one row, left to right, as `(col, cell)`
    pub fn row(&self, row: u32) -> impl Iterator<Item = (u32, &Cell)> + '_ {
        self.cells
            .range(CellRef::new(row, 0)..=CellRef::new(row, u32::MAX))
            .map(|(at, cell)| (at.col, cell))
    }
}

//==============================================================================
// Workbooks
//==============================================================================

/// Ordered sequence of named sheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
