//! Workbook importer - spreadsheet bytes → in-memory [`Workbook`]
//!
//! xlsx and xlsb worksheets are streamed cell by cell, so only populated
//! cells are ever held. xls and ods go through calamine's range API, which
//! materialises the bounding rectangle of each sheet.

use crate::error::SheetMapResult;
use crate::types::{general_number, Cell, CellValue, Sheet, Workbook};
use calamine::{
    open_workbook_auto_from_rs, Data, DataRef, Range, Reader, Sheets, Xlsb, Xlsx, XlsxError,
};
use chrono::NaiveDateTime;
use std::io::Cursor;
use tracing::debug;

type Bytes = Cursor<Vec<u8>>;

/// Decodes any container calamine can sniff (xlsx, xlsm, xlsb, xls, ods)
pub struct WorkbookImporter {
    bytes: Vec<u8>,
}

impl WorkbookImporter {
    /// Create an importer over a copy of `bytes`; the caller's buffer is
    /// never touched
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Decode every sheet, in workbook order
    pub fn import(self) -> SheetMapResult<Workbook> {
        let mut source: Sheets<Bytes> = open_workbook_auto_from_rs(Cursor::new(self.bytes))?;
        let mut workbook = Workbook::new();

        for sheet_name in source.sheet_names() {
            let mut sheet = Sheet::new(sheet_name.as_str());
            match &mut source {
                Sheets::Xlsx(xlsx) => Self::stream_xlsx(xlsx, &mut sheet)?,
                Sheets::Xlsb(xlsb) => Self::stream_xlsb(xlsb, &mut sheet)?,
                other => Self::load_ranges(other, &mut sheet)?,
            }

            debug!(
                sheet = %sheet_name,
                range = ?sheet.range().map(|r| r.to_string()),
                "decoded sheet"
            );
            workbook.add_sheet(sheet);
        }

        Ok(workbook)
    }

    fn stream_xlsx(xlsx: &mut Xlsx<Bytes>, sheet: &mut Sheet) -> Result<(), calamine::Error> {
        let name = sheet.name().to_string();

        {
            let mut cells = match xlsx.worksheet_cells_reader(&name) {
                Ok(reader) => reader,
                // Chart sheets carry no cells
                Err(XlsxError::NotAWorksheet(kind)) => {
                    debug!(sheet = %name, kind = %kind, "skipped non-worksheet");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            while let Some(cell) = cells.next_cell()? {
                let (row, col) = cell.get_position();
                Self::put_value(sheet, row, col, cell.get_value());
            }
        }

        let mut formulas = xlsx.worksheet_cells_reader(&name)?;
        while let Some(formula) = formulas.next_formula()? {
            let (row, col) = formula.get_position();
            Self::put_formula(sheet, row, col, formula.get_value());
        }
        Ok(())
    }

    fn stream_xlsb(xlsb: &mut Xlsb<Bytes>, sheet: &mut Sheet) -> Result<(), calamine::Error> {
        let name = sheet.name().to_string();

        {
            let mut cells = xlsb.worksheet_cells_reader(&name)?;
            while let Some(cell) = cells.next_cell()? {
                let (row, col) = cell.get_position();
                Self::put_value(sheet, row, col, cell.get_value());
            }
        }

        let mut formulas = xlsb.worksheet_cells_reader(&name)?;
        while let Some(formula) = formulas.next_formula()? {
            let (row, col) = formula.get_position();
            Self::put_formula(sheet, row, col, formula.get_value());
        }
        Ok(())
    }

    fn load_ranges(source: &mut Sheets<Bytes>, sheet: &mut Sheet) -> Result<(), calamine::Error> {
        let name = sheet.name().to_string();
        let values = source.worksheet_range(&name)?;
        Self::load_values(sheet, &values);

        // Not every container exposes formulas; values are still usable
        match source.worksheet_formula(&name) {
            Ok(formulas) => Self::load_formulas(sheet, &formulas),
            Err(e) => debug!(sheet = %name, error = %e, "no formulas read"),
        }
        Ok(())
    }

    fn load_values(sheet: &mut Sheet, range: &Range<Data>) {
        let Some((start_row, start_col)) = range.start() else {
            return;
        };

        for (row, col, data) in range.used_cells() {
            if let Some(cell) = convert_cell(data) {
                sheet.set_cell(start_row + row as u32, start_col + col as u32, cell);
            }
        }
    }

    fn load_formulas(sheet: &mut Sheet, formulas: &Range<String>) {
        let Some((start_row, start_col)) = formulas.start() else {
            return;
        };

        for (row, col, formula) in formulas.used_cells() {
            Self::put_formula(sheet, start_row + row as u32, start_col + col as u32, formula);
        }
    }

    fn put_value(sheet: &mut Sheet, row: u32, col: u32, value: &DataRef<'_>) {
        if let Some(cell) = convert_cell(&Data::from(value.clone())) {
            sheet.set_cell(row, col, cell);
        }
    }

    fn put_formula(sheet: &mut Sheet, row: u32, col: u32, formula: &str) {
        if formula.is_empty() {
            return;
        }
        let mut cell = sheet.cell(row, col).cloned().unwrap_or_default();
        // calamine strips the leading '='
        cell.formula = Some(formula.trim_start_matches('=').to_string());
        sheet.set_cell(row, col, cell);
    }
}

/// Decode a whole workbook from bytes
pub fn decode_workbook(bytes: &[u8]) -> SheetMapResult<Workbook> {
    WorkbookImporter::new(bytes).import()
}

/// `YYYY-MM-DD` for whole days, `YYYY-MM-DD HH:MM:SS` otherwise
fn iso_date_time(value: NaiveDateTime, serial: f64) -> String {
    if serial.fract() == 0.0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Convert a calamine cell into a raw value plus its display text
fn convert_cell(data: &Data) -> Option<Cell> {
    let cell = match data {
        Data::Empty => return None,
        Data::String(s) => Cell::decoded(CellValue::String(s.clone()), s.as_str()),
        Data::Float(f) => Cell::decoded(CellValue::Float(*f), general_number(*f)),
        Data::Int(i) => Cell::decoded(CellValue::Int(*i), i.to_string()),
        Data::Bool(b) => Cell::decoded(CellValue::Bool(*b), if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => {
            let text = e.to_string();
            Cell::decoded(CellValue::Error(text.clone()), text)
        }
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            let display = dt
                .as_datetime()
                .map(|value| iso_date_time(value, serial))
                .unwrap_or_else(|| general_number(serial));
            Cell::decoded(CellValue::DateTime(serial), display)
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => {
            Cell::decoded(CellValue::String(s.clone()), s.as_str())
        }
    };
    Some(cell)
}
