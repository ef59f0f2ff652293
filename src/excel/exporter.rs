//! Workbook exporter - in-memory [`Workbook`] → xlsx bytes

use crate::error::SheetMapResult;
use crate::types::{Cell, CellValue, Sheet, Workbook};
use rust_xlsxwriter::{Format, Formula, Worksheet, XlsxError};
use tracing::debug;

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Encodes a workbook as xlsx. Sheet order, names, values and formulas are
/// kept; styles are not.
pub struct WorkbookExporter<'a> {
    workbook: &'a Workbook,
    date_format: Format,
    date_time_format: Format,
}

impl<'a> WorkbookExporter<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        Self {
            workbook,
            date_format: Format::new().set_num_format(DATE_FORMAT),
            date_time_format: Format::new().set_num_format(DATE_TIME_FORMAT),
        }
    }

    /// Serialize to an in-memory xlsx buffer
    pub fn export(&self) -> SheetMapResult<Vec<u8>> {
        let mut output = rust_xlsxwriter::Workbook::new();

        for sheet in &self.workbook.sheets {
            let worksheet = output.add_worksheet();
            worksheet.set_name(sheet.name())?;
            self.export_sheet(worksheet, sheet)?;
        }

        Ok(output.save_to_buffer()?)
    }

    fn export_sheet(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> SheetMapResult<()> {
        let mut written = 0usize;
        for (at, cell) in sheet.cells() {
            let col = u16::try_from(at.col).map_err(|_| XlsxError::RowColumnLimitError)?;
            self.write_cell(worksheet, at.row, col, cell)?;
            written += 1;
        }

        debug!(sheet = sheet.name(), cells = written, "encoded sheet");
        Ok(())
    }

    /// Write a single cell based on its value type
    fn write_cell(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &Cell,
    ) -> SheetMapResult<()> {
        if let Some(formula) = &cell.formula {
            let mut formula = Formula::new(format!("={}", formula));
            let result = cell
                .display
                .clone()
                .or_else(|| Self::cached_result(&cell.value));
            if let Some(result) = result {
                formula = formula.set_result(result);
            }
            worksheet.write_formula(row, col, formula)?;
            return Ok(());
        }

        match &cell.value {
            CellValue::Empty => {}
            CellValue::String(s) | CellValue::Error(s) => {
                worksheet.write_string(row, col, s)?;
            }
            CellValue::Float(f) => {
                worksheet.write_number(row, col, *f)?;
            }
            CellValue::Int(i) => {
                worksheet.write_number(row, col, *i as f64)?;
            }
            CellValue::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            CellValue::DateTime(serial) => {
                let format = if serial.fract() == 0.0 {
                    &self.date_format
                } else {
                    &self.date_time_format
                };
                worksheet.write_number_with_format(row, col, *serial, format)?;
            }
        }
        Ok(())
    }

    fn cached_result(value: &CellValue) -> Option<String> {
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// Encode a whole workbook to xlsx bytes
pub fn encode_workbook(workbook: &Workbook) -> SheetMapResult<Vec<u8>> {
    WorkbookExporter::new(workbook).export()
}
