//! Spreadsheet codec boundary
//!
//! - Import: spreadsheet bytes → [`Workbook`](crate::types::Workbook) via calamine
//! - Export: [`Workbook`](crate::types::Workbook) → xlsx bytes via rust_xlsxwriter
//! - Addresses: A1 cell and range references

pub mod address;
mod exporter;
mod importer;

pub use address::{column_index_to_letter, column_letter_to_index, CellRef, UsedRange};
pub use exporter::{encode_workbook, WorkbookExporter};
pub use importer::{decode_workbook, WorkbookImporter};
