//! Sheet Mapper - row-wise spreadsheet enrichment
//!
//! Reads a workbook, hands every data row of its first sheet to a mapper
//! and writes the mapper's results into a new trailing column headed
//! `"Output"`. All other sheets pass through with their values and formulas.
//!
//! # Features
//!
//! - Decodes xlsx, xlsm, xlsb, xls and ods (calamine); encodes xlsx (rust_xlsxwriter)
//! - Keyed (`row.get("Score")`) and positional (`values[1]`) row views
//! - Synchronous closures or asynchronous [`AsyncRowMapper`] implementations
//! - Buffer → buffer, file → buffer and file → file entry points
//!
//! # Example
//!
//! ```no_run
//! use sheet_mapper::{transform_file_to_file, KeyedRow, Sheet};
//!
//! transform_file_to_file(
//!     |row: &KeyedRow<'_>, _values: &[Option<String>], _sheet: &Sheet| {
//!         row.number("Score").map(|s| s * 2.0).ok_or("missing score")
//!     },
//!     "scores.xlsx",
//!     "scores_doubled.xlsx",
//! )?;
//! # Ok::<(), sheet_mapper::SheetMapError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use crate::core::{
    map_sheet, map_sheet_async, transform, transform_async, transform_async_with, transform_file,
    transform_file_async, transform_file_async_with, transform_file_to_file,
    transform_file_to_file_async, transform_file_to_file_async_with, transform_file_to_file_with,
    transform_file_with, transform_with, AsyncRowMapper, KeyedRow, MapOptions, TemplateMapper,
};
pub use error::{BoxError, SheetMapError, SheetMapResult};
pub use excel::{CellRef, UsedRange};
pub use types::{Cell, CellValue, Sheet, Workbook};
