//! Row mapping pass over the first sheet of a workbook
//!
//! Row 0 is the header row. Every later row up to the end of the used range
//! is projected into a [`KeyedRow`] and a positional slice, handed to the
//! mapper, and the result lands in a new trailing column.

use crate::core::row::KeyedRow;
use crate::error::{BoxError, SheetMapError, SheetMapResult};
use crate::excel::{decode_workbook, encode_workbook};
use crate::types::{CellValue, Sheet, Workbook};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Label written above the new column unless overridden
pub const DEFAULT_HEADER: &str = "Output";

/// Mapping options
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Header label for the new column; `None` leaves the header cell unwritten
    pub header: Option<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            header: Some(DEFAULT_HEADER.to_string()),
        }
    }
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn without_header(mut self) -> Self {
        self.header = None;
        self
    }
}

/// Mapper whose work needs to await (lookups, network calls).
///
/// Calls are strictly sequential: each one completes before the next row
/// is built.
#[async_trait]
pub trait AsyncRowMapper: Send {
    async fn map_row(
        &mut self,
        keyed: &KeyedRow<'_>,
        values: &[Option<String>],
        sheet: &Sheet,
    ) -> Result<CellValue, BoxError>;
}

/// Header labels of the used range, one per column, taken from raw values
/// in row 0
pub fn read_headers(sheet: &Sheet) -> Vec<Option<String>> {
    let Some(range) = sheet.range() else {
        return Vec::new();
    };

    (range.start.col..=range.end.col)
        .map(|col| {
            sheet
                .value(0, col)
                .filter(|value| !value.is_empty())
                .map(CellValue::to_string)
        })
        .collect()
}

/// Bookkeeping shared by the synchronous and asynchronous passes
struct MapPass {
    headers: Vec<Option<String>>,
    destination_column: u32,
    end_row: u32,
    view_width: u32,
}

impl MapPass {
    /// Write the header cell and extend the used range by one column
    fn prepare(sheet: &mut Sheet, options: &MapOptions) -> SheetMapResult<Self> {
        let range = sheet
            .range()
            .ok_or_else(|| SheetMapError::MissingRange(sheet.name().to_string()))?;

        let headers = read_headers(sheet);
        let destination_column = headers.len() as u32;
        let new_end_column = range.end.col + 1;

        if let Some(header) = &options.header {
            sheet.set_value(0, destination_column, header.as_str());
        }

        let current = sheet.range().unwrap_or(range);
        sheet.set_range(current.with_end_col(new_end_column));

        debug!(
            sheet = sheet.name(),
            range = %range,
            headers = headers.len(),
            destination = destination_column,
            "prepared mapping pass"
        );

        Ok(Self {
            headers,
            destination_column,
            end_row: range.end.row,
            view_width: new_end_column,
        })
    }

    /// Data rows, header excluded
    fn rows(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.end_row
    }

    /// Positional view of a row: display values for columns
    /// `0..view_width`, `None` where the cell is absent
    fn values(&self, sheet: &Sheet, row: u32) -> Vec<Option<String>> {
        let mut values = vec![None; self.view_width as usize];
        for (col, cell) in sheet.row(row).take_while(|(col, _)| *col < self.view_width) {
            values[col as usize] = cell.display.clone();
        }
        values
    }

    fn write(&self, sheet: &mut Sheet, row: u32, value: CellValue) {
        trace!(row, value = %value, "mapped row");
        sheet.set_value(row, self.destination_column, value);
    }
}

//==============================================================================
// In-memory passes
//==============================================================================

/// Map every data row of `sheet` in place. Returns the number of rows mapped.
pub fn map_sheet<F, V, E>(
    sheet: &mut Sheet,
    mut mapper: F,
    options: &MapOptions,
) -> SheetMapResult<u32>
where
    F: FnMut(&KeyedRow<'_>, &[Option<String>], &Sheet) -> Result<V, E>,
    V: Into<CellValue>,
    E: Into<BoxError>,
{
    let pass = MapPass::prepare(sheet, options)?;

    let mut mapped = 0;
    for row in pass.rows() {
        let values = pass.values(sheet, row);
        let keyed = KeyedRow::new(row, &pass.headers, &values);
        let output =
            mapper(&keyed, &values, &*sheet).map_err(|e| SheetMapError::Mapper(e.into()))?;
        pass.write(sheet, row, output.into());
        mapped += 1;
    }

    debug!(sheet = sheet.name(), rows = mapped, "mapped sheet");
    Ok(mapped)
}

/// Asynchronous counterpart of [`map_sheet`]
pub async fn map_sheet_async<M>(
    sheet: &mut Sheet,
    mapper: &mut M,
    options: &MapOptions,
) -> SheetMapResult<u32>
where
    M: AsyncRowMapper + ?Sized,
{
    let pass = MapPass::prepare(sheet, options)?;

    let mut mapped = 0;
    for row in pass.rows() {
        let values = pass.values(sheet, row);
        let keyed = KeyedRow::new(row, &pass.headers, &values);
        let output = mapper
            .map_row(&keyed, &values, &*sheet)
            .await
            .map_err(SheetMapError::Mapper)?;
        pass.write(sheet, row, output);
        mapped += 1;
    }

    debug!(sheet = sheet.name(), rows = mapped, "mapped sheet");
    Ok(mapped)
}

fn first_sheet(workbook: &mut Workbook) -> SheetMapResult<&mut Sheet> {
    workbook.sheets.first_mut().ok_or(SheetMapError::NoSheets)
}

//==============================================================================
// Buffer → buffer
//==============================================================================

/// Map the first sheet of an in-memory workbook and return the re-encoded
/// bytes. The input buffer is left untouched.
pub fn transform<F, V, E>(mapper: F, input: &[u8]) -> SheetMapResult<Vec<u8>>
where
    F: FnMut(&KeyedRow<'_>, &[Option<String>], &Sheet) -> Result<V, E>,
    V: Into<CellValue>,
    E: Into<BoxError>,
{
    transform_with(mapper, input, &MapOptions::default())
}

pub fn transform_with<F, V, E>(
    mapper: F,
    input: &[u8],
    options: &MapOptions,
) -> SheetMapResult<Vec<u8>>
where
    F: FnMut(&KeyedRow<'_>, &[Option<String>], &Sheet) -> Result<V, E>,
    V: Into<CellValue>,
    E: Into<BoxError>,
{
    let mut workbook = decode_workbook(input)?;
    map_sheet(first_sheet(&mut workbook)?, mapper, options)?;
    encode_workbook(&workbook)
}

pub async fn transform_async<M>(mapper: &mut M, input: &[u8]) -> SheetMapResult<Vec<u8>>
where
    M: AsyncRowMapper + ?Sized,
{
    transform_async_with(mapper, input, &MapOptions::default()).await
}

pub async fn transform_async_with<M>(
    mapper: &mut M,
    input: &[u8],
    options: &MapOptions,
) -> SheetMapResult<Vec<u8>>
where
    M: AsyncRowMapper + ?Sized,
{
    let mut workbook = decode_workbook(input)?;
    map_sheet_async(first_sheet(&mut workbook)?, mapper, options).await?;
    encode_workbook(&workbook)
}

//==============================================================================
// File → buffer
//==============================================================================

pub fn transform_file<F, V, E>(
    mapper: F,
    input_path: impl AsRef<Path>,
) -> SheetMapResult<Vec<u8>>
where
    F: FnMut(&KeyedRow<'_>, &[Option<String>], &Sheet) -> Result<V, E>,
    V: Into<CellValue>,
    E: Into<BoxError>,
{
    transform_file_with(mapper, input_path, &MapOptions::default())
}

pub fn transform_file_with<F, V, E>(
    mapper: F,
    input_path: impl AsRef<Path>,
    options: &MapOptions,
) -> SheetMapResult<Vec<u8>>
where
    F: FnMut(&KeyedRow<'_>, &[Option<String>], &Sheet) -> Result<V, E>,
    V: Into<CellValue>,
    E: Into<BoxError>,
{
    let input_path = input_path.as_ref();
    let input = std::fs::read(input_path).map_err(|e| SheetMapError::io(input_path, e))?;
    debug!(path = %input_path.display(), bytes = input.len(), "read input");
    transform_with(mapper, &input, options)
}

pub async fn transform_file_async<M>(
    mapper: &mut M,
    input_path: impl AsRef<Path>,
) -> SheetMapResult<Vec<u8>>
where
    M: AsyncRowMapper + ?Sized,
{
    transform_file_async_with(mapper, input_path, &MapOptions::default()).await
}

pub async fn transform_file_async_with<M>(
    mapper: &mut M,
    input_path: impl AsRef<Path>,
    options: &MapOptions,
) -> SheetMapResult<Vec<u8>>
where
    M: AsyncRowMapper + ?Sized,
{
    let input_path = input_path.as_ref();
    let input = tokio::fs::read(input_path)
        .await
        .map_err(|e| SheetMapError::io(input_path, e))?;
    debug!(path = %input_path.display(), bytes = input.len(), "read input");
    transform_async_with(mapper, &input, options).await
}

//==============================================================================
// File → file
//==============================================================================

/// Map `input_path` and write the result to `output_path`, creating missing
/// parent directories. Returns the output path.
pub fn transform_file_to_file<F, V, E>(
    mapper: F,
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> SheetMapResult<PathBuf>
where
    F: FnMut(&KeyedRow<'_>, &[Option<String>], &Sheet) -> Result<V, E>,
    V: Into<CellValue>,
    E: Into<BoxError>,
{
    transform_file_to_file_with(mapper, input_path, output_path, &MapOptions::default())
}

pub fn transform_file_to_file_with<F, V, E>(
    mapper: F,
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    options: &MapOptions,
) -> SheetMapResult<PathBuf>
where
    F: FnMut(&KeyedRow<'_>, &[Option<String>], &Sheet) -> Result<V, E>,
    V: Into<CellValue>,
    E: Into<BoxError>,
{
    let output = transform_file_with(mapper, input_path, options)?;
    let output_path = output_path.as_ref();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SheetMapError::io(parent, e))?;
    }
    std::fs::write(output_path, &output).map_err(|e| SheetMapError::io(output_path, e))?;
    debug!(path = %output_path.display(), bytes = output.len(), "wrote output");

    Ok(output_path.to_path_buf())
}

pub async fn transform_file_to_file_async<M>(
    mapper: &mut M,
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> SheetMapResult<PathBuf>
where
    M: AsyncRowMapper + ?Sized,
{
    transform_file_to_file_async_with(mapper, input_path, output_path, &MapOptions::default())
        .await
}

pub async fn transform_file_to_file_async_with<M>(
    mapper: &mut M,
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    options: &MapOptions,
) -> SheetMapResult<PathBuf>
where
    M: AsyncRowMapper + ?Sized,
{
    let output = transform_file_async_with(mapper, input_path, options).await?;
    let output_path = output_path.as_ref();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SheetMapError::io(parent, e))?;
    }
    tokio::fs::write(output_path, &output)
        .await
        .map_err(|e| SheetMapError::io(output_path, e))?;
    debug!(path = %output_path.display(), bytes = output.len(), "wrote output");

    Ok(output_path.to_path_buf())
}
