use crate::core::{
    read_headers, transform_file_to_file_with, KeyedRow, MapOptions, TemplateMapper,
};
use crate::error::{SheetMapError, SheetMapResult};
use crate::excel::{column_index_to_letter, decode_workbook};
use crate::types::Sheet;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Execute the map command
pub fn map(
    input: PathBuf,
    output: PathBuf,
    template: String,
    header: Option<String>,
    no_header: bool,
    verbose: bool,
) -> SheetMapResult<()> {
    println!("{}", "📊 Sheet Mapper - Map".bold().green());
    println!("   Input:    {}", input.display());
    println!("   Output:   {}", output.display());
    println!("   Template: {}\n", template.bright_blue());

    let mapper = TemplateMapper::parse(&template)?;
    if verbose {
        println!("   Placeholders: {:?}", mapper.labels());
    }

    let options = match (no_header, header) {
        (true, _) => MapOptions::new().without_header(),
        (false, Some(label)) => MapOptions::new().with_header(label),
        (false, None) => MapOptions::default(),
    };

    let mut rows = 0u32;
    let written = transform_file_to_file_with(
        |keyed: &KeyedRow<'_>, values: &[Option<String>], sheet: &Sheet| {
            rows += 1;
            mapper.map_row(keyed, values, sheet)
        },
        &input,
        &output,
        &options,
    )?;

    println!("{}", "✅ Map Complete!".bold().green());
    println!("   Rows mapped: {}", rows);
    println!("   Excel file:  {}\n", written.display());

    Ok(())
}

/// Execute the headers command
pub fn headers(input: PathBuf) -> SheetMapResult<()> {
    let bytes = fs::read(&input).map_err(|e| SheetMapError::io(&input, e))?;
    let workbook = decode_workbook(&bytes)?;
    let sheet = workbook.sheets.first().ok_or(SheetMapError::NoSheets)?;
    let range = sheet
        .range()
        .ok_or_else(|| SheetMapError::MissingRange(sheet.name().to_string()))?;

    println!("{}", "📊 Sheet Mapper - Headers".bold().green());
    println!("   File:  {}", input.display());
    println!("   Sheet: {} ({})\n", sheet.name().bright_blue(), range);

    for (offset, label) in read_headers(sheet).iter().enumerate() {
        let letter = column_index_to_letter(range.start.col + offset as u32);
        match label {
            Some(label) => println!("   {:>4}  {}", letter.cyan(), label),
            None => println!("   {:>4}  {}", letter.cyan(), "(blank)".dimmed()),
        }
    }

    // Every row below the header is handed to the mapper, blank or not
    println!("\n   Last row:    {}", range.end.row + 1);
    println!("   Rows to map: {}", range.end.row);
    Ok(())
}
