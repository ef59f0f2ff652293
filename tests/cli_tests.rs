//! CLI command tests

mod common;

use common::*;
use sheet_mapper::cli::commands;
use sheet_mapper::excel::decode_workbook;
use sheet_mapper::SheetMapError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn output_sheet(path: &Path) -> sheet_mapper::Sheet {
    let bytes = std::fs::read(path).unwrap();
    decode_workbook(&bytes).unwrap().sheets.remove(0)
}

// ═══════════════════════════════════════════════════════════════════════════
// MAP COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_map_renders_template() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "scores.xlsx", &scores_workbook());
    let output = dir.path().join("mapped.xlsx");

    commands::map(
        input,
        output.clone(),
        "{Name}: {Score}".to_string(),
        None,  // header
        false, // no_header
        false, // verbose
    )
    .unwrap();

    let sheet = output_sheet(&output);
    assert_eq!(sheet.display_value(0, 2), Some("Output"));
    assert_eq!(sheet.display_value(1, 2), Some("Alice: 10"));
    assert_eq!(sheet.display_value(2, 2), Some("Bob: 20"));
}

#[test]
fn test_map_custom_header_verbose() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "scores.xlsx", &scores_workbook());
    let output = dir.path().join("sub").join("mapped.xlsx");

    commands::map(
        input,
        output.clone(),
        "{#1}".to_string(),
        Some("Copy".to_string()),
        false,
        true,
    )
    .unwrap();

    let sheet = output_sheet(&output);
    assert_eq!(sheet.display_value(0, 2), Some("Copy"));
    assert_eq!(sheet.display_value(1, 2), Some("10"));
}

#[test]
fn test_map_no_header() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "scores.xlsx", &scores_workbook());
    let output = dir.path().join("mapped.xlsx");

    commands::map(input, output.clone(), "x".to_string(), None, true, false).unwrap();

    let sheet = output_sheet(&output);
    assert!(sheet.cell(0, 2).is_none());
    assert_eq!(sheet.display_value(2, 2), Some("x"));
}

#[test]
fn test_map_invalid_template() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "scores.xlsx", &scores_workbook());
    let output = dir.path().join("mapped.xlsx");

    let result = commands::map(input, output.clone(), "{Name".to_string(), None, false, false);

    assert!(matches!(result, Err(SheetMapError::Template(_))));
    assert!(!output.exists());
}

#[test]
fn test_map_unknown_label_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "scores.xlsx", &scores_workbook());
    let output = dir.path().join("mapped.xlsx");

    let result = commands::map(input, output.clone(), "{Age}".to_string(), None, false, false);

    match result {
        Err(SheetMapError::Mapper(source)) => {
            assert!(source.to_string().contains("Age"), "got: {}", source)
        }
        other => panic!("expected mapper error, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_map_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    let result = commands::map(
        PathBuf::from("nonexistent.xlsx"),
        dir.path().join("out.xlsx"),
        "{Name}".to_string(),
        None,
        false,
        false,
    );
    assert!(matches!(result, Err(SheetMapError::Io { .. })));
}

// ═══════════════════════════════════════════════════════════════════════════
// HEADERS COMMAND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_headers_lists_first_sheet() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "scores.xlsx", &scores_workbook());

    assert!(commands::headers(input).is_ok());
}

#[test]
fn test_headers_empty_sheet() {
    let dir = TempDir::new().unwrap();
    let bytes = build_workbook(&[FixtureSheet::new("Blank", vec![])]);
    let input = write_fixture(dir.path(), "blank.xlsx", &bytes);

    let result = commands::headers(input);
    assert!(matches!(result, Err(SheetMapError::MissingRange(_))));
}

#[test]
fn test_headers_not_a_spreadsheet() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path(), "notes.xlsx", b"plain text");

    let result = commands::headers(input);
    assert!(matches!(result, Err(SheetMapError::Decode(_))));
}
