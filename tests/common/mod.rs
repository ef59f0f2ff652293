//! Shared fixtures: small xlsx workbooks built with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::{Formula, Workbook};
use std::path::{Path, PathBuf};

/// One fixture cell
#[derive(Debug, Clone)]
pub enum Value {
    Text(&'static str),
    Number(f64),
    Flag(bool),
    Formula(&'static str),
    Blank,
}

pub use Value::{Blank, Flag, Formula as F, Number as N, Text as T};

/// A sheet given as rows of cells, starting at A1
pub struct FixtureSheet {
    pub name: &'static str,
    pub rows: Vec<Vec<Value>>,
}

impl FixtureSheet {
    pub fn new(name: &'static str, rows: Vec<Vec<Value>>) -> Self {
        Self { name, rows }
    }
}

pub fn build_workbook(sheets: &[FixtureSheet]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for fixture in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(fixture.name).unwrap();
        for (row, cells) in fixture.rows.iter().enumerate() {
            for (col, value) in cells.iter().enumerate() {
                let (row, col) = (row as u32, col as u16);
                match value {
                    Value::Text(s) => {
                        worksheet.write_string(row, col, *s).unwrap();
                    }
                    Value::Number(n) => {
                        worksheet.write_number(row, col, *n).unwrap();
                    }
                    Value::Flag(b) => {
                        worksheet.write_boolean(row, col, *b).unwrap();
                    }
                    Value::Formula(f) => {
                        worksheet.write_formula(row, col, Formula::new(*f)).unwrap();
                    }
                    Value::Blank => {}
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Name/Score sheet from the README walkthrough
pub fn scores_workbook() -> Vec<u8> {
    build_workbook(&[FixtureSheet::new(
        "Scores",
        vec![
            vec![T("Name"), T("Score")],
            vec![T("Alice"), N(10.0)],
            vec![T("Bob"), N(20.0)],
        ],
    )])
}

/// `rows` data rows under a single `Id` header
pub fn numbered_workbook(rows: u32) -> Vec<u8> {
    let mut data = vec![vec![T("Id")]];
    for i in 1..=rows {
        data.push(vec![N(i as f64)]);
    }
    build_workbook(&[FixtureSheet::new("Numbers", data)])
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
