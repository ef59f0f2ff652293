//! Row views handed to mappers

use std::collections::HashMap;

/// Keyed projection of one data row: header label → display value.
///
/// Built over the same storage as the positional view, so column `i` of
/// both views is the same cell. Columns whose header cell is empty are only
/// reachable positionally.
#[derive(Debug, Clone, Copy)]
pub struct KeyedRow<'a> {
    row: u32,
    labels: &'a [Option<String>],
    values: &'a [Option<String>],
}

impl<'a> KeyedRow<'a> {
    pub fn new(row: u32, labels: &'a [Option<String>], values: &'a [Option<String>]) -> Self {
        Self { row, labels, values }
    }

    /// Zero-based row index in the sheet
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Display value under `label`. `None` when the cell is blank or the
    /// label is unknown; with duplicate labels the rightmost column wins.
    pub fn get(&self, label: &str) -> Option<&'a str> {
        self.columns()
            .filter(|(l, _)| *l == label)
            .last()
            .and_then(|(_, value)| value)
    }

    /// Display value under `label` parsed as a number
    pub fn number(&self, label: &str) -> Option<f64> {
        self.get(label).and_then(|v| v.trim().parse().ok())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.columns().any(|(l, _)| l == label)
    }

    /// Labels in column order
    pub fn labels(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.columns().map(|(label, _)| label)
    }

    /// Materialised keyed view
    pub fn to_map(&self) -> HashMap<&'a str, Option<&'a str>> {
        self.columns().collect()
    }

    fn columns(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + '_ {
        let labels = self.labels;
        self.values.iter().enumerate().filter_map(move |(col, value)| {
            let label = labels.get(col)?.as_deref()?;
            Some((label, value.as_deref()))
        })
    }
}
