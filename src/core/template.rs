//! String-template mapper
//!
//! `{Label}` expands to the keyed display value of that column, `{#N}` to the
//! positional value at zero-based column `N`. Blank cells expand to nothing.
//! `{{` and `}}` produce literal braces.

use crate::core::row::KeyedRow;
use crate::types::{CellValue, Sheet};
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("pattern error: {0}")]
    Pattern(String),

    #[error("unbalanced '{brace}' at byte {position}")]
    UnbalancedBrace { brace: char, position: usize },

    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),

    #[error("invalid column index '{0}'")]
    InvalidIndex(String),

    #[error("unknown column label '{0}'")]
    UnknownLabel(String),

    #[error("column {index} is outside the row ({width} columns)")]
    IndexOutOfRange { index: usize, width: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Label(String),
    Index(usize),
}

/// Mapper that renders a template per row
#[derive(Debug, Clone)]
pub struct TemplateMapper {
    source: String,
    segments: Vec<Segment>,
}

impl TemplateMapper {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let pattern = Regex::new(r"\{\{|\}\}|\{([^{}]*)\}")
            .map_err(|e| TemplateError::Pattern(e.to_string()))?;

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for captures in pattern.captures_iter(template) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            Self::push_literal(&mut literal, template, last, whole.start())?;
            last = whole.end();

            match whole.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                _ => {
                    let inner = captures.get(1).map_or("", |m| m.as_str()).trim();
                    if inner.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder(whole.start()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Self::placeholder(inner)?);
                }
            }
        }
        Self::push_literal(&mut literal, template, last, template.len())?;
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Template text as given
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Column labels referenced by `{Label}` placeholders, in order
    pub fn labels(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Label(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn render(
        &self,
        keyed: &KeyedRow<'_>,
        values: &[Option<String>],
    ) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Label(label) => {
                    if !keyed.contains(label) {
                        return Err(TemplateError::UnknownLabel(label.clone()));
                    }
                    out.push_str(keyed.get(label).unwrap_or_default());
                }
                Segment::Index(index) => {
                    let value = values.get(*index).ok_or(TemplateError::IndexOutOfRange {
                        index: *index,
                        width: values.len(),
                    })?;
                    out.push_str(value.as_deref().unwrap_or_default());
                }
            }
        }
        Ok(out)
    }

    /// Row mapper entry point; the sheet is not consulted
    pub fn map_row(
        &self,
        keyed: &KeyedRow<'_>,
        values: &[Option<String>],
        _sheet: &Sheet,
    ) -> Result<CellValue, TemplateError> {
        self.render(keyed, values).map(CellValue::String)
    }

    fn placeholder(inner: &str) -> Result<Segment, TemplateError> {
        match inner.strip_prefix('#') {
            Some(digits) => digits
                .trim()
                .parse()
                .map(Segment::Index)
                .map_err(|_| TemplateError::InvalidIndex(digits.to_string())),
            None => Ok(Segment::Label(inner.to_string())),
        }
    }

    /// Append `template[from..to]`, rejecting stray braces
    fn push_literal(
        literal: &mut String,
        template: &str,
        from: usize,
        to: usize,
    ) -> Result<(), TemplateError> {
        let text = &template[from..to];
        if let Some(offset) = text.find(|c: char| c == '{' || c == '}') {
            let brace = text[offset..].chars().next().unwrap_or('{');
            return Err(TemplateError::UnbalancedBrace {
                brace,
                position: from + offset,
            });
        }
        literal.push_str(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(items: &[Option<&str>]) -> Vec<Option<String>> {
        items.iter().map(|i| i.map(str::to_string)).collect()
    }

    fn render(template: &str, values: &[Option<&str>]) -> Result<String, TemplateError> {
        let labels = owned(&[Some("Name"), Some("Score")]);
        let values = owned(values);
        let keyed = KeyedRow::new(1, &labels, &values);
        TemplateMapper::parse(template)?.render(&keyed, &values)
    }

    #[test]
    fn test_labels_and_literals() {
        assert_eq!(
            render("{Name} scored {Score}", &[Some("Alice"), Some("10")]).unwrap(),
            "Alice scored 10"
        );
    }

    #[test]
    fn test_positional_placeholders() {
        assert_eq!(
            render("{#1}/{#0}", &[Some("Bob"), Some("20")]).unwrap(),
            "20/Bob"
        );
    }

    #[test]
    fn test_blank_cells_render_empty() {
        assert_eq!(render("[{Score}]", &[Some("Carol"), None]).unwrap(), "[]");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(
            render("{{{Name}}}", &[Some("Dave"), None]).unwrap(),
            "{Dave}"
        );
    }

    #[test]
    fn test_labels_listed_in_order() {
        let mapper = TemplateMapper::parse("{Score}-{#0}-{Name}").unwrap();
        assert_eq!(mapper.labels(), vec!["Score", "Name"]);
        assert_eq!(mapper.source(), "{Score}-{#0}-{Name}");
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(
            render("{Missing}", &[Some("Eve"), None]),
            Err(TemplateError::UnknownLabel("Missing".to_string()))
        );
    }

    #[test]
    fn test_index_out_of_range() {
        assert_eq!(
            render("{#5}", &[Some("Eve"), None]),
            Err(TemplateError::IndexOutOfRange { index: 5, width: 2 })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            TemplateMapper::parse("open { brace").unwrap_err(),
            TemplateError::UnbalancedBrace {
                brace: '{',
                position: 5
            }
        );
        assert_eq!(
            TemplateMapper::parse("a}").unwrap_err(),
            TemplateError::UnbalancedBrace {
                brace: '}',
                position: 1
            }
        );
        assert_eq!(
            TemplateMapper::parse("x{}").unwrap_err(),
            TemplateError::EmptyPlaceholder(1)
        );
        assert_eq!(
            TemplateMapper::parse("{#one}").unwrap_err(),
            TemplateError::InvalidIndex("one".to_string())
        );
    }

    #[test]
    fn test_map_row_returns_string_cell() {
        let labels = owned(&[Some("Name")]);
        let values = owned(&[Some("Frank")]);
        let keyed = KeyedRow::new(3, &labels, &values);
        let mapper = TemplateMapper::parse("Hi {Name}").unwrap();

        assert_eq!(
            mapper.map_row(&keyed, &values, &Sheet::new("S")).unwrap(),
            CellValue::from("Hi Frank")
        );
    }
}
