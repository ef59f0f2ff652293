use std::path::PathBuf;
use thiserror::Error;

use crate::core::TemplateError;

/// Boxed error returned by row mappers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type SheetMapResult<T> = Result<T, SheetMapError>;

#[derive(Error, Debug)]
pub enum SheetMapError {
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode workbook: {0}")]
    Decode(#[from] calamine::Error),

    #[error("Failed to encode workbook: {0}")]
    Encode(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Sheet '{0}' has no used range")]
    MissingRange(String),

    #[error("Row mapper failed: {0}")]
    Mapper(#[source] BoxError),

    #[error("Invalid cell reference: {0}")]
    InvalidAddress(String),

    #[error("Invalid template: {0}")]
    Template(#[from] TemplateError),
}

impl SheetMapError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SheetMapError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = SheetMapError::io(
            "missing.xlsx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let message = err.to_string();
        assert!(message.contains("missing.xlsx"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_mapper_error_keeps_source() {
        use std::error::Error as _;

        let err = SheetMapError::Mapper("score is not numeric".into());
        assert_eq!(err.to_string(), "Row mapper failed: score is not numeric");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("score is not numeric".to_string())
        );
    }

    #[test]
    fn test_structural_messages() {
        assert_eq!(SheetMapError::NoSheets.to_string(), "Workbook contains no sheets");
        assert_eq!(
            SheetMapError::MissingRange("Data".to_string()).to_string(),
            "Sheet 'Data' has no used range"
        );
    }
}
