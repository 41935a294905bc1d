//! Error types for workbook operations

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SheetEditError>;

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing workbook file or worksheet
    NotFound,
    /// Malformed cell address, bad sheet name, missing value or bad config
    InvalidArgument,
    /// Failure creating, reading or saving a workbook
    Io,
}

#[derive(Debug, Error)]
pub enum SheetEditError {
    #[error("Excel file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Worksheet '{sheet}' not found in {}", .path.display())]
    WorksheetNotFound { sheet: String, path: PathBuf },

    #[error("Invalid cell address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid worksheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    #[error("A value is required to write cell {0}")]
    MissingValue(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process workbook {}: {message}", .path.display())]
    Document { path: PathBuf, message: String },
}

impl SheetEditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SheetEditError::FileNotFound(_) | SheetEditError::WorksheetNotFound { .. } => {
                ErrorKind::NotFound
            }
            SheetEditError::InvalidAddress { .. }
            | SheetEditError::InvalidSheetName { .. }
            | SheetEditError::MissingValue(_)
            | SheetEditError::InvalidConfig(_) => ErrorKind::InvalidArgument,
            SheetEditError::Io { .. } | SheetEditError::Document { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SheetEditError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn document(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SheetEditError::Document {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            SheetEditError::FileNotFound(PathBuf::from("a.xlsx")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SheetEditError::MissingValue("A1".to_string()).kind(),
            ErrorKind::InvalidArgument
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(SheetEditError::io("a.xlsx", io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_messages_name_the_subject() {
        let err = SheetEditError::WorksheetNotFound {
            sheet: "Data".to_string(),
            path: PathBuf::from("book.xlsx"),
        };
        assert_eq!(err.to_string(), "Worksheet 'Data' not found in book.xlsx");
    }
}
