//! Custom error types for FinFlow
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. The pure engine functions never produce
//! these; they surface from configuration, storage, allocation edits and import.

use thiserror::Error;

use crate::models::{AllocationError, IncomeValidationError, TaxTableError};

/// The main error type for FinFlow operations
#[derive(Error, Debug)]
pub enum FinflowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Statement import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Malformed federal bracket table
    #[error("Tax table error: {0}")]
    TaxTable(String),

    /// Allocation edits that cannot be applied
    #[error("Allocation error: {0}")]
    Allocation(String),
}

impl FinflowError {
    /// Create a "not found" error for sheets
    pub fn sheet_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Sheet",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget item",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FinflowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<AllocationError> for FinflowError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::IndexOutOfRange { index, .. } => {
                Self::item_not_found(format!("index {}", index))
            }
            other => Self::Allocation(other.to_string()),
        }
    }
}

impl From<TaxTableError> for FinflowError {
    fn from(err: TaxTableError) -> Self {
        Self::TaxTable(err.to_string())
    }
}

impl From<IncomeValidationError> for FinflowError {
    fn from(err: IncomeValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for FinFlow operations
pub type FinflowResult<T> = Result<T, FinflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinflowError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FinflowError::sheet_not_found("Jan-2026");
        assert_eq!(err.to_string(), "Sheet not found: Jan-2026");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_item_not_found_error() {
        let err = FinflowError::item_not_found("index 7");
        assert_eq!(err.to_string(), "Budget item not found: index 7");
    }

    #[test]
    fn test_from_allocation_error() {
        let err: FinflowError = AllocationError::IndexOutOfRange { index: 4, len: 2 }.into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Budget item not found: index 4");

        let err: FinflowError = AllocationError::DuplicateCategory("Rent".into()).into();
        assert!(matches!(err, FinflowError::Allocation(_)));
    }

    #[test]
    fn test_from_income_validation_error() {
        let err: FinflowError = IncomeValidationError::NegativeSalary.into();
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinflowError = io_err.into();
        assert!(matches!(err, FinflowError::Io(_)));
    }
}
