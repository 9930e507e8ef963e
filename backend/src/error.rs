//! Error types for the Cartola import pipeline.
//!
//! - [`SheetError`] - workbook reading and row conversion errors
//! - [`NotionError`] - Notion API client errors
//! - [`ImportError`] - top-level import errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Conversion is automatic via `From`, so `?` works across the layers.

use thiserror::Error;

// =============================================================================
// Sheet Errors
// =============================================================================

/// Errors while reading a statement workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The bytes are not a readable xlsx workbook.
    #[error("Invalid workbook: {0}")]
    Workbook(String),

    /// The workbook has no worksheet.
    #[error("Workbook has no worksheet")]
    NoWorksheet,

    /// The first worksheet is empty.
    #[error("Worksheet is empty")]
    EmptySheet,

    /// A required header is missing.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A cell could not be converted.
    #[error("Row {row}, column '{column}': {message}")]
    InvalidCell {
        row: usize,
        column: String,
        message: String,
    },

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Notion Errors
// =============================================================================

/// Errors from the Notion client.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Missing configuration variable.
    #[error("Missing {0} environment variable")]
    MissingConfig(&'static str),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Notion answered with an error.
    #[error("Notion API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level import errors, returned by [`crate::import::import_workbook`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// Workbook error.
    #[error("{0}")]
    Sheet(#[from] SheetError),

    /// Notion error while creating the page for a row.
    #[error("Row {row}: {source}")]
    Notion {
        row: usize,
        #[source]
        source: NotionError,
    },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Import error.
    #[error("{0}")]
    Import(#[from] ImportError),

    /// Invalid request.
    #[error("{0}")]
    BadRequest(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for Notion operations.
pub type NotionResult<T> = Result<T, NotionError>;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
