//! # Cartola - bank statement import into Notion
//!
//! Cartola reads bank statement spreadsheets (`.xlsx`) and creates one
//! Notion database page per transaction. It ships the HTTP server behind
//! the upload page and a CLI for local imports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ POST /upload│────▶│   Parser    │────▶│   Import    │────▶│   Notion    │
//! │ (multipart) │     │  (calamine) │     │  (in order) │     │ /v1/pages   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Transaction model and its Notion properties
//! - [`parser`] - Workbook parsing
//! - [`notion`] - Notion API client
//! - [`import`] - Parse-and-push pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Notion
pub mod notion;

// Pipeline
pub mod import;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ImportError, NotionError, ServerError, SheetError};

pub use models::Transaction;

pub use parser::{parse_workbook, parse_workbook_file, ParseResult, REQUIRED_COLUMNS};

pub use notion::{NotionClient, NotionConfig, TransactionSink};

pub use import::{import_workbook, push_all, ImportSummary};

pub use api::types::UploadReply;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
