//! Statement import pipeline: workbook bytes → transactions → Notion pages.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartola::import::import_workbook;
//! use cartola::notion::NotionClient;
//!
//! let sink = NotionClient::from_env()?;
//! let summary = import_workbook(&std::fs::read("cartola.xlsx")?, &sink).await?;
//! println!("Imported {} rows", summary.rows);
//! ```

use serde::Serialize;

use crate::api::logs::{log_error, log_info, log_info_indent, log_success};
use crate::error::{ImportError, ImportResult};
use crate::models::Transaction;
use crate::notion::TransactionSink;
use crate::parser::parse_workbook;

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Rows pushed to the sink
    pub rows: usize,
}

/// Parse `bytes` as a statement and push every row to `sink`, in order.
///
/// Stops at the first row the sink rejects. Rows before it stay imported.
pub async fn import_workbook(
    bytes: &[u8],
    sink: &dyn TransactionSink,
) -> ImportResult<ImportSummary> {
    log_info("📖 Reading workbook...");
    let parsed = parse_workbook(bytes)?;
    log_success(format!(
        "Read {} transactions from sheet '{}'",
        parsed.transactions.len(),
        parsed.sheet_name
    ));

    push_all(&parsed.transactions, sink).await
}

/// Push already parsed transactions to `sink`, in order.
pub async fn push_all(
    transactions: &[Transaction],
    sink: &dyn TransactionSink,
) -> ImportResult<ImportSummary> {
    log_info("📤 Creating Notion pages...");

    for (i, transaction) in transactions.iter().enumerate() {
        sink.push(transaction).await.map_err(|source| {
            log_error(format!("Row {} ({}): {}", i + 1, transaction.detail, source));
            ImportError::Notion { row: i + 1, source }
        })?;
        log_info_indent(format!("{} {}", transaction.date, transaction.detail), 1);
    }

    log_success(format!("Imported {} transactions", transactions.len()));
    Ok(ImportSummary {
        rows: transactions.len(),
    })
}
