//! Bank statement workbook parser.
//!
//! Reads the first worksheet of an `.xlsx` file. The first row holds the
//! headers; every following non-empty row becomes a [`Transaction`].
//!
//! Expected columns:
//!
//! | Column            | Content                                   |
//! |-------------------|-------------------------------------------|
//! | `Fecha`           | date cell, `dd-mm-YYYY` text or ISO text  |
//! | `Detalle`         | description                               |
//! | `Monto cargo ($)` | charged amount, empty = 0                 |
//! | `Monto abono ($)` | credited amount, empty = 0                |
//! | `Saldo ($)`       | balance, empty = 0                        |

use calamine::{Data, DataType, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;
use std::path::Path;

use crate::error::{SheetError, SheetResult};
use crate::models::Transaction;

pub const COL_DATE: &str = "Fecha";
pub const COL_DETAIL: &str = "Detalle";
pub const COL_CHARGE: &str = "Monto cargo ($)";
pub const COL_CREDIT: &str = "Monto abono ($)";
pub const COL_BALANCE: &str = "Saldo ($)";

/// Columns every statement must have.
pub const REQUIRED_COLUMNS: [&str; 5] = [COL_DATE, COL_DETAIL, COL_CHARGE, COL_CREDIT, COL_BALANCE];

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Stand-in for cells past the end of a short row.
static EMPTY_CELL: Data = Data::Empty;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows, in sheet order
    pub transactions: Vec<Transaction>,
    /// Name of the worksheet that was read
    pub sheet_name: String,
    /// Header row as found in the sheet
    pub headers: Vec<String>,
}

/// Parse an xlsx workbook held in memory.
pub fn parse_workbook(bytes: &[u8]) -> SheetResult<ParseResult> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| SheetError::Workbook(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoWorksheet)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)?
        .map_err(|e| SheetError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(SheetError::EmptySheet)?
        .iter()
        .map(|cell| cell_to_text(cell).trim().to_string())
        .collect();

    let index = ColumnIndex::from_headers(&headers)?;

    let mut transactions = Vec::new();
    for (offset, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        // Spreadsheet numbering: header is row 1
        let row_number = offset + 2;
        transactions.push(index.transaction(row, row_number)?);
    }

    Ok(ParseResult {
        transactions,
        sheet_name,
        headers,
    })
}

/// Parse an xlsx workbook from disk.
pub fn parse_workbook_file(path: impl AsRef<Path>) -> SheetResult<ParseResult> {
    let bytes = std::fs::read(path)?;
    parse_workbook(&bytes)
}

/// Positions of the required columns in the header row.
struct ColumnIndex {
    date: usize,
    detail: usize,
    charge: usize,
    credit: usize,
    balance: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> SheetResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SheetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            date: find(COL_DATE)?,
            detail: find(COL_DETAIL)?,
            charge: find(COL_CHARGE)?,
            credit: find(COL_CREDIT)?,
            balance: find(COL_BALANCE)?,
        })
    }

    fn transaction(&self, row: &[Data], row_number: usize) -> SheetResult<Transaction> {
        let cell = |i: usize| row.get(i).unwrap_or(&EMPTY_CELL);
        let invalid = |column: &str, message: String| SheetError::InvalidCell {
            row: row_number,
            column: column.to_string(),
            message,
        };

        Ok(Transaction {
            date: cell_to_date(cell(self.date)).map_err(|m| invalid(COL_DATE, m))?,
            detail: cell_to_text(cell(self.detail)),
            charge: cell_to_amount(cell(self.charge)).map_err(|m| invalid(COL_CHARGE, m))?,
            credit: cell_to_amount(cell(self.credit)).map_err(|m| invalid(COL_CREDIT, m))?,
            balance: cell_to_amount(cell(self.balance)).map_err(|m| invalid(COL_BALANCE, m))?,
        })
    }
}

/// Render a cell as text. Empty cells give an empty string.
pub fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert a date cell to an ISO 8601 date-time string.
///
/// Accepts spreadsheet date cells, `dd-mm-YYYY` text, and ISO text
/// (`YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`).
pub fn cell_to_date(cell: &Data) -> Result<String, String> {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format(ISO_FORMAT).to_string())
            .ok_or_else(|| format!("invalid date: '{}'", cell)),
        Data::String(s) => parse_date_text(s.trim()),
        Data::Empty => Err("missing date".to_string()),
        other => Err(format!("expected a date, got '{}'", other)),
    }
}

fn parse_date_text(text: &str) -> Result<String, String> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%d-%m-%Y") {
        return Ok(midnight(date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(midnight(date));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, ISO_FORMAT) {
        return Ok(dt.format(ISO_FORMAT).to_string());
    }
    Err(format!("unrecognized date '{}' (expected dd-mm-YYYY)", text))
}

fn midnight(date: NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.format(ISO_FORMAT).to_string())
        .unwrap_or_default()
}

/// Convert an amount cell to a number. Empty cells count as zero.
pub fn cell_to_amount(cell: &Data) -> Result<f64, String> {
    match cell {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::Empty => Ok(0.0),
        Data::String(s) if s.trim().is_empty() => Ok(0.0),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("not a number: '{}'", s)),
        other => Err(format!("not a number: '{}'", other)),
    }
}
