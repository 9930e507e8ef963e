//! Domain models.
//!
//! A [`Transaction`] is one row of a bank statement. It serializes to the
//! Notion page properties of the target database.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One statement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// ISO 8601 date-time, e.g. `2024-03-05T00:00:00`
    pub date: String,
    /// Free-text description
    pub detail: String,
    /// Amount charged (debit)
    pub charge: f64,
    /// Amount credited
    pub credit: f64,
    /// Balance after the movement
    pub balance: f64,
}

impl Transaction {
    /// Notion `properties` object for this row.
    ///
    /// Property names must match the columns of the target database.
    pub fn to_notion_properties(&self) -> Value {
        json!({
            "Fecha": { "date": { "start": self.date } },
            "Detalle": { "title": [ { "text": { "content": self.detail } } ] },
            "Monto Cargo ($)": { "number": self.charge },
            "Monto Abono ($)": { "number": self.credit },
            "Saldo ($)": { "number": self.balance },
        })
    }
}
