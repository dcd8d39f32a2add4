//! Invoices

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;

/// A billing record. `number` is a detailer-scoped sequence within the
/// creation year; line items are carried as an opaque JSON blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: EntityId,
    pub number: i32,
    pub date_created: NaiveDateTime,
    pub detailer_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub amount_brutto: f64,
    pub positions: serde_json::Value,
}

impl Invoice {
    /// Display number, e.g. "FV/2026/0004"
    pub fn formatted_number(&self) -> String {
        format!("FV/{}/{:04}", self.date_created.year(), self.number)
    }
}

/// Create invoice request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoice {
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(range(min = 0.0))]
    pub amount_brutto: f64,
    /// Line items, stored verbatim
    pub positions: serde_json::Value,
}
