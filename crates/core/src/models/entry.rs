use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient;
use super::month::MonthKey;

/// Label used when an income entry is added without one.
pub const DEFAULT_INCOME_LABEL: &str = "Commission";

/// Label used when a bill entry is added without one.
pub const DEFAULT_BILL_LABEL: &str = "Payment";

/// A dated income or bill line. Same shape as an expense, minus category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::id")]
    pub id: Uuid,

    #[serde(default)]
    pub label: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,

    pub date: NaiveDate,

    pub month: MonthKey,
}

impl LedgerEntry {
    pub fn new(label: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            amount,
            date,
            month: MonthKey::from_date(date),
        }
    }
}
