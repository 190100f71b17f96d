use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Once-a-day record of derived metrics, used for trend charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub date: NaiveDate,

    #[serde(default, deserialize_with = "lenient::number")]
    pub net_worth: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub salary: f64,

    /// Expenses for the month the snapshot was taken in
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_expenses: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub score: f64,

    #[serde(default, deserialize_with = "lenient::level")]
    pub study: u8,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub cycling: bool,
}

/// Per-metric series over the history window, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub dates: Vec<NaiveDate>,
    pub net_worth: Vec<f64>,
    pub salary: Vec<f64>,
    pub expenses: Vec<f64>,
    pub score: Vec<f64>,
    /// 1.0 on days with a ride, 0.0 otherwise
    pub cycling_days: Vec<f64>,
}
