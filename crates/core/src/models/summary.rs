use serde::Serialize;

use super::expense::Category;
use super::month::MonthKey;

/// Money overview for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneySummary {
    pub month: MonthKey,

    /// bank + savings + BTC at the current price
    pub net_worth: f64,

    /// Sum of this month's expenses
    pub monthly_expenses: f64,

    /// Percent of income left after monthly expenses, 0–100
    pub savings_rate: f64,

    /// income − fixed bills − monthly expenses (may be negative)
    pub remaining_budget: f64,

    /// Sum of this month's income entries
    pub income_entries_total: f64,

    /// Sum of this month's bill entries
    pub bill_entries_total: f64,

    /// income entries − bill entries (may be negative)
    pub leftover: f64,
}

/// Value and unrealised gain of the manually tracked BTC holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BtcPosition {
    pub coins: f64,
    pub current_value: f64,
    pub cost_basis: f64,
    pub gain_loss: f64,
    /// Percent gain over cost basis; 0 when there is no cost basis
    pub gain_pct: f64,
}

/// Spending against a category limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,
    /// limit − spent, never below 0
    pub remaining: f64,
    /// spent / limit in percent, 0–100
    pub percent_used: f64,
    pub over_budget: bool,
}

/// Shared household spending and my part of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedSpending {
    pub total_shared: f64,
    pub my_share: f64,
    pub partner_share: f64,
}

/// Coarse grade of a daily score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    /// 8 and above
    High,
    /// 5 up to 8
    Mid,
    /// below 5
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::High
        } else if score >= 5.0 {
            ScoreBand::Mid
        } else {
            ScoreBand::Low
        }
    }
}
