use std::collections::BTreeMap;

use crate::models::entry::LedgerEntry;
use crate::models::expense::{Category, Expense};
use crate::models::month::MonthKey;
use crate::models::state::AppState;
use crate::models::summary::{BtcPosition, BudgetStatus, MoneySummary};

/// Net worth, savings rate, monthly scoping and spending breakdowns.
///
/// Pure business logic over a record snapshot, no I/O. Every division
/// guards its denominator and every percentage is clamped to 0–100.
pub struct MoneyService;

impl MoneyService {
    pub fn new() -> Self {
        Self
    }

    /// bank + savings + BTC valued at the manually entered price.
    #[must_use]
    pub fn net_worth(&self, state: &AppState) -> f64 {
        finite(state.bank_balance) + finite(state.savings) + self.btc_value(state)
    }

    /// Current value of the BTC holding.
    #[must_use]
    pub fn btc_value(&self, state: &AppState) -> f64 {
        finite(state.btc_coins) * finite(state.btc_current_price)
    }

    /// Value, cost basis and unrealised gain of the BTC holding.
    #[must_use]
    pub fn btc_position(&self, state: &AppState) -> BtcPosition {
        let coins = finite(state.btc_coins);
        let current_value = self.btc_value(state);
        let cost_basis = coins * finite(state.btc_buy_price);
        let gain_loss = current_value - cost_basis;
        let gain_pct = if cost_basis > 0.0 {
            gain_loss / cost_basis * 100.0
        } else {
            0.0
        };
        BtcPosition {
            coins,
            current_value,
            cost_basis,
            gain_loss,
            gain_pct,
        }
    }

    /// Percent of income left after `monthly_expenses`, within 0–100.
    /// Zero (never NaN) when there is no income.
    #[must_use]
    pub fn savings_rate(&self, income: f64, monthly_expenses: f64) -> f64 {
        let income = finite(income);
        if income <= 0.0 {
            return 0.0;
        }
        ((income - finite(monthly_expenses)) / income * 100.0).clamp(0.0, 100.0)
    }

    /// Expenses whose stored month key equals `month`, in insertion order.
    pub fn expenses_in_month<'a>(&self, state: &'a AppState, month: MonthKey) -> Vec<&'a Expense> {
        state.expenses.iter().filter(|e| e.month == month).collect()
    }

    /// Sum of the expenses stored under `month`.
    #[must_use]
    pub fn monthly_expense_total(&self, state: &AppState, month: MonthKey) -> f64 {
        state
            .expenses
            .iter()
            .filter(|e| e.month == month)
            .map(|e| finite(e.amount))
            .sum()
    }

    /// Income or bill entries stored under `month`.
    pub fn entries_in_month<'a>(&self, entries: &'a [LedgerEntry], month: MonthKey) -> Vec<&'a LedgerEntry> {
        entries.iter().filter(|e| e.month == month).collect()
    }

    /// Sum of income or bill entries stored under `month`.
    #[must_use]
    pub fn entries_total(&self, entries: &[LedgerEntry], month: MonthKey) -> f64 {
        entries
            .iter()
            .filter(|e| e.month == month)
            .map(|e| finite(e.amount))
            .sum()
    }

    /// Spend per category for `month`, built in a single pass.
    /// Categories with no spend are left out.
    pub fn category_totals(&self, state: &AppState, month: MonthKey) -> BTreeMap<Category, f64> {
        let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
        for expense in state.expenses.iter().filter(|e| e.month == month) {
            *totals.entry(expense.category).or_insert(0.0) += finite(expense.amount);
        }
        totals.retain(|_, amount| *amount > 0.0);
        totals
    }

    /// Spend of one category for `month`; 0 for untouched categories.
    #[must_use]
    pub fn spent_in(&self, state: &AppState, category: Category, month: MonthKey) -> f64 {
        state
            .expenses
            .iter()
            .filter(|e| e.month == month && e.category == category)
            .map(|e| finite(e.amount))
            .sum()
    }

    /// Status of every category that has a positive limit, in category order.
    pub fn budget_status(&self, state: &AppState, month: MonthKey) -> Vec<BudgetStatus> {
        let totals = self.category_totals(state, month);
        state
            .budgets
            .iter()
            .filter(|(_, limit)| finite(**limit) > 0.0)
            .map(|(category, limit)| {
                let limit = finite(*limit);
                let spent = totals.get(category).copied().unwrap_or(0.0);
                BudgetStatus {
                    category: *category,
                    limit,
                    spent,
                    remaining: (limit - spent).max(0.0),
                    percent_used: (spent / limit * 100.0).clamp(0.0, 100.0),
                    over_budget: spent > limit,
                }
            })
            .collect()
    }

    /// The last `count` expenses, newest first.
    pub fn recent_expenses<'a>(&self, state: &'a AppState, count: usize) -> Vec<&'a Expense> {
        state.expenses.iter().rev().take(count).collect()
    }

    /// Money overview for `month`.
    #[must_use]
    pub fn summary(&self, state: &AppState, month: MonthKey) -> MoneySummary {
        let monthly_expenses = self.monthly_expense_total(state, month);
        let income = finite(state.income);
        let income_entries_total = self.entries_total(&state.incomes, month);
        let bill_entries_total = self.entries_total(&state.bills, month);

        MoneySummary {
            month,
            net_worth: self.net_worth(state),
            monthly_expenses,
            savings_rate: self.savings_rate(income, monthly_expenses),
            remaining_budget: income - finite(state.fixed_bills) - monthly_expenses,
            income_entries_total,
            bill_entries_total,
            leftover: income_entries_total - bill_entries_total,
        }
    }
}

impl Default for MoneyService {
    fn default() -> Self {
        Self::new()
    }
}

/// Treat non-finite stored values as 0.
pub(crate) fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
