use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entry::LedgerEntry;
use super::expense::{Category, Expense};
use super::goal::{FamilyGoal, Goal};
use super::history::HistorySnapshot;
use super::lenient;
use super::ride::Ride;
use super::transfer::Transfer;

/// The single persisted record. Everything in here is serialized to the store;
/// nothing derived lives here.
///
/// Unknown or malformed fields decode to their defaults instead of
/// rejecting the record, so one bad value never wipes the user's data.
/// Inside collections the unit of loss is a single unreadable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    // ── Daily habits ────────────────────────────────────────────────
    /// Deep-work level, 0–2
    #[serde(deserialize_with = "lenient::level")]
    pub work_focus: u8,

    /// Study level, 0–2
    #[serde(deserialize_with = "lenient::level")]
    pub study: u8,

    #[serde(deserialize_with = "lenient::flag")]
    pub cycling: bool,

    /// Hours slept, 4.0–9.0 in half-hour steps
    #[serde(deserialize_with = "lenient::number")]
    pub sleep: f64,

    /// Mood, 1–5
    #[serde(deserialize_with = "lenient::level")]
    pub mood: u8,

    /// Managed by the caller; nothing in the core increments it
    #[serde(deserialize_with = "lenient::count")]
    pub streak: u32,

    // ── Money ───────────────────────────────────────────────────────
    /// Monthly salary / income
    #[serde(alias = "salary", deserialize_with = "lenient::number")]
    pub income: f64,

    #[serde(deserialize_with = "lenient::number")]
    pub fixed_bills: f64,

    #[serde(alias = "bank", deserialize_with = "lenient::number")]
    pub bank_balance: f64,

    #[serde(deserialize_with = "lenient::number")]
    pub savings: f64,

    #[serde(alias = "btc", deserialize_with = "lenient::number")]
    pub btc_coins: f64,

    #[serde(deserialize_with = "lenient::number")]
    pub btc_buy_price: f64,

    /// Manually entered; there is no live price feed
    #[serde(alias = "btcPrice", deserialize_with = "lenient::number")]
    pub btc_current_price: f64,

    // ── Collections ─────────────────────────────────────────────────
    #[serde(deserialize_with = "lenient::list")]
    pub expenses: Vec<Expense>,
    #[serde(deserialize_with = "lenient::list")]
    pub incomes: Vec<LedgerEntry>,
    #[serde(deserialize_with = "lenient::list")]
    pub bills: Vec<LedgerEntry>,
    #[serde(deserialize_with = "lenient::list")]
    pub goals: Vec<Goal>,
    #[serde(deserialize_with = "lenient::list")]
    pub family_goals: Vec<FamilyGoal>,
    #[serde(deserialize_with = "lenient::list")]
    pub transfers: Vec<Transfer>,
    #[serde(deserialize_with = "lenient::list")]
    pub rides: Vec<Ride>,

    /// Spending limit per category; a missing entry means "no limit"
    #[serde(deserialize_with = "lenient::number_map")]
    pub budgets: BTreeMap<Category, f64>,

    /// Share of shared expenses carried by me, 0–100
    #[serde(deserialize_with = "lenient::number")]
    pub my_contribution_pct: f64,

    // ── History ─────────────────────────────────────────────────────
    #[serde(deserialize_with = "lenient::list")]
    pub history: Vec<HistorySnapshot>,
    #[serde(deserialize_with = "lenient::date")]
    pub last_snapshot_date: Option<NaiveDate>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            work_focus: 1,
            study: 1,
            cycling: false,
            sleep: 7.0,
            mood: 3,
            streak: 0,
            income: 0.0,
            fixed_bills: 0.0,
            bank_balance: 0.0,
            savings: 0.0,
            btc_coins: 0.0,
            btc_buy_price: 0.0,
            btc_current_price: 0.0,
            expenses: Vec::new(),
            incomes: Vec::new(),
            bills: Vec::new(),
            goals: Vec::new(),
            family_goals: Vec::new(),
            transfers: Vec::new(),
            rides: Vec::new(),
            budgets: BTreeMap::new(),
            my_contribution_pct: 50.0,
            history: Vec::new(),
            last_snapshot_date: None,
        }
    }
}

/// Partial record for [`AppState::merge`].
///
/// Merge is shallow: every `Some` field replaces the whole field of the
/// record, `None` leaves it untouched. Collections are never merged
/// element-wise, so callers pass the complete new collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppStatePatch {
    pub work_focus: Option<u8>,
    pub study: Option<u8>,
    pub cycling: Option<bool>,
    pub sleep: Option<f64>,
    pub mood: Option<u8>,
    pub streak: Option<u32>,
    pub income: Option<f64>,
    pub fixed_bills: Option<f64>,
    pub bank_balance: Option<f64>,
    pub savings: Option<f64>,
    pub btc_coins: Option<f64>,
    pub btc_buy_price: Option<f64>,
    pub btc_current_price: Option<f64>,
    pub expenses: Option<Vec<Expense>>,
    pub incomes: Option<Vec<LedgerEntry>>,
    pub bills: Option<Vec<LedgerEntry>>,
    pub goals: Option<Vec<Goal>>,
    pub family_goals: Option<Vec<FamilyGoal>>,
    pub transfers: Option<Vec<Transfer>>,
    pub rides: Option<Vec<Ride>>,
    pub budgets: Option<BTreeMap<Category, f64>>,
    pub my_contribution_pct: Option<f64>,
    pub history: Option<Vec<HistorySnapshot>>,
    /// `Some(None)` clears the stored date
    pub last_snapshot_date: Option<Option<NaiveDate>>,
}

impl AppStatePatch {
    /// True when applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<AppState> for AppStatePatch {
    /// A patch that replaces every field, i.e. the whole record.
    fn from(state: AppState) -> Self {
        Self {
            work_focus: Some(state.work_focus),
            study: Some(state.study),
            cycling: Some(state.cycling),
            sleep: Some(state.sleep),
            mood: Some(state.mood),
            streak: Some(state.streak),
            income: Some(state.income),
            fixed_bills: Some(state.fixed_bills),
            bank_balance: Some(state.bank_balance),
            savings: Some(state.savings),
            btc_coins: Some(state.btc_coins),
            btc_buy_price: Some(state.btc_buy_price),
            btc_current_price: Some(state.btc_current_price),
            expenses: Some(state.expenses),
            incomes: Some(state.incomes),
            bills: Some(state.bills),
            goals: Some(state.goals),
            family_goals: Some(state.family_goals),
            transfers: Some(state.transfers),
            rides: Some(state.rides),
            budgets: Some(state.budgets),
            my_contribution_pct: Some(state.my_contribution_pct),
            history: Some(state.history),
            last_snapshot_date: Some(state.last_snapshot_date),
        }
    }
}

/// Scalar money fields that can be edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyField {
    Income,
    FixedBills,
    BankBalance,
    Savings,
    BtcCoins,
    BtcBuyPrice,
    BtcCurrentPrice,
}

impl MoneyField {
    /// Patch setting this field to `value`.
    pub fn patch(self, value: f64) -> AppStatePatch {
        let mut patch = AppStatePatch::default();
        let slot = match self {
            MoneyField::Income => &mut patch.income,
            MoneyField::FixedBills => &mut patch.fixed_bills,
            MoneyField::BankBalance => &mut patch.bank_balance,
            MoneyField::Savings => &mut patch.savings,
            MoneyField::BtcCoins => &mut patch.btc_coins,
            MoneyField::BtcBuyPrice => &mut patch.btc_buy_price,
            MoneyField::BtcCurrentPrice => &mut patch.btc_current_price,
        };
        *slot = Some(value);
        patch
    }
}

impl AppState {
    /// Produce a new record with `patch` shallow-merged over `self`.
    #[must_use]
    pub fn merge(&self, patch: AppStatePatch) -> AppState {
        let mut next = self.clone();
        next.apply(patch);
        next
    }

    /// Shallow-merge `patch` into `self` in place.
    pub fn apply(&mut self, patch: AppStatePatch) {
        let AppStatePatch {
            work_focus,
            study,
            cycling,
            sleep,
            mood,
            streak,
            income,
            fixed_bills,
            bank_balance,
            savings,
            btc_coins,
            btc_buy_price,
            btc_current_price,
            expenses,
            incomes,
            bills,
            goals,
            family_goals,
            transfers,
            rides,
            budgets,
            my_contribution_pct,
            history,
            last_snapshot_date,
        } = patch;

        replace(&mut self.work_focus, work_focus);
        replace(&mut self.study, study);
        replace(&mut self.cycling, cycling);
        replace(&mut self.sleep, sleep);
        replace(&mut self.mood, mood);
        replace(&mut self.streak, streak);
        replace(&mut self.income, income);
        replace(&mut self.fixed_bills, fixed_bills);
        replace(&mut self.bank_balance, bank_balance);
        replace(&mut self.savings, savings);
        replace(&mut self.btc_coins, btc_coins);
        replace(&mut self.btc_buy_price, btc_buy_price);
        replace(&mut self.btc_current_price, btc_current_price);
        replace(&mut self.expenses, expenses);
        replace(&mut self.incomes, incomes);
        replace(&mut self.bills, bills);
        replace(&mut self.goals, goals);
        replace(&mut self.family_goals, family_goals);
        replace(&mut self.transfers, transfers);
        replace(&mut self.rides, rides);
        replace(&mut self.budgets, budgets);
        replace(&mut self.my_contribution_pct, my_contribution_pct);
        replace(&mut self.history, history);
        replace(&mut self.last_snapshot_date, last_snapshot_date);
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
