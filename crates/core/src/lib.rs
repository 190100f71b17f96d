pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use config::PolicyConfig;
use errors::CoreError;
use models::{
    entry::{LedgerEntry, DEFAULT_BILL_LABEL, DEFAULT_INCOME_LABEL},
    expense::{Category, Expense},
    goal::{FamilyGoal, Goal, GoalPace, GoalStep, DEFAULT_GOAL_MONTHS},
    history::TrendSeries,
    month::MonthKey,
    ride::{Ride, RideStats},
    state::{AppState, AppStatePatch, MoneyField},
    summary::{BtcPosition, BudgetStatus, MoneySummary, ScoreBand, SharedSpending},
    transfer::{ContributionSplit, Contributor, Transfer},
};
use services::{
    family_service::FamilyService, goal_service::GoalService, history_service::HistoryService,
    money_service::MoneyService, ride_service::RideService, score_service::ScoreService,
    validation,
};
use storage::{format, manager::StorageManager, traits::KeyValueStore};

type Clock = Box<dyn Fn() -> NaiveDate>;

/// Main entry point for the Habit Ledger core library.
///
/// Owns the single record, the store it is persisted to, and the services
/// that derive presentation values from it. Every mutation funnels through
/// [`HabitLedger::update`], which merges a patch and persists the full
/// record synchronously.
#[must_use]
pub struct HabitLedger<S: KeyValueStore> {
    state: AppState,
    store: S,
    config: PolicyConfig,
    clock: Clock,
    score_service: ScoreService,
    money_service: MoneyService,
    goal_service: GoalService,
    family_service: FamilyService,
    history_service: HistoryService,
    ride_service: RideService,
}

impl<S: KeyValueStore> std::fmt::Debug for HabitLedger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HabitLedger")
            .field("store", &self.store.name())
            .field("key", &self.config.storage_key)
            .field("expenses", &self.state.expenses.len())
            .field("goals", &self.state.goals.len())
            .field("transfers", &self.state.transfers.len())
            .field("history", &self.state.history.len())
            .finish()
    }
}

impl<S: KeyValueStore> HabitLedger<S> {
    /// Open the record stored under the default key, or start from the
    /// default record if there is none (or it is unreadable).
    ///
    /// Like every `open_*` variant this runs the daily history check once,
    /// so a due snapshot is recorded before the ledger is handed out.
    pub fn open(store: S) -> Self {
        Self::open_with_config(store, PolicyConfig::default())
    }

    /// Open with explicit policy constants, using the local date as today.
    pub fn open_with_config(store: S, config: PolicyConfig) -> Self {
        Self::open_with_clock(store, config, || chrono::Local::now().date_naive())
    }

    /// Open with explicit policy constants and a custom source of "today".
    ///
    /// A config that fails [`PolicyConfig::validate`] is replaced by the
    /// default policy.
    pub fn open_with_clock(
        store: S,
        config: PolicyConfig,
        clock: impl Fn() -> NaiveDate + 'static,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "Invalid policy config, using defaults");
                PolicyConfig::default()
            }
        };
        let state = StorageManager::load(&store, &config.storage_key, AppState::default());
        info!(
            store = store.name(),
            key = %config.storage_key,
            expenses = state.expenses.len(),
            goals = state.goals.len(),
            "Ledger opened"
        );
        let mut ledger = Self::build(store, config, state, Box::new(clock));
        ledger.record_daily_snapshot();
        ledger
    }

    /// Current record snapshot.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Today's date according to the ledger clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Month key of today.
    #[must_use]
    pub fn current_month(&self) -> MonthKey {
        MonthKey::from_date(self.today())
    }

    // ── Update path ─────────────────────────────────────────────────

    /// Shallow-merge `patch` into the record and persist the full record.
    /// The only mutation path; persistence failures are logged and dropped.
    pub fn update(&mut self, patch: AppStatePatch) -> &AppState {
        self.state.apply(patch);
        StorageManager::save(&mut self.store, &self.config.storage_key, &self.state);
        &self.state
    }

    /// Replace the whole record with the default and persist it.
    pub fn reset(&mut self) -> &AppState {
        info!(key = %self.config.storage_key, "Ledger reset to defaults");
        self.update(AppState::default().into())
    }

    /// Export the record as pretty JSON (versioned envelope).
    pub fn export_json(&self) -> Result<String, CoreError> {
        format::encode_pretty(&self.state)
    }

    /// Replace the record with one decoded from JSON. The current record is
    /// left untouched if the input cannot be decoded.
    pub fn import_json(&mut self, json: &str) -> Result<(), CoreError> {
        let imported = format::decode(json)?;
        self.update(imported.into());
        Ok(())
    }

    // ── Daily habits ────────────────────────────────────────────────

    /// Set deep-work level (clamped to 0–2).
    pub fn set_work_focus(&mut self, level: u8) {
        self.update(AppStatePatch {
            work_focus: Some(level.min(2)),
            ..AppStatePatch::default()
        });
    }

    /// Set study level (clamped to 0–2).
    pub fn set_study(&mut self, level: u8) {
        self.update(AppStatePatch {
            study: Some(level.min(2)),
            ..AppStatePatch::default()
        });
    }

    pub fn set_cycling(&mut self, cycled: bool) {
        self.update(AppStatePatch {
            cycling: Some(cycled),
            ..AppStatePatch::default()
        });
    }

    /// Set hours slept, snapped to half hours within 4.0–9.0.
    pub fn set_sleep(&mut self, hours: f64) {
        let hours = if hours.is_finite() {
            ((hours * 2.0).round() / 2.0).clamp(4.0, 9.0)
        } else {
            4.0
        };
        self.update(AppStatePatch {
            sleep: Some(hours),
            ..AppStatePatch::default()
        });
    }

    /// Set mood (clamped to 1–5).
    pub fn set_mood(&mut self, mood: u8) {
        self.update(AppStatePatch {
            mood: Some(mood.clamp(1, 5)),
            ..AppStatePatch::default()
        });
    }

    /// Streak is owned by the caller; the core only stores it.
    pub fn set_streak(&mut self, days: u32) {
        self.update(AppStatePatch {
            streak: Some(days),
            ..AppStatePatch::default()
        });
    }

    // ── Money fields ────────────────────────────────────────────────

    /// Set a scalar money field. Negative or non-finite values store as 0.
    pub fn set_money(&mut self, field: MoneyField, value: f64) {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        self.update(field.patch(value));
    }

    /// Set a scalar money field from form text. Invalid text is a no-op.
    pub fn set_money_input(&mut self, field: MoneyField, raw: &str) -> bool {
        let parsed = validation::parse_optional_non_negative(raw)
            .and_then(|v| v.ok_or_else(|| CoreError::InvalidInput("value is empty".into())));
        match accept("set_money", parsed) {
            Some(value) => {
                self.set_money(field, value);
                true
            }
            None => false,
        }
    }

    /// Set my share of shared expenses (clamped to 0–100).
    pub fn set_my_contribution_pct(&mut self, pct: f64) {
        let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 50.0 };
        self.update(AppStatePatch {
            my_contribution_pct: Some(pct),
            ..AppStatePatch::default()
        });
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Add an expense dated today. Returns `None` (and changes nothing)
    /// when `amount` is empty, non-numeric or not positive.
    pub fn add_expense(&mut self, amount: &str, category: Category, note: &str) -> Option<Uuid> {
        let today = self.today();
        self.add_expense_on(amount, category, note, today)
    }

    /// Add an expense on a specific date.
    pub fn add_expense_on(
        &mut self,
        amount: &str,
        category: Category,
        note: &str,
        date: NaiveDate,
    ) -> Option<Uuid> {
        let amount = accept("add_expense", validation::parse_amount(amount))?;
        let mut expense = Expense::new(amount, category, date);
        expense.note = validation::optional_text(note);
        let id = expense.id;

        let mut expenses = self.state.expenses.clone();
        expenses.push(expense);
        self.update(AppStatePatch {
            expenses: Some(expenses),
            ..AppStatePatch::default()
        });
        Some(id)
    }

    /// Remove an expense by id. Returns whether it existed.
    pub fn remove_expense(&mut self, id: Uuid) -> bool {
        let Some(expenses) = without(&self.state.expenses, |e| e.id == id) else {
            return not_found("Expense", id);
        };
        self.update(AppStatePatch {
            expenses: Some(expenses),
            ..AppStatePatch::default()
        });
        true
    }

    /// Flip the shared flag of an expense. Returns whether it existed.
    pub fn toggle_expense_shared(&mut self, id: Uuid) -> bool {
        if !self.state.expenses.iter().any(|e| e.id == id) {
            return not_found("Expense", id);
        }
        let expenses = self
            .state
            .expenses
            .iter()
            .map(|e| {
                if e.id == id {
                    Expense {
                        shared: !e.shared,
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            })
            .collect();
        self.update(AppStatePatch {
            expenses: Some(expenses),
            ..AppStatePatch::default()
        });
        true
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Set a monthly limit for a category from form text.
    /// Empty text clears the limit; invalid text is a no-op.
    pub fn set_budget(&mut self, category: Category, raw_limit: &str) -> bool {
        let Some(limit) = accept(
            "set_budget",
            validation::parse_optional_non_negative(raw_limit),
        ) else {
            return false;
        };
        let mut budgets = self.state.budgets.clone();
        match limit {
            Some(limit) if limit > 0.0 => {
                budgets.insert(category, limit);
            }
            _ => {
                budgets.remove(&category);
            }
        }
        self.update(AppStatePatch {
            budgets: Some(budgets),
            ..AppStatePatch::default()
        });
        true
    }

    /// Remove the limit of a category.
    pub fn clear_budget(&mut self, category: Category) -> bool {
        if !self.state.budgets.contains_key(&category) {
            return false;
        }
        let mut budgets = self.state.budgets.clone();
        budgets.remove(&category);
        self.update(AppStatePatch {
            budgets: Some(budgets),
            ..AppStatePatch::default()
        });
        true
    }

    // ── Income & bill entries ───────────────────────────────────────

    /// Log an income entry dated today. A blank label becomes "Commission".
    pub fn add_income(&mut self, label: &str, amount: &str) -> Option<Uuid> {
        let amount = accept("add_income", validation::parse_amount(amount))?;
        let label = validation::optional_text(label).unwrap_or_else(|| DEFAULT_INCOME_LABEL.into());
        let entry = LedgerEntry::new(label, amount, self.today());
        let id = entry.id;

        let mut incomes = self.state.incomes.clone();
        incomes.push(entry);
        self.update(AppStatePatch {
            incomes: Some(incomes),
            ..AppStatePatch::default()
        });
        Some(id)
    }

    pub fn remove_income(&mut self, id: Uuid) -> bool {
        let Some(incomes) = without(&self.state.incomes, |e| e.id == id) else {
            return not_found("Income entry", id);
        };
        self.update(AppStatePatch {
            incomes: Some(incomes),
            ..AppStatePatch::default()
        });
        true
    }

    /// Log a bill dated today. A blank label becomes "Payment".
    pub fn add_bill(&mut self, label: &str, amount: &str) -> Option<Uuid> {
        let amount = accept("add_bill", validation::parse_amount(amount))?;
        let label = validation::optional_text(label).unwrap_or_else(|| DEFAULT_BILL_LABEL.into());
        let entry = LedgerEntry::new(label, amount, self.today());
        let id = entry.id;

        let mut bills = self.state.bills.clone();
        bills.push(entry);
        self.update(AppStatePatch {
            bills: Some(bills),
            ..AppStatePatch::default()
        });
        Some(id)
    }

    pub fn remove_bill(&mut self, id: Uuid) -> bool {
        let Some(bills) = without(&self.state.bills, |e| e.id == id) else {
            return not_found("Bill entry", id);
        };
        self.update(AppStatePatch {
            bills: Some(bills),
            ..AppStatePatch::default()
        });
        true
    }

    // ── Goals ───────────────────────────────────────────────────────

    /// Create a goal from form text. Name and a positive target are
    /// required; current defaults to 0 and months to 12.
    pub fn add_goal(&mut self, name: &str, target: &str, current: &str, months: &str) -> Option<Uuid> {
        let parsed = validation::require_name(name).and_then(|name| {
            let target = validation::parse_amount(target)?;
            let current = validation::parse_optional_non_negative(current)?.unwrap_or(0.0);
            let months = validation::parse_optional_months(months)?.unwrap_or(DEFAULT_GOAL_MONTHS);
            Ok(Goal::new(name, target, current, months))
        });
        let goal = accept("add_goal", parsed)?;
        let id = goal.id;

        let mut goals = self.state.goals.clone();
        goals.push(goal);
        self.update(AppStatePatch {
            goals: Some(goals),
            ..AppStatePatch::default()
        });
        Some(id)
    }

    pub fn remove_goal(&mut self, id: Uuid) -> bool {
        let Some(goals) = without(&self.state.goals, |g| g.id == id) else {
            return not_found("Goal", id);
        };
        self.update(AppStatePatch {
            goals: Some(goals),
            ..AppStatePatch::default()
        });
        true
    }

    /// Set a goal's progress, clamped to `[0, target]`.
    /// Returns the stored value, or `None` if the goal does not exist.
    pub fn set_goal_current(&mut self, id: Uuid, value: f64) -> Option<f64> {
        self.replace_goal(id, |goal| goal.with_current(value))
    }

    /// Move a goal's progress up or down by one month's worth.
    /// Returns the new progress, or `None` if the goal does not exist.
    pub fn step_goal(&mut self, id: Uuid, direction: GoalStep) -> Option<f64> {
        let goal_service = &self.goal_service;
        let stepped = self
            .state
            .goals
            .iter()
            .find(|g| g.id == id)
            .map(|g| goal_service.step(g, direction))?;
        self.replace_goal(id, move |_| stepped)
    }

    /// Pace of one goal.
    #[must_use]
    pub fn goal_pace(&self, id: Uuid) -> Option<GoalPace> {
        self.state
            .goals
            .iter()
            .find(|g| g.id == id)
            .map(|g| self.goal_service.pace(g))
    }

    /// Pace of every goal, in goal order.
    #[must_use]
    pub fn goal_paces(&self) -> Vec<GoalPace> {
        self.state
            .goals
            .iter()
            .map(|g| self.goal_service.pace(g))
            .collect()
    }

    // ── Family ──────────────────────────────────────────────────────

    pub fn add_family_goal(&mut self, name: &str, target: &str) -> Option<Uuid> {
        let parsed = validation::require_name(name)
            .and_then(|name| Ok(FamilyGoal::new(name, validation::parse_amount(target)?)));
        let goal = accept("add_family_goal", parsed)?;
        let id = goal.id;

        let mut family_goals = self.state.family_goals.clone();
        family_goals.push(goal);
        self.update(AppStatePatch {
            family_goals: Some(family_goals),
            ..AppStatePatch::default()
        });
        Some(id)
    }

    pub fn remove_family_goal(&mut self, id: Uuid) -> bool {
        let Some(family_goals) = without(&self.state.family_goals, |g| g.id == id) else {
            return not_found("Family goal", id);
        };
        self.update(AppStatePatch {
            family_goals: Some(family_goals),
            ..AppStatePatch::default()
        });
        true
    }

    /// Progress of a family goal from all transfers, in percent.
    #[must_use]
    pub fn family_goal_progress(&self, id: Uuid) -> Option<f64> {
        self.state
            .family_goals
            .iter()
            .find(|g| g.id == id)
            .map(|g| self.family_service.goal_progress(g, &self.state.transfers))
    }

    /// Log a transfer into joint savings, dated today.
    pub fn add_transfer(&mut self, who: Contributor, amount: &str, note: &str) -> Option<Uuid> {
        let amount = accept("add_transfer", validation::parse_amount(amount))?;
        let transfer = Transfer::new(who, amount, self.today(), validation::optional_text(note));
        let id = transfer.id;

        let mut transfers = self.state.transfers.clone();
        transfers.push(transfer);
        self.update(AppStatePatch {
            transfers: Some(transfers),
            ..AppStatePatch::default()
        });
        Some(id)
    }

    pub fn remove_transfer(&mut self, id: Uuid) -> bool {
        let Some(transfers) = without(&self.state.transfers, |t| t.id == id) else {
            return not_found("Transfer", id);
        };
        self.update(AppStatePatch {
            transfers: Some(transfers),
            ..AppStatePatch::default()
        });
        true
    }

    // ── Rides ───────────────────────────────────────────────────────

    /// Log a ride. `km` is required; average speed defaults to 0 and the
    /// date to today.
    pub fn add_ride(
        &mut self,
        date: Option<NaiveDate>,
        km: &str,
        avg_speed: &str,
        note: &str,
        is_race: bool,
    ) -> Option<Uuid> {
        let parsed = validation::parse_amount(km).and_then(|km| {
            let speed = validation::parse_optional_non_negative(avg_speed)?.unwrap_or(0.0);
            Ok((km, speed))
        });
        let (km, speed) = accept("add_ride", parsed)?;
        let mut ride = Ride::new(date.unwrap_or_else(|| self.today()), km, speed);
        ride.note = validation::optional_text(note);
        ride.is_race = is_race;
        let id = ride.id;

        let mut rides = self.state.rides.clone();
        rides.push(ride);
        self.update(AppStatePatch {
            rides: Some(rides),
            ..AppStatePatch::default()
        });
        Some(id)
    }

    pub fn remove_ride(&mut self, id: Uuid) -> bool {
        let Some(rides) = without(&self.state.rides, |r| r.id == id) else {
            return not_found("Ride", id);
        };
        self.update(AppStatePatch {
            rides: Some(rides),
            ..AppStatePatch::default()
        });
        true
    }

    // ── History ─────────────────────────────────────────────────────

    /// Record today's snapshot if one is due. Already run by every `open_*`
    /// variant; calling it again later in the day is a no-op.
    /// Returns whether a snapshot was appended.
    pub fn record_daily_snapshot(&mut self) -> bool {
        let today = self.today();
        match self.history_service.snapshot_patch(&self.state, today) {
            Some(patch) => {
                self.update(patch);
                debug!(date = %today, entries = self.state.history.len(), "History snapshot recorded");
                true
            }
            None => false,
        }
    }

    /// Trend series over the stored history.
    #[must_use]
    pub fn trends(&self) -> TrendSeries {
        self.history_service.trends(&self.state.history)
    }

    // ── Derived values ──────────────────────────────────────────────

    /// Today's habit score, 0.0–10.0.
    #[must_use]
    pub fn daily_score(&self) -> f64 {
        self.score_service.daily_score(&self.state)
    }

    #[must_use]
    pub fn score_band(&self) -> ScoreBand {
        self.score_service.band(&self.state)
    }

    #[must_use]
    pub fn net_worth(&self) -> f64 {
        self.money_service.net_worth(&self.state)
    }

    #[must_use]
    pub fn btc_position(&self) -> BtcPosition {
        self.money_service.btc_position(&self.state)
    }

    /// Savings rate for the current month.
    #[must_use]
    pub fn savings_rate(&self) -> f64 {
        let spent = self
            .money_service
            .monthly_expense_total(&self.state, self.current_month());
        self.money_service.savings_rate(self.state.income, spent)
    }

    /// Money overview for the current month.
    #[must_use]
    pub fn money_summary(&self) -> MoneySummary {
        self.money_service.summary(&self.state, self.current_month())
    }

    /// Money overview for any month.
    #[must_use]
    pub fn money_summary_for(&self, month: MonthKey) -> MoneySummary {
        self.money_service.summary(&self.state, month)
    }

    /// Expenses of the current month, in insertion order.
    #[must_use]
    pub fn expenses_this_month(&self) -> Vec<&Expense> {
        self.money_service
            .expenses_in_month(&self.state, self.current_month())
    }

    /// Income entries of the current month.
    #[must_use]
    pub fn incomes_this_month(&self) -> Vec<&LedgerEntry> {
        self.money_service
            .entries_in_month(&self.state.incomes, self.current_month())
    }

    /// Bill entries of the current month.
    #[must_use]
    pub fn bills_this_month(&self) -> Vec<&LedgerEntry> {
        self.money_service
            .entries_in_month(&self.state.bills, self.current_month())
    }

    /// The last `count` expenses, newest first.
    #[must_use]
    pub fn recent_expenses(&self, count: usize) -> Vec<&Expense> {
        self.money_service.recent_expenses(&self.state, count)
    }

    /// Current-month spend per category (zero categories omitted).
    #[must_use]
    pub fn category_totals(&self) -> BTreeMap<Category, f64> {
        self.money_service
            .category_totals(&self.state, self.current_month())
    }

    /// Current-month status of every category with a limit.
    #[must_use]
    pub fn budget_status(&self) -> Vec<BudgetStatus> {
        self.money_service
            .budget_status(&self.state, self.current_month())
    }

    #[must_use]
    pub fn contribution_split(&self) -> ContributionSplit {
        self.family_service.contribution_split(&self.state.transfers)
    }

    #[must_use]
    pub fn shared_spending(&self) -> SharedSpending {
        self.family_service.shared_spending(&self.state)
    }

    #[must_use]
    pub fn ride_stats(&self) -> RideStats {
        self.ride_service.stats(&self.state.rides)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn replace_goal(&mut self, id: Uuid, change: impl FnOnce(&Goal) -> Goal) -> Option<f64> {
        let Some(idx) = self.state.goals.iter().position(|g| g.id == id) else {
            not_found("Goal", id);
            return None;
        };
        let mut goals = self.state.goals.clone();
        let changed = change(&goals[idx]);
        // Re-clamp whatever the change produced
        let current = changed.clamp_current(changed.current);
        goals[idx] = Goal { current, ..changed };
        self.update(AppStatePatch {
            goals: Some(goals),
            ..AppStatePatch::default()
        });
        Some(current)
    }

    fn build(store: S, config: PolicyConfig, state: AppState, clock: Clock) -> Self {
        Self {
            score_service: ScoreService::new(config.score_weights),
            money_service: MoneyService::new(),
            goal_service: GoalService::new(config.on_track_horizon_months),
            family_service: FamilyService::new(),
            history_service: HistoryService::new(&config),
            ride_service: RideService::new(),
            clock,
            state,
            store,
            config,
        }
    }
}

/// Turn a rejected input into a logged no-op.
fn accept<T>(action: &'static str, result: Result<T, CoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(action, error = %e, "Input rejected");
            None
        }
    }
}

fn not_found(kind: &'static str, id: Uuid) -> bool {
    let e = CoreError::EntityNotFound {
        kind,
        id: id.to_string(),
    };
    debug!(error = %e, "Nothing to change");
    false
}

/// Copy of `items` without the first match, or `None` when nothing matches.
fn without<T: Clone>(items: &[T], matches: impl Fn(&T) -> bool) -> Option<Vec<T>> {
    let idx = items.iter().position(matches)?;
    let mut next = items.to_vec();
    next.remove(idx);
    Some(next)
}
