use chrono::NaiveDate;

use crate::config::PolicyConfig;
use crate::models::history::{HistorySnapshot, TrendSeries};
use crate::models::month::MonthKey;
use crate::models::state::{AppState, AppStatePatch};
use crate::services::money_service::MoneyService;
use crate::services::score_service::ScoreService;

/// Daily history snapshots and the trend series built from them.
///
/// History is append-only apart from the sliding window: at most one
/// snapshot per calendar day, oldest evicted once the window is full.
/// Snapshots are produced as patches so they go through the normal
/// update path like every other mutation.
pub struct HistoryService {
    window: usize,
    min_income: f64,
    score_service: ScoreService,
    money_service: MoneyService,
}

impl HistoryService {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            window: config.history_window.max(1),
            min_income: config.snapshot_min_income,
            score_service: ScoreService::new(config.score_weights),
            money_service: MoneyService::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Whether a snapshot should be taken on `today`: income is configured
    /// and nothing has been recorded for this calendar day yet.
    #[must_use]
    pub fn is_due(&self, state: &AppState, today: NaiveDate) -> bool {
        if !(state.income.is_finite() && state.income > self.min_income) {
            return false;
        }
        let recorded_today = state.last_snapshot_date == Some(today)
            || state.history.last().is_some_and(|s| s.date == today);
        !recorded_today
    }

    /// Build today's snapshot from the current record.
    #[must_use]
    pub fn snapshot(&self, state: &AppState, today: NaiveDate) -> HistorySnapshot {
        let month = MonthKey::from_date(today);
        HistorySnapshot {
            date: today,
            net_worth: self.money_service.net_worth(state),
            salary: state.income,
            total_expenses: self.money_service.monthly_expense_total(state, month),
            score: self.score_service.daily_score(state),
            study: state.study,
            cycling: state.cycling,
        }
    }

    /// Patch appending today's snapshot, or `None` when not due.
    #[must_use]
    pub fn snapshot_patch(&self, state: &AppState, today: NaiveDate) -> Option<AppStatePatch> {
        if !self.is_due(state, today) {
            return None;
        }
        let history = push_windowed(&state.history, self.snapshot(state, today), self.window);
        Some(AppStatePatch {
            history: Some(history),
            last_snapshot_date: Some(Some(today)),
            ..AppStatePatch::default()
        })
    }

    /// Per-metric series for charts, oldest first.
    #[must_use]
    pub fn trends(&self, history: &[HistorySnapshot]) -> TrendSeries {
        let mut series = TrendSeries::default();
        for snap in history {
            series.dates.push(snap.date);
            series.net_worth.push(snap.net_worth);
            series.salary.push(snap.salary);
            series.expenses.push(snap.total_expenses);
            series.score.push(snap.score);
            series.cycling_days.push(if snap.cycling { 1.0 } else { 0.0 });
        }
        series
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

/// Append `snapshot` and keep only the most recent `window` entries.
/// A zero window keeps one entry, matching [`HistoryService::new`].
pub fn push_windowed(
    history: &[HistorySnapshot],
    snapshot: HistorySnapshot,
    window: usize,
) -> Vec<HistorySnapshot> {
    let window = window.max(1);
    let mut next = Vec::with_capacity(window);
    let keep_from = (history.len() + 1).saturating_sub(window);
    next.extend(history.iter().skip(keep_from).cloned());
    next.push(snapshot);
    next
}
