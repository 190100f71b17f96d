use crate::config::DEFAULT_ON_TRACK_HORIZON_MONTHS;
use crate::models::goal::{Goal, GoalPace, GoalStep};

use super::money_service::finite;

/// Goal pace and the one-month step actions.
///
/// `on_track` compares progress against the fraction expected by now,
/// assuming each goal spans a fixed horizon `H`:
///
/// ```text
/// current / target >= 1 - months_remaining / H
/// ```
pub struct GoalService {
    horizon_months: u32,
}

impl GoalService {
    pub fn new(horizon_months: u32) -> Self {
        Self {
            horizon_months: horizon_months.max(1),
        }
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    /// Percent complete, capped at 100. Zero for a non-positive target.
    #[must_use]
    pub fn percent_complete(&self, goal: &Goal) -> f64 {
        match self.progress_fraction(goal) {
            Some(fraction) => (fraction * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        }
    }

    /// Amount still needed per remaining month (at least one month).
    #[must_use]
    pub fn monthly_needed(&self, goal: &Goal) -> f64 {
        let left = (finite(goal.target) - finite(goal.current)).max(0.0);
        left / f64::from(goal.months.max(1))
    }

    /// Whether progress meets the expected-by-now fraction.
    #[must_use]
    pub fn on_track(&self, goal: &Goal) -> bool {
        let Some(fraction) = self.progress_fraction(goal) else {
            return false;
        };
        let expected = 1.0 - f64::from(goal.months) / f64::from(self.horizon_months);
        fraction >= expected
    }

    /// All pace figures for a goal.
    #[must_use]
    pub fn pace(&self, goal: &Goal) -> GoalPace {
        GoalPace {
            goal_id: goal.id,
            percent_complete: self.percent_complete(goal),
            monthly_needed: self.monthly_needed(goal),
            on_track: self.on_track(goal),
        }
    }

    /// Move `current` by exactly one month's `monthly_needed`, re-clamped.
    #[must_use]
    pub fn step(&self, goal: &Goal, direction: GoalStep) -> Goal {
        let delta = self.monthly_needed(goal);
        let next = match direction {
            GoalStep::Up => finite(goal.current) + delta,
            GoalStep::Down => finite(goal.current) - delta,
        };
        goal.with_current(next)
    }

    fn progress_fraction(&self, goal: &Goal) -> Option<f64> {
        let target = finite(goal.target);
        (target > 0.0).then(|| finite(goal.current) / target)
    }
}

impl Default for GoalService {
    fn default() -> Self {
        Self::new(DEFAULT_ON_TRACK_HORIZON_MONTHS)
    }
}
