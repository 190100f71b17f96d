use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient;

/// Duration used when a goal is created without one.
pub const DEFAULT_GOAL_MONTHS: u32 = 12;

/// A personal savings goal.
///
/// `current` always stays within `[0, target]`; every constructor and
/// mutator goes through [`Goal::clamp_current`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::id")]
    pub id: Uuid,

    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub target: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub current: f64,

    /// Months remaining
    #[serde(default = "default_months", deserialize_with = "lenient::count")]
    pub months: u32,
}

fn default_months() -> u32 {
    DEFAULT_GOAL_MONTHS
}

impl Goal {
    pub fn new(name: impl Into<String>, target: f64, current: f64, months: u32) -> Self {
        let mut goal = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target,
            current,
            months: months.max(1),
        };
        goal.current = goal.clamp_current(current);
        goal
    }

    /// Clamp a candidate progress value into `[0, target]`.
    #[must_use]
    pub fn clamp_current(&self, value: f64) -> f64 {
        let upper = self.target.max(0.0);
        if value.is_finite() {
            value.clamp(0.0, upper)
        } else {
            0.0
        }
    }

    /// Return a copy with `current` set (and clamped).
    #[must_use]
    pub fn with_current(&self, value: f64) -> Self {
        Self {
            current: self.clamp_current(value),
            ..self.clone()
        }
    }
}

/// A household goal. Progress is derived from total transfers, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGoal {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::id")]
    pub id: Uuid,

    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub target: f64,
}

impl FamilyGoal {
    pub fn new(name: impl Into<String>, target: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target,
        }
    }
}

/// Derived pace of a goal. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPace {
    pub goal_id: Uuid,

    /// Progress in percent, capped at 100
    pub percent_complete: f64,

    /// Amount still to save per remaining month
    pub monthly_needed: f64,

    /// Progress meets the expected-by-now fraction
    pub on_track: bool,
}

impl GoalPace {
    /// Display label for the pace status.
    pub fn status_label(&self) -> &'static str {
        if self.on_track {
            "On Track"
        } else {
            "Behind"
        }
    }
}

/// Direction of a one-month goal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStep {
    /// Add one month's worth of savings
    Up,
    /// Undo one month's worth of savings
    Down,
}
