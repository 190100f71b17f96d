use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default storage key for the persisted record.
pub const DEFAULT_STORAGE_KEY: &str = "habit_ledger_v1";

/// Default number of history snapshots kept (sliding window).
pub const DEFAULT_HISTORY_WINDOW: usize = 30;

/// Default total horizon (months) used for the "On Track" label.
pub const DEFAULT_ON_TRACK_HORIZON_MONTHS: u32 = 24;

/// Long-horizon preset for the "On Track" label.
pub const LONG_ON_TRACK_HORIZON_MONTHS: u32 = 60;

/// Maximum daily score; the weights must not sum above this.
pub const MAX_SCORE: f64 = 10.0;

/// Weight of each habit in the daily score.
///
/// Each habit contributes its normalized value (0.0–1.0) times its weight,
/// so the weights sum to the score reached at maximum inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub work_focus: f64,
    pub study: f64,
    pub cycling: f64,
    pub sleep: f64,
    pub mood: f64,
}

impl ScoreWeights {
    /// Mood-heavy weighting: (2, 2, 1.5, 2, 2.5). The default.
    pub const BALANCED: ScoreWeights = ScoreWeights {
        work_focus: 2.0,
        study: 2.0,
        cycling: 1.5,
        sleep: 2.0,
        mood: 2.5,
    };

    /// Focus-heavy weighting: (2.5, 2, 1.5, 2, 2).
    pub const FOCUS_HEAVY: ScoreWeights = ScoreWeights {
        work_focus: 2.5,
        study: 2.0,
        cycling: 1.5,
        sleep: 2.0,
        mood: 2.0,
    };

    /// Score reached when every habit is at its maximum.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.work_focus + self.study + self.cycling + self.sleep + self.mood
    }

    fn validate(&self) -> Result<(), CoreError> {
        let all = [self.work_focus, self.study, self.cycling, self.sleep, self.mood];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::InvalidConfig(
                "Score weights must be finite and non-negative".into(),
            ));
        }
        // Small tolerance so presets like 2.5 + 2 + 1.5 + 2 + 2 never trip on float noise
        if self.total() > MAX_SCORE + 1e-9 {
            return Err(CoreError::InvalidConfig(format!(
                "Score weights sum to {:.2}, maximum is {MAX_SCORE}",
                self.total()
            )));
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Policy constants that shape derived values.
///
/// None of these are persisted with the record: changing them re-labels
/// existing data on the next read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Key under which the record is stored.
    pub storage_key: String,

    /// Daily score weighting.
    pub score_weights: ScoreWeights,

    /// Total horizon `H` in months for the goal "On Track" label.
    pub on_track_horizon_months: u32,

    /// Number of history snapshots kept.
    pub history_window: usize,

    /// Minimum income before daily history snapshots are recorded.
    /// Snapshots require income strictly greater than this value.
    pub snapshot_min_income: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            score_weights: ScoreWeights::BALANCED,
            on_track_horizon_months: DEFAULT_ON_TRACK_HORIZON_MONTHS,
            history_window: DEFAULT_HISTORY_WINDOW,
            snapshot_min_income: 0.0,
        }
    }
}

impl PolicyConfig {
    /// Alternate preset: focus-heavy weights and a five-year goal horizon.
    pub fn long_horizon() -> Self {
        Self {
            score_weights: ScoreWeights::FOCUS_HEAVY,
            on_track_horizon_months: LONG_ON_TRACK_HORIZON_MONTHS,
            ..Self::default()
        }
    }

    /// Parse and validate a policy from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let config: PolicyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a policy from a TOML file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check every constant is usable.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_storage_key(&self.storage_key)?;
        self.score_weights.validate()?;
        if self.on_track_horizon_months == 0 {
            return Err(CoreError::InvalidConfig(
                "on_track_horizon_months must be at least 1".into(),
            ));
        }
        if self.history_window == 0 {
            return Err(CoreError::InvalidConfig(
                "history_window must be at least 1".into(),
            ));
        }
        if !self.snapshot_min_income.is_finite() || self.snapshot_min_income < 0.0 {
            return Err(CoreError::InvalidConfig(
                "snapshot_min_income must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

/// Storage keys double as file names, so they are restricted to a safe alphabet.
pub fn validate_storage_key(key: &str) -> Result<(), CoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidKey(key.to_string()))
    }
}
