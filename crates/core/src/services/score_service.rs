use crate::config::{ScoreWeights, MAX_SCORE};
use crate::models::state::AppState;
use crate::models::summary::ScoreBand;

/// Computes the daily habit score (0.0–10.0, one decimal).
///
/// Each habit is normalized into 0.0–1.0 and multiplied by its weight:
///
/// ```text
/// score = min(10, round1(
///     (workFocus/2)   * w_focus +
///     (study/2)       * w_study +
///     (cycling ? w_cycle : 0) +
///     ((sleep-4)/5)   * w_sleep +
///     ((mood-1)/4)    * w_mood ))
/// ```
///
/// Inputs outside their ranges are clamped first, so a corrupt record can
/// never push the score outside 0–10.
pub struct ScoreService {
    weights: ScoreWeights,
}

impl ScoreService {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Daily score for the habit fields of `state`.
    #[must_use]
    pub fn daily_score(&self, state: &AppState) -> f64 {
        let w = &self.weights;

        let focus = f64::from(state.work_focus.min(2)) / 2.0;
        let study = f64::from(state.study.min(2)) / 2.0;
        let cycle = if state.cycling { 1.0 } else { 0.0 };
        let sleep = if state.sleep.is_finite() {
            (state.sleep.clamp(4.0, 9.0) - 4.0) / 5.0
        } else {
            0.0
        };
        let mood = (f64::from(state.mood.clamp(1, 5)) - 1.0) / 4.0;

        let raw = focus * w.work_focus
            + study * w.study
            + cycle * w.cycling
            + sleep * w.sleep
            + mood * w.mood;

        round1(raw).clamp(0.0, MAX_SCORE)
    }

    /// Grade of today's score.
    #[must_use]
    pub fn band(&self, state: &AppState) -> ScoreBand {
        ScoreBand::from_score(self.daily_score(state))
    }
}

impl Default for ScoreService {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
