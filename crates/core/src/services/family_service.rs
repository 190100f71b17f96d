use crate::models::goal::FamilyGoal;
use crate::models::state::AppState;
use crate::models::summary::SharedSpending;
use crate::models::transfer::{Contributor, ContributionSplit, Transfer};

use super::money_service::finite;

/// Joint savings and shared household spending.
pub struct FamilyService;

impl FamilyService {
    pub fn new() -> Self {
        Self
    }

    /// Total transferred by one contributor.
    #[must_use]
    pub fn total_for(&self, transfers: &[Transfer], who: Contributor) -> f64 {
        transfers
            .iter()
            .filter(|t| t.who == who)
            .map(|t| finite(t.amount))
            .sum()
    }

    /// Total transferred by both contributors.
    #[must_use]
    pub fn total_saved(&self, transfers: &[Transfer]) -> f64 {
        transfers.iter().map(|t| finite(t.amount)).sum()
    }

    /// Who put in how much. Splits 50/50 while nothing is logged.
    #[must_use]
    pub fn contribution_split(&self, transfers: &[Transfer]) -> ContributionSplit {
        let my_total = self.total_for(transfers, Contributor::Me);
        let partner_total = self.total_for(transfers, Contributor::Partner);
        let total = my_total + partner_total;

        let (my_percent, partner_percent) = if total > 0.0 {
            (my_total / total * 100.0, partner_total / total * 100.0)
        } else {
            (50.0, 50.0)
        };

        ContributionSplit {
            my_total,
            partner_total,
            total,
            my_percent,
            partner_percent,
        }
    }

    /// Progress of a family goal from total transfers, in percent (0–100).
    #[must_use]
    pub fn goal_progress(&self, goal: &FamilyGoal, transfers: &[Transfer]) -> f64 {
        let target = finite(goal.target);
        if target <= 0.0 {
            return 0.0;
        }
        (self.total_saved(transfers) / target * 100.0).clamp(0.0, 100.0)
    }

    /// Total of expenses flagged as shared, split by the contribution slider.
    #[must_use]
    pub fn shared_spending(&self, state: &AppState) -> SharedSpending {
        let total_shared: f64 = state
            .expenses
            .iter()
            .filter(|e| e.shared)
            .map(|e| finite(e.amount))
            .sum();
        let pct = finite(state.my_contribution_pct).clamp(0.0, 100.0);
        let my_share = total_shared * pct / 100.0;

        SharedSpending {
            total_shared,
            my_share,
            partner_share: total_shared - my_share,
        }
    }
}

impl Default for FamilyService {
    fn default() -> Self {
        Self::new()
    }
}
