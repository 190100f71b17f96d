use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient;

/// Who made a savings transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contributor {
    Me,
    /// Older records tagged the partner as "wife"
    #[serde(alias = "wife")]
    Partner,
}

impl std::fmt::Display for Contributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Contributor::Me => write!(f, "You"),
            Contributor::Partner => write!(f, "Partner"),
        }
    }
}

/// One contribution to the joint savings pot. The log is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::id")]
    pub id: Uuid,

    pub who: Contributor,

    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub date: NaiveDate,
}

impl Transfer {
    pub fn new(who: Contributor, amount: f64, date: NaiveDate, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            who,
            amount,
            note: note.filter(|n| !n.trim().is_empty()),
            date,
        }
    }
}

/// Derived split of joint savings between the two contributors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSplit {
    pub my_total: f64,
    pub partner_total: f64,
    pub total: f64,
    /// Share of the total contributed by me; 50 when nothing is logged yet
    pub my_percent: f64,
    pub partner_percent: f64,
}
