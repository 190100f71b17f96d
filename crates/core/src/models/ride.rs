use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient;

/// A logged bike ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::id")]
    pub id: Uuid,

    pub date: NaiveDate,

    /// Distance in kilometres
    #[serde(default, deserialize_with = "lenient::number")]
    pub km: f64,

    /// Average speed in km/h (0 when not recorded)
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_speed: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_race: bool,
}

impl Ride {
    pub fn new(date: NaiveDate, km: f64, avg_speed: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            km,
            avg_speed,
            note: None,
            is_race: false,
        }
    }
}

/// Aggregate cycling statistics. All zero when no rides exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideStats {
    pub total_km: f64,
    pub total_rides: usize,
    pub races: usize,
    pub avg_speed: f64,
    pub best_speed: f64,
    pub longest_ride: f64,
}
