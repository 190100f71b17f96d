use crate::models::ride::{Ride, RideStats};

use super::money_service::finite;

/// Cycling totals and personal bests.
pub struct RideService;

impl RideService {
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn stats(&self, rides: &[Ride]) -> RideStats {
        if rides.is_empty() {
            return RideStats::default();
        }

        let mut stats = RideStats {
            total_rides: rides.len(),
            ..RideStats::default()
        };
        let mut speed_sum = 0.0;

        for ride in rides {
            let km = finite(ride.km);
            let speed = finite(ride.avg_speed);
            stats.total_km += km;
            speed_sum += speed;
            stats.best_speed = stats.best_speed.max(speed);
            stats.longest_ride = stats.longest_ride.max(km);
            if ride.is_race {
                stats.races += 1;
            }
        }

        stats.avg_speed = speed_sum / rides.len() as f64;
        stats
    }

    /// The last `count` rides, newest first.
    pub fn recent<'a>(&self, rides: &'a [Ride], count: usize) -> Vec<&'a Ride> {
        rides.iter().rev().take(count).collect()
    }
}

impl Default for RideService {
    fn default() -> Self {
        Self::new()
    }
}
