//! Travel-time cost model shared by the planner and the accountant.
//!
//! Edge costs combine a distance-derived base time with additive traffic
//! and weather delays, multiplied by the edge's risk factor. The search
//! heuristic is straight-line travel time scaled by [`RISK_SLACK`]; road
//! distance always exceeds the great-circle distance and every risk
//! multiplier is at least 1.0, so the estimate stays at or below the real
//! remaining cost for this dataset's attribute ranges.

use crate::geo::{haversine_km, Coordinates};
use crate::network::EdgeAttributes;

/// Assumed average driving speed.
pub const AVERAGE_SPEED_KMH: f64 = 80.0;

/// Kilometres covered per minute at the assumed average speed.
pub const KM_PER_MIN: f64 = AVERAGE_SPEED_KMH / 60.0;

/// Risk allowance folded into the search heuristic.
pub const RISK_SLACK: f64 = 1.05;

/// Estimated traversal time for a directed edge, in minutes.
pub fn edge_minutes(attrs: &EdgeAttributes) -> f64 {
    let base = attrs.distance_km / KM_PER_MIN;
    (base + attrs.traffic_min + attrs.weather_min) * attrs.risk
}

/// Lower-bound estimate of the remaining travel time between two points.
pub fn heuristic_minutes(from: Coordinates, to: Coordinates) -> f64 {
    haversine_km(from, to) / KM_PER_MIN * RISK_SLACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_minutes_combines_delays_and_risk() {
        let edge = EdgeAttributes {
            distance_km: 70.0,
            traffic_min: 15.0,
            weather_min: 0.0,
            risk: 1.03,
        };
        // 70 km at 80 km/h is 52.5 min; plus traffic, times risk.
        assert!((edge_minutes(&edge) - 69.525).abs() < 1e-9);
    }

    #[test]
    fn delay_free_edge_costs_base_time() {
        let edge = EdgeAttributes {
            distance_km: 80.0,
            traffic_min: 0.0,
            weather_min: 0.0,
            risk: 1.0,
        };
        assert!((edge_minutes(&edge) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn heuristic_is_zero_for_same_point() {
        let point = Coordinates::new(17.3850, 78.4867);
        assert_eq!(heuristic_minutes(point, point), 0.0);
    }
}
