//! Route accounting: per-leg and aggregate travel metrics for a found path.

use serde::Serialize;

use crate::cost::KM_PER_MIN;
use crate::error::{Error, Result};
use crate::network::{CityId, EdgeTable, RoadNetwork};

/// Metrics for one edge traversal of a route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub traffic_min: f64,
    pub weather_min: f64,
    pub risk: f64,
    pub estimated_time_min: f64,
}

/// Aggregate metrics for a route, plus the per-leg records.
///
/// Values are rounded for reporting (2 decimal places, 3 for risk);
/// accumulation happens at full precision before rounding.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteBreakdown {
    pub total_distance_km: f64,
    pub total_traffic_min: f64,
    pub total_weather_min: f64,
    pub risk_extra_time_min: f64,
    pub estimated_total_time_min: f64,
    pub legs: Vec<RouteLeg>,
}

impl RouteBreakdown {
    /// The all-zero breakdown of a single-city route.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Recompute the breakdown for a path against the network's current edges.
pub fn breakdown_for_path(network: &RoadNetwork, path: &[CityId]) -> Result<RouteBreakdown> {
    let edges = network.edges();
    breakdown_over(network, &edges, path)
}

pub(crate) fn breakdown_over(
    network: &RoadNetwork,
    edges: &EdgeTable,
    path: &[CityId],
) -> Result<RouteBreakdown> {
    let mut total_distance = 0.0;
    let mut total_traffic = 0.0;
    let mut total_weather = 0.0;
    let mut risk_extra = 0.0;
    let mut total_time = 0.0;
    let mut legs = Vec::new();

    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let Some(attrs) = edges.get(from as usize).and_then(|row| row.get(&to)) else {
            return Err(Error::BrokenLeg {
                from: city_label(network, from),
                to: city_label(network, to),
            });
        };

        let base = attrs.distance_km / KM_PER_MIN;
        let with_delays = base + attrs.traffic_min + attrs.weather_min;
        let with_risk = with_delays * attrs.risk;

        total_distance += attrs.distance_km;
        total_traffic += attrs.traffic_min;
        total_weather += attrs.weather_min;
        risk_extra += with_risk - with_delays;
        total_time += with_risk;

        legs.push(RouteLeg {
            from: city_label(network, from),
            to: city_label(network, to),
            distance_km: round2(attrs.distance_km),
            traffic_min: round2(attrs.traffic_min),
            weather_min: round2(attrs.weather_min),
            risk: round3(attrs.risk),
            estimated_time_min: round2(with_risk),
        });
    }

    Ok(RouteBreakdown {
        total_distance_km: round2(total_distance),
        total_traffic_min: round2(total_traffic),
        total_weather_min: round2(total_weather),
        risk_extra_time_min: round2(risk_extra),
        estimated_total_time_min: round2(total_time),
        legs,
    })
}

fn city_label(network: &RoadNetwork, id: CityId) -> String {
    network.city_name(id).unwrap_or("?").to_string()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
