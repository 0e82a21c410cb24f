//! Route planning entry points.
//!
//! [`plan_route`] validates the endpoints, short-circuits same-city
//! requests, runs the A* search, and hands the found path to the route
//! accountant. The search and the accounting read the same edge snapshot,
//! so the reported totals always agree with the costs the search summed.

use serde::Serialize;

use crate::breakdown::{breakdown_over, RouteBreakdown};
use crate::error::{Error, Result};
use crate::network::{CityId, RoadNetwork};
use crate::path::find_route_over;

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
}

impl RouteRequest {
    pub fn new(start: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
        }
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub start: CityId,
    pub goal: CityId,
    pub steps: Vec<CityId>,
    /// Accumulated search cost in minutes, at full precision.
    pub total_minutes: f64,
    pub breakdown: RouteBreakdown,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Resolve the route's city identifiers to names.
    pub fn city_names(&self, network: &RoadNetwork) -> Vec<String> {
        self.steps
            .iter()
            .filter_map(|&id| network.city_name(id).map(String::from))
            .collect()
    }
}

/// Compute the minimum-cost route between two cities.
pub fn plan_route(network: &RoadNetwork, request: &RouteRequest) -> Result<RoutePlan> {
    let start_name = request.start.trim();
    if start_name.is_empty() {
        return Err(Error::MissingParameter { name: "start" });
    }
    let goal_name = request.goal.trim();
    if goal_name.is_empty() {
        return Err(Error::MissingParameter { name: "goal" });
    }

    let start = resolve_city(network, start_name)?;
    let goal = resolve_city(network, goal_name)?;

    if start == goal {
        return Ok(RoutePlan {
            start,
            goal,
            steps: vec![start],
            total_minutes: 0.0,
            breakdown: RouteBreakdown::empty(),
        });
    }

    let edges = network.edges();
    let Some((steps, total_minutes)) = find_route_over(network, &edges, start, goal) else {
        return Err(Error::RouteNotFound {
            start: start_name.to_string(),
            goal: goal_name.to_string(),
        });
    };
    let breakdown = breakdown_over(network, &edges, &steps)?;

    Ok(RoutePlan {
        start,
        goal,
        steps,
        total_minutes,
        breakdown,
    })
}

fn resolve_city(network: &RoadNetwork, name: &str) -> Result<CityId> {
    network.city_id_by_name(name).ok_or_else(|| {
        let suggestions = network.fuzzy_city_matches(name, 3);
        Error::UnknownCity {
            name: name.to_string(),
            suggestions,
        }
    })
}
