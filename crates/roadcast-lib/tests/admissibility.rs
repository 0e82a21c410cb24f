//! Exhaustive validation that the search heuristic never overestimates the
//! true remaining cost, and that the planner therefore returns true
//! minimum-cost routes. Reference optima come from an independent
//! relaxation-based shortest path computed against the same cost model.

use std::sync::Arc;

use roadcast_lib::cost::{edge_minutes, heuristic_minutes};
use roadcast_lib::{
    bundled_network, find_route, CityId, Coordinates, RoadNetwork, WeatherIngestor,
    WeatherProvider, WeatherReport,
};

/// Bellman-Ford style relaxation; no heuristic involved, so it serves as
/// an independent ground truth for the A* results.
fn optimal_costs(network: &RoadNetwork, start: CityId) -> Vec<f64> {
    let count = network.city_count();
    let mut dist = vec![f64::INFINITY; count];
    dist[start as usize] = 0.0;

    for _ in 0..count {
        let mut changed = false;
        for city in network.cities() {
            let from = city.id as usize;
            if !dist[from].is_finite() {
                continue;
            }
            for (to, attrs) in network.neighbors(city.id) {
                let candidate = dist[from] + edge_minutes(&attrs);
                if candidate + 1e-12 < dist[to as usize] {
                    dist[to as usize] = candidate;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    dist
}

fn assert_heuristic_admissible(network: &RoadNetwork) {
    for start in network.cities() {
        let optima = optimal_costs(network, start.id);
        for goal in network.cities() {
            if start.id == goal.id {
                continue;
            }
            let estimate = heuristic_minutes(start.position, goal.position);
            let optimal = optima[goal.id as usize];
            assert!(
                estimate <= optimal + 1e-9,
                "{} -> {}: heuristic {estimate} exceeds optimal {optimal}",
                start.name,
                goal.name
            );
        }
    }
}

fn assert_planner_is_optimal(network: &RoadNetwork) {
    for start in network.cities() {
        let optima = optimal_costs(network, start.id);
        for goal in network.cities() {
            if start.id == goal.id {
                continue;
            }
            let (_, total) = find_route(network, start.id, goal.id).expect("route exists");
            let optimal = optima[goal.id as usize];
            assert!(
                (total - optimal).abs() < 1e-9,
                "{} -> {}: planner {total} vs optimal {optimal}",
                start.name,
                goal.name
            );
        }
    }
}

#[test]
fn heuristic_is_admissible_on_the_bundled_network() {
    let network = bundled_network().expect("bundled network parses");
    assert_heuristic_admissible(&network);
}

#[test]
fn planner_matches_independent_optima_on_the_bundled_network() {
    let network = bundled_network().expect("bundled network parses");
    assert_planner_is_optimal(&network);
}

struct Pinned(WeatherReport);

impl WeatherProvider for Pinned {
    fn observe(&self, _position: Coordinates) -> roadcast_lib::Result<WeatherReport> {
        Ok(self.0.clone())
    }
}

#[test]
fn properties_hold_after_a_worst_case_weather_sweep() {
    let network = bundled_network().expect("bundled network parses");
    let ingestor = WeatherIngestor::new(Arc::new(Pinned(WeatherReport::for_condition("Tornado"))));
    ingestor.refresh(&network);

    // Delays and risk only grow edge costs, so the unchanged heuristic must
    // still lower-bound them, and the planner must still be optimal.
    assert_heuristic_admissible(&network);
    assert_planner_is_optimal(&network);
}
