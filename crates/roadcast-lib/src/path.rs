use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::cost::{edge_minutes, heuristic_minutes};
use crate::geo::Coordinates;
use crate::network::{CityId, EdgeTable, RoadNetwork};

/// Find the minimum-cost route between `start` and `goal` using A*.
///
/// Returns the ordered path plus its accumulated cost in minutes, or
/// `None` when the goal is unreachable. The whole search runs against one
/// read snapshot of the network's edges.
pub fn find_route(network: &RoadNetwork, start: CityId, goal: CityId) -> Option<(Vec<CityId>, f64)> {
    let edges = network.edges();
    find_route_over(network, &edges, start, goal)
}

/// A* over an already-acquired edge table, so callers can run the search
/// and follow-up accounting against the same snapshot.
pub(crate) fn find_route_over(
    network: &RoadNetwork,
    edges: &EdgeTable,
    start: CityId,
    goal: CityId,
) -> Option<(Vec<CityId>, f64)> {
    if start == goal {
        return Some((vec![start], 0.0));
    }

    let goal_position = network.city(goal)?.position;

    let mut g_score: HashMap<CityId, f64> = HashMap::new();
    let mut parents: HashMap<CityId, Option<CityId>> = HashMap::new();
    let mut queue = BinaryHeap::new();
    let mut order = 0u64;

    g_score.insert(start, 0.0);
    parents.insert(start, None);
    let start_estimate = estimate(network, start, goal_position);
    queue.push(SearchEntry::new(start, 0.0, start_estimate, order));

    while let Some(entry) = queue.pop() {
        let current_cost = match g_score.get(&entry.city) {
            Some(score) if (*score - entry.cost.0).abs() < f64::EPSILON => *score,
            Some(score) if *score < entry.cost.0 => continue,
            Some(score) => *score,
            None => continue,
        };

        if entry.city == goal {
            return Some((reconstruct_path(&parents, start, goal), current_cost));
        }

        let Some(row) = edges.get(entry.city as usize) else {
            continue;
        };
        for (&next, attrs) in row {
            let tentative = current_cost + edge_minutes(attrs);
            if tentative < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative);
                parents.insert(next, Some(entry.city));
                order += 1;
                let heuristic = estimate(network, next, goal_position);
                queue.push(SearchEntry::new(next, tentative, heuristic, order));
            }
        }
    }

    None
}

fn estimate(network: &RoadNetwork, from: CityId, goal_position: Coordinates) -> f64 {
    network
        .city(from)
        .map(|city| heuristic_minutes(city.position, goal_position))
        .unwrap_or(0.0)
}

fn reconstruct_path(
    parents: &HashMap<CityId, Option<CityId>>,
    start: CityId,
    goal: CityId,
) -> Vec<CityId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(city) = current {
        path.push(city);
        if city == start {
            break;
        }
        current = parents.get(&city).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct SearchEntry {
    city: CityId,
    cost: FloatOrd,
    estimate: FloatOrd,
    order: u64,
}

impl SearchEntry {
    fn new(city: CityId, cost: f64, heuristic: f64, order: u64) -> Self {
        Self {
            city,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
            order,
        }
    }
}

impl Ord for SearchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate;
        // equal estimates pop in insertion order for stable output.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for SearchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
