use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Identifier assigned to each city at load time.
pub type CityId = u32;

/// A route endpoint: unique name plus coordinate. Immutable after load.
#[derive(Debug, Clone)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub position: Coordinates,
}

/// Attributes of one directed road segment.
///
/// `distance_km` and `traffic_min` are fixed at load time; `weather_min`
/// and `risk` are rewritten by weather ingestion. Absent delay fields
/// default to zero and absent risk to 1.0 when the dataset is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttributes {
    pub distance_km: f64,
    #[serde(default)]
    pub traffic_min: f64,
    #[serde(default)]
    pub weather_min: f64,
    #[serde(default = "default_risk")]
    pub risk: f64,
}

fn default_risk() -> f64 {
    1.0
}

/// Adjacency rows indexed by source [`CityId`]. `BTreeMap` keeps neighbor
/// iteration deterministic, which keeps planner output stable.
pub(crate) type EdgeTable = Vec<BTreeMap<CityId, EdgeAttributes>>;

/// In-memory road network: an immutable city table plus an interlocked
/// adjacency store.
///
/// Route queries read the adjacency under a shared lock; weather ingestion
/// takes the exclusive lock once per city so a forward/reverse edge pair is
/// never visible half-updated.
#[derive(Debug)]
pub struct RoadNetwork {
    cities: Vec<City>,
    name_to_id: HashMap<String, CityId>,
    edges: RwLock<EdgeTable>,
}

impl RoadNetwork {
    pub(crate) fn new(cities: Vec<City>, edges: EdgeTable) -> Self {
        let name_to_id = cities
            .iter()
            .map(|city| (city.name.clone(), city.id))
            .collect();
        Self {
            cities,
            name_to_id,
            edges: RwLock::new(edges),
        }
    }

    /// Number of cities in the network.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Lookup a city record by identifier.
    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id as usize)
    }

    /// Iterate all cities in identifier order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    /// Lookup a city identifier by its case-sensitive name.
    pub fn city_id_by_name(&self, name: &str) -> Option<CityId> {
        self.name_to_id.get(name).copied()
    }

    /// Lookup a city name by identifier.
    pub fn city_name(&self, id: CityId) -> Option<&str> {
        self.cities.get(id as usize).map(|city| city.name.as_str())
    }

    /// All city names, alphabetically sorted.
    pub fn city_names_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cities.iter().map(|city| city.name.clone()).collect();
        names.sort();
        names
    }

    /// Mapping of city name to coordinate, alphabetically ordered.
    pub fn coordinates_by_name(&self) -> BTreeMap<String, Coordinates> {
        self.cities
            .iter()
            .map(|city| (city.name.clone(), city.position))
            .collect()
    }

    /// Closest-matching city names for a misspelled input, best first.
    pub fn fuzzy_city_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .cities
            .iter()
            .map(|city| {
                (
                    strsim::jaro_winkler(&needle, &city.name.to_lowercase()),
                    city.name.as_str(),
                )
            })
            .filter(|(score, _)| *score >= 0.7)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Snapshot of a city's outgoing edges. Empty for a known city with no
    /// outgoing roads.
    pub fn neighbors(&self, city: CityId) -> BTreeMap<CityId, EdgeAttributes> {
        self.edges()
            .get(city as usize)
            .cloned()
            .unwrap_or_default()
    }

    /// Current attributes of the directed edge `from -> to`, if present.
    pub fn edge(&self, from: CityId, to: CityId) -> Option<EdgeAttributes> {
        self.edges()
            .get(from as usize)
            .and_then(|row| row.get(&to))
            .copied()
    }

    pub(crate) fn edges(&self) -> RwLockReadGuard<'_, EdgeTable> {
        self.edges.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a weather observation to every edge touching `city`.
    ///
    /// For each neighbor the forward edge gets the new `weather_min` and
    /// `risk`; a missing reverse edge is created by mirroring the forward
    /// edge's `distance_km`/`traffic_min`, and the reverse edge then gets
    /// the same `weather_min`/`risk`. The whole per-city update happens
    /// under one exclusive lock acquisition, so concurrent readers observe
    /// it fully or not at all.
    pub fn apply_weather(&self, city: CityId, weather_min: f64, risk: f64) {
        let mut edges = self.edges.write().unwrap_or_else(PoisonError::into_inner);

        let forward: Vec<(CityId, EdgeAttributes)> = edges
            .get(city as usize)
            .map(|row| row.iter().map(|(&id, &attrs)| (id, attrs)).collect())
            .unwrap_or_default();

        for (neighbor, attrs) in forward {
            if let Some(edge) = edges
                .get_mut(city as usize)
                .and_then(|row| row.get_mut(&neighbor))
            {
                edge.weather_min = weather_min;
                edge.risk = risk;
            }

            if let Some(row) = edges.get_mut(neighbor as usize) {
                let reverse = row.entry(city).or_insert(EdgeAttributes {
                    distance_km: attrs.distance_km,
                    traffic_min: attrs.traffic_min,
                    weather_min: 0.0,
                    risk: 1.0,
                });
                reverse.weather_min = weather_min;
                reverse.risk = risk;
            }
        }
    }
}
