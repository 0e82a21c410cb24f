//! Road network dataset loading and load-time validation.
//!
//! A network file is a JSON document with a `cities` map (name to
//! coordinate) and a `roads` map (source city to target city to edge
//! attributes). Every edge endpoint must name a listed city; delay fields
//! may be omitted and resolve to their defaults during parsing. A bundled
//! Telangana network ships with the crate for default deployments and
//! tests.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::network::{City, CityId, EdgeAttributes, EdgeTable, RoadNetwork};

static TELANGANA_JSON: &str = include_str!("../data/telangana.json");

#[derive(Debug, Deserialize)]
struct NetworkFile {
    cities: BTreeMap<String, Coordinates>,
    roads: BTreeMap<String, BTreeMap<String, EdgeAttributes>>,
}

/// Load a road network from a JSON file on disk.
pub fn load_network(path: impl AsRef<Path>) -> Result<RoadNetwork> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NetworkNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)?;
    let network = network_from_json(&raw)?;
    tracing::info!(path = %path.display(), cities = network.city_count(), "road network loaded");
    Ok(network)
}

/// Parse a road network from a JSON string.
pub fn network_from_json(raw: &str) -> Result<RoadNetwork> {
    let file: NetworkFile = serde_json::from_str(raw)?;
    build_network(file)
}

/// The Telangana road network bundled with the crate.
pub fn bundled_network() -> Result<RoadNetwork> {
    network_from_json(TELANGANA_JSON)
}

fn build_network(file: NetworkFile) -> Result<RoadNetwork> {
    let cities: Vec<City> = file
        .cities
        .iter()
        .enumerate()
        .map(|(id, (name, &position))| City {
            id: id as CityId,
            name: name.clone(),
            position,
        })
        .collect();

    let index: HashMap<&str, CityId> = cities
        .iter()
        .map(|city| (city.name.as_str(), city.id))
        .collect();

    let mut edges: EdgeTable = vec![BTreeMap::new(); cities.len()];
    for (source, targets) in &file.roads {
        let Some(&from) = index.get(source.as_str()) else {
            return Err(Error::InvalidNetwork {
                message: format!("road source '{source}' is not a listed city"),
            });
        };
        for (target, attrs) in targets {
            let Some(&to) = index.get(target.as_str()) else {
                return Err(Error::InvalidNetwork {
                    message: format!("road from '{source}' references unknown city '{target}'"),
                });
            };
            validate_edge(source, target, attrs)?;
            edges[from as usize].insert(to, *attrs);
        }
    }

    Ok(RoadNetwork::new(cities, edges))
}

fn validate_edge(from: &str, to: &str, attrs: &EdgeAttributes) -> Result<()> {
    if !(attrs.distance_km >= 0.0) {
        return Err(Error::InvalidNetwork {
            message: format!("road {from} -> {to} has a negative distance"),
        });
    }
    if !(attrs.traffic_min >= 0.0) || !(attrs.weather_min >= 0.0) {
        return Err(Error::InvalidNetwork {
            message: format!("road {from} -> {to} has a negative delay"),
        });
    }
    if !(attrs.risk >= 1.0) {
        return Err(Error::InvalidNetwork {
            message: format!("road {from} -> {to} has a risk multiplier below 1.0"),
        });
    }
    Ok(())
}
