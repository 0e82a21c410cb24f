//! Roadcast library entry points.
//!
//! This crate loads a weighted road network, plans minimum-time routes
//! between cities with A*, itemizes per-leg travel estimates, and folds
//! live weather observations back into the edge weights. Higher-level
//! consumers (the HTTP service) should only depend on the functions
//! exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod breakdown;
pub mod cost;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod network;
pub mod path;
pub mod routing;
pub mod weather;

pub use breakdown::{breakdown_for_path, RouteBreakdown, RouteLeg};
pub use dataset::{bundled_network, load_network, network_from_json};
pub use error::{Error, Result};
pub use geo::{haversine_km, Coordinates};
pub use ingest::{CityWeather, WeatherIngestor};
pub use network::{City, CityId, EdgeAttributes, RoadNetwork};
pub use path::find_route;
pub use routing::{plan_route, RoutePlan, RouteRequest};
pub use weather::{
    provider_from_env, FallbackWeather, OpenWeatherMap, WeatherProvider, WeatherReport,
};
