//! Weather ingestion sweep: query the collaborator for every city and
//! fold the observations into the road network's edge weights.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::breakdown::round2;
use crate::network::RoadNetwork;
use crate::weather::{fallback_report, WeatherProvider};

/// Per-city entry of the sweep summary.
#[derive(Debug, Clone, Serialize)]
pub struct CityWeather {
    pub condition: String,
    pub delay_min: f64,
    pub risk: f64,
}

/// Runs full-network weather sweeps against an injected provider.
///
/// Only one sweep is in flight at a time; concurrent callers queue on the
/// sweep lock. Per-city application stays atomic with respect to route
/// queries (see [`RoadNetwork::apply_weather`]).
pub struct WeatherIngestor {
    provider: Arc<dyn WeatherProvider>,
    sweep: Mutex<()>,
}

impl WeatherIngestor {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            sweep: Mutex::new(()),
        }
    }

    /// Observe every city and apply the result to all touching edges.
    ///
    /// A failed lookup degrades that city to the conservative fallback
    /// report; it never aborts the sweep. Returns the per-city summary in
    /// alphabetical order.
    pub fn refresh(&self, network: &RoadNetwork) -> BTreeMap<String, CityWeather> {
        let _sweep = self.sweep.lock().unwrap_or_else(PoisonError::into_inner);

        let mut summary = BTreeMap::new();
        for city in network.cities() {
            let report = match self.provider.observe(city.position) {
                Ok(report) => report,
                Err(error) => {
                    tracing::warn!(
                        city = %city.name,
                        error = %error,
                        "weather lookup failed, using fallback"
                    );
                    fallback_report()
                }
            };

            network.apply_weather(city.id, report.delay_min, report.risk);
            summary.insert(
                city.name.clone(),
                CityWeather {
                    condition: report.condition,
                    delay_min: report.delay_min,
                    risk: round2(report.risk),
                },
            );
        }

        tracing::info!(cities = summary.len(), "weather sweep applied");
        summary
    }
}
