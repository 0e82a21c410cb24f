//! Weather collaborator: provider trait, OpenWeatherMap client, and the
//! simulated fallback used when no API credential is configured.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geo::Coordinates;

/// OpenWeatherMap current-weather endpoint.
pub const OPENWEATHERMAP_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Conditions the simulated provider cycles through.
const PLAUSIBLE_CONDITIONS: &[&str] = &[
    "Clear",
    "Clouds",
    "Rain",
    "Drizzle",
    "Thunderstorm",
    "Mist",
    "Fog",
];

/// One weather observation: the reported sky condition and the delay and
/// risk it maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub condition: String,
    pub delay_min: f64,
    pub risk: f64,
}

impl WeatherReport {
    /// Build a report by mapping a condition through the impact table.
    pub fn for_condition(condition: impl Into<String>) -> Self {
        let condition = condition.into();
        let (delay_min, risk) = condition_impact(&condition);
        Self {
            condition,
            delay_min,
            risk,
        }
    }
}

/// Delay minutes and risk multiplier for a reported sky condition.
/// Unrecognized conditions fall into the fair-weather bucket.
pub fn condition_impact(condition: &str) -> (f64, f64) {
    match condition.trim().to_lowercase().as_str() {
        "extreme" | "squall" | "tornado" => (28.0, 1.25),
        "thunderstorm" | "rain" | "snow" => (15.0, 1.10),
        "drizzle" | "mist" | "fog" | "haze" | "smoke" => (8.0, 1.05),
        _ => (2.0, 1.01),
    }
}

/// Conservative report used when a lookup fails mid-sweep.
pub fn fallback_report() -> WeatherReport {
    WeatherReport::for_condition("Clouds")
}

/// A source of weather observations for a coordinate.
///
/// Implementations must be injectable wherever ingestion runs; tests pin a
/// deterministic implementation instead of the live client.
pub trait WeatherProvider: Send + Sync {
    fn observe(&self, position: Coordinates) -> Result<WeatherReport>;
}

/// Live OpenWeatherMap client.
pub struct OpenWeatherMap {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl OpenWeatherMap {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: Option<String>,
}

impl WeatherProvider for OpenWeatherMap {
    fn observe(&self, position: Coordinates) -> Result<WeatherReport> {
        let response = self
            .client
            .get(OPENWEATHERMAP_URL)
            .query(&[
                ("lat", position.lat.to_string()),
                ("lon", position.lon.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()?
            .error_for_status()?;

        let payload: OwmResponse = response.json()?;
        let condition = payload
            .weather
            .into_iter()
            .next()
            .and_then(|entry| entry.main)
            .ok_or_else(|| Error::WeatherUnavailable {
                detail: "response carried no weather condition".to_string(),
            })?;

        Ok(WeatherReport::for_condition(condition))
    }
}

/// Simulated provider for credential-less deployments.
///
/// Picks a plausible condition per observation. All nondeterminism in the
/// weather path lives here; seed it for reproducible runs.
pub struct FallbackWeather {
    rng: Mutex<SmallRng>,
}

impl FallbackWeather {
    /// Deterministic provider for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Entropy-seeded provider for production use without a credential.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }
}

impl WeatherProvider for FallbackWeather {
    fn observe(&self, _position: Coordinates) -> Result<WeatherReport> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let condition = PLAUSIBLE_CONDITIONS
            .choose(&mut *rng)
            .copied()
            .unwrap_or("Clouds");
        Ok(WeatherReport::for_condition(condition))
    }
}

/// Select the weather provider from the environment: the live client when
/// `WEATHER_API_KEY` is set, the simulated fallback otherwise.
pub fn provider_from_env() -> Result<Arc<dyn WeatherProvider>> {
    match std::env::var("WEATHER_API_KEY") {
        Ok(key) if !key.trim().is_empty() => {
            tracing::info!("using OpenWeatherMap weather provider");
            Ok(Arc::new(OpenWeatherMap::new(key.trim())?))
        }
        _ => {
            tracing::warn!("WEATHER_API_KEY not set, using simulated weather");
            Ok(Arc::new(FallbackWeather::from_entropy()))
        }
    }
}
