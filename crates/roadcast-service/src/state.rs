//! Application state shared by the HTTP handlers.

use std::path::Path;
use std::sync::Arc;

use roadcast_lib::{
    bundled_network, load_network, RoadNetwork, Result, WeatherIngestor, WeatherProvider,
};

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); share it via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    network: RoadNetwork,
    ingestor: WeatherIngestor,
}

impl AppState {
    /// Load application state: the road network from `path` (or the
    /// bundled network when `None`) plus a weather ingestor around the
    /// given provider.
    pub fn load(path: Option<&Path>, provider: Arc<dyn WeatherProvider>) -> Result<Self> {
        let network = match path {
            Some(path) => load_network(path)?,
            None => {
                tracing::info!("no network path configured, using bundled network");
                bundled_network()?
            }
        };
        Ok(Self::from_components(
            network,
            WeatherIngestor::new(provider),
        ))
    }

    /// Create application state from pre-loaded components. Useful for
    /// testing with fixture networks and pinned weather providers.
    pub fn from_components(network: RoadNetwork, ingestor: WeatherIngestor) -> Self {
        Self {
            inner: Arc::new(AppStateInner { network, ingestor }),
        }
    }

    /// Access the loaded road network.
    pub fn network(&self) -> &RoadNetwork {
        &self.inner.network
    }

    /// Access the weather ingestor.
    pub fn ingestor(&self) -> &WeatherIngestor {
        &self.inner.ingestor
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("city_count", &self.inner.network.city_count())
            .finish()
    }
}
