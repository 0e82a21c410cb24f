//! Roadcast HTTP service.
//!
//! Thin REST boundary over the roadcast routing library: city listing,
//! route planning with itemized breakdowns, and the weather refresh sweep
//! that mutates the live network.
//!
//! # Endpoints
//!
//! - `GET /api/v1/cities` - Known city names, alphabetical
//! - `GET /api/v1/cities/coordinates` - City name to coordinate mapping
//! - `POST /api/v1/route` - Plan a route between two cities
//! - `POST /api/v1/weather/refresh` - Run the weather ingestion sweep
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Configuration
//!
//! - `ROADCAST_NETWORK_PATH` - Road network JSON file (bundled network when unset)
//! - `WEATHER_API_KEY` - OpenWeatherMap credential (simulated weather when unset)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

mod logging;
mod problem;
mod state;

use std::collections::BTreeMap;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use roadcast_lib::{plan_route, provider_from_env, Coordinates, RouteBreakdown, RouteRequest};

use crate::logging::{init_logging, LoggingConfig};
use crate::problem::{from_lib_error, ProblemDetails};
use crate::state::AppState;

/// Route request body. Both fields are optional so absence surfaces as a
/// missing-parameter problem instead of a deserialization failure.
#[derive(Debug, Deserialize)]
struct RouteBody {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    goal: Option<String>,
}

/// Route response returned to the caller.
#[derive(Debug, Serialize)]
struct RouteResponse {
    /// Ordered list of city names, start to goal inclusive.
    path: Vec<String>,
    /// Itemized and aggregate travel metrics for the path.
    breakdown: RouteBreakdown,
}

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(RouteResponse),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Service health report for the probes.
#[derive(Debug, Serialize)]
struct HealthStatus {
    status: String,
    service: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cities_loaded: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env());

    let network_path = env::var_os("ROADCAST_NETWORK_PATH").map(PathBuf::from);
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(port = port, "starting roadcast service");

    // The blocking weather client must not be built or used on the async
    // runtime; state setup happens on a blocking thread.
    let state = tokio::task::spawn_blocking(move || -> roadcast_lib::Result<AppState> {
        let provider = provider_from_env()?;
        AppState::load(network_path.as_deref(), provider)
    })
    .await?
    .map_err(|e| {
        error!(error = %e, "failed to load application state");
        e
    })?;

    info!(
        cities = state.network().city_count(),
        "application state loaded"
    );

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the service router. The CORS layer is permissive: the API is
/// consumed straight from browser frontends on other origins.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/cities", get(cities_handler))
        .route("/api/v1/cities/coordinates", get(city_coordinates_handler))
        .route("/api/v1/route", post(route_handler))
        .route("/api/v1/weather/refresh", post(refresh_weather_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handle GET /api/v1/cities requests.
async fn cities_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.network().city_names_sorted())
}

/// Handle GET /api/v1/cities/coordinates requests.
async fn city_coordinates_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Coordinates>> {
    Json(state.network().coordinates_by_name())
}

/// Handle POST /api/v1/route requests.
async fn route_handler(State(state): State<AppState>, Json(body): Json<RouteBody>) -> Response {
    let request_id = generate_request_id();

    let request = RouteRequest::new(
        body.start.unwrap_or_default(),
        body.goal.unwrap_or_default(),
    );

    info!(
        request_id = %request_id,
        start = %request.start,
        goal = %request.goal,
        "handling route request"
    );

    match plan_route(state.network(), &request) {
        Ok(plan) => {
            let path = plan.city_names(state.network());
            info!(
                request_id = %request_id,
                hops = plan.hop_count(),
                total_min = plan.breakdown.estimated_total_time_min,
                "route computed successfully"
            );
            Response::Success(RouteResponse {
                path,
                breakdown: plan.breakdown,
            })
        }
        Err(error) => {
            error!(request_id = %request_id, error = %error, "route planning failed");
            Response::Error(from_lib_error(&error, &request_id))
        }
    }
}

/// Handle POST /api/v1/weather/refresh requests.
///
/// The sweep calls the weather collaborator per city, so it runs on a
/// blocking thread while the runtime keeps serving route queries.
async fn refresh_weather_handler(State(state): State<AppState>) -> axum::response::Response {
    let request_id = generate_request_id();
    info!(request_id = %request_id, "handling weather refresh");

    let worker = state.clone();
    match tokio::task::spawn_blocking(move || worker.ingestor().refresh(worker.network())).await {
        Ok(summary) => {
            info!(request_id = %request_id, cities = summary.len(), "weather refresh completed");
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(error) => {
            error!(request_id = %request_id, error = %error, "weather sweep task failed");
            ProblemDetails::internal_error("weather sweep failed", &request_id).into_response()
        }
    }
}

/// Liveness probe handler.
async fn health_live() -> impl IntoResponse {
    let status = HealthStatus {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cities_loaded: None,
    };
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler. Not ready until the network has cities.
async fn health_ready(State(state): State<AppState>) -> axum::response::Response {
    let cities = state.network().city_count();
    if cities == 0 {
        let status = HealthStatus {
            status: "not_ready: no cities loaded".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cities_loaded: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cities_loaded: Some(cities),
    };
    (StatusCode::OK, Json(status)).into_response()
}

/// Generate a unique request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    format!("req-{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::{json, Value};

    use roadcast_lib::{bundled_network, FallbackWeather, WeatherIngestor};

    fn test_state() -> AppState {
        let network = bundled_network().expect("bundled network parses");
        let ingestor = WeatherIngestor::new(Arc::new(FallbackWeather::seeded(7)));
        AppState::from_components(network, ingestor)
    }

    fn server(state: AppState) -> TestServer {
        TestServer::new(router(state)).expect("test server starts")
    }

    #[tokio::test]
    async fn cities_are_listed_alphabetically() {
        let server = server(test_state());
        let response = server.get("/api/v1/cities").await;
        response.assert_status_ok();

        let cities: Vec<String> = response.json();
        assert_eq!(cities.len(), 10);
        let mut sorted = cities.clone();
        sorted.sort();
        assert_eq!(cities, sorted);
        assert!(cities.contains(&"Hyderabad".to_string()));
    }

    #[tokio::test]
    async fn coordinates_cover_every_city() {
        let server = server(test_state());
        let response = server.get("/api/v1/cities/coordinates").await;
        response.assert_status_ok();

        let coordinates: Value = response.json();
        let map = coordinates.as_object().expect("object body");
        assert_eq!(map.len(), 10);
        assert!((map["Hyderabad"]["lat"].as_f64().unwrap() - 17.385).abs() < 1e-9);
        assert!((map["Hyderabad"]["lon"].as_f64().unwrap() - 78.4867).abs() < 1e-9);
    }

    #[tokio::test]
    async fn route_returns_path_and_breakdown() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/route")
            .json(&json!({"start": "Hyderabad", "goal": "Khammam"}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["path"][0], "Hyderabad");
        assert_eq!(body["path"][1], "Khammam");
        let breakdown = &body["breakdown"];
        assert!(breakdown["estimated_total_time_min"].as_f64().unwrap() > 0.0);
        assert_eq!(breakdown["legs"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_city_route_is_trivial() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/route")
            .json(&json!({"start": "Warangal", "goal": "Warangal"}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["path"], json!(["Warangal"]));
        assert_eq!(body["breakdown"]["estimated_total_time_min"], json!(0.0));
        assert_eq!(body["breakdown"]["legs"], json!([]));
    }

    #[tokio::test]
    async fn missing_parameter_is_a_bad_request_problem() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/route")
            .json(&json!({"start": "Hyderabad"}))
            .await;
        response.assert_status_bad_request();

        let problem: Value = response.json();
        assert_eq!(problem["type"], "/problems/invalid-request");
        assert!(problem["detail"].as_str().unwrap().contains("goal"));
    }

    #[tokio::test]
    async fn unknown_city_is_a_not_found_problem_with_suggestions() {
        let server = server(test_state());
        let response = server
            .post("/api/v1/route")
            .json(&json!({"start": "Hyderabadd", "goal": "Khammam"}))
            .await;
        response.assert_status_not_found();

        let problem: Value = response.json();
        assert_eq!(problem["type"], "/problems/unknown-city");
        assert!(problem["detail"].as_str().unwrap().contains("Hyderabad"));
    }

    #[tokio::test]
    async fn weather_refresh_reports_and_applies_every_city() {
        let state = test_state();
        let server = server(state.clone());

        let response = server.post("/api/v1/weather/refresh").await;
        response.assert_status_ok();

        let summary: Value = response.json();
        let map = summary.as_object().expect("object body");
        assert_eq!(map.len(), 10);
        for entry in map.values() {
            assert!(entry["condition"].is_string());
            assert!(entry["delay_min"].as_f64().unwrap() >= 0.0);
            assert!(entry["risk"].as_f64().unwrap() >= 1.0);
        }

        // The sweep mutated the same network the router serves: every edge
        // pair must now carry synchronized weather attributes.
        let network = state.network();
        for city in network.cities() {
            for (neighbor, forward) in network.neighbors(city.id) {
                let reverse = network.edge(neighbor, city.id).expect("reverse edge");
                assert_eq!(forward.weather_min, reverse.weather_min);
                assert_eq!(forward.risk, reverse.risk);
            }
        }
    }

    #[tokio::test]
    async fn health_probes_respond() {
        let server = server(test_state());

        let live = server.get("/health/live").await;
        live.assert_status_ok();

        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        let body: Value = ready.json();
        assert_eq!(body["cities_loaded"], json!(10));
    }
}
