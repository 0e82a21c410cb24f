use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the roadcast library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A required request parameter was absent or blank.
    #[error("missing required parameter '{name}'")]
    MissingParameter { name: &'static str },

    /// Raised when a city name could not be found in the network.
    #[error("unknown city: {name}{}", format_suggestions(.suggestions))]
    UnknownCity {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when no route could be found between two cities.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Road network file could not be located at the resolved path.
    #[error("road network file not found at {path}")]
    NetworkNotFound { path: PathBuf },

    /// The network dataset failed load-time validation.
    #[error("invalid road network: {message}")]
    InvalidNetwork { message: String },

    /// A path leg referenced an edge that is not in the network.
    #[error("path leg {from} -> {to} references a missing edge")]
    BrokenLeg { from: String, to: String },

    /// The weather collaborator failed or returned an unusable payload.
    #[error("weather lookup failed: {detail}")]
    WeatherUnavailable { detail: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
