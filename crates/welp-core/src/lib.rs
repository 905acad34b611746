//! Shared domain types for the welp restaurant search.
//!
//! Holds the validated search input, coordinates, restaurant records as they
//! cross the provider boundary, persisted history entries, and the
//! environment-driven application configuration.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod history;
pub mod restaurant;
pub mod validate;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::Coordinate;
pub use history::HistoryEntry;
pub use restaurant::{FilteredResult, RestaurantCandidate};
pub use validate::{validate_credentials, SearchRequest, ValidationError, DEFAULT_MIN_BUDGET};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
