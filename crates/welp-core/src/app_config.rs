use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub directory_api_key: String,
    pub directory_base_url: String,
    pub geocode_api_key: String,
    pub geocode_base_url: String,
    /// Position reported by the device locator; `None` behaves like a
    /// denied geolocation permission.
    pub device_position: Option<Coordinate>,
    pub request_timeout_secs: u64,
    pub geolocation_timeout_ms: u64,
    pub geocode_timeout_ms: u64,
    pub directory_max_retries: u32,
    pub directory_backoff_base_ms: u64,
    /// Longest wait between two directory attempts.
    pub directory_backoff_cap_ms: u64,
    pub min_budget: Decimal,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("directory_api_key", &"[redacted]")
            .field("directory_base_url", &self.directory_base_url)
            .field("geocode_api_key", &"[redacted]")
            .field("geocode_base_url", &self.geocode_base_url)
            .field("device_position", &self.device_position)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("geolocation_timeout_ms", &self.geolocation_timeout_ms)
            .field("geocode_timeout_ms", &self.geocode_timeout_ms)
            .field("directory_max_retries", &self.directory_max_retries)
            .field("directory_backoff_base_ms", &self.directory_backoff_base_ms)
            .field("directory_backoff_cap_ms", &self.directory_backoff_cap_ms)
            .field("min_budget", &self.min_budget)
            .finish()
    }
}
