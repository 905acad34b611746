use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::validate::DEFAULT_MIN_BUDGET;
use crate::ConfigError;

pub const DEFAULT_DIRECTORY_BASE_URL: &str = "https://developers.zomato.com/api/v2.1/";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://dev.virtualearth.net/REST/v1/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let directory_api_key = require("WELP_DIRECTORY_API_KEY")?;
    let geocode_api_key = require("WELP_GEOCODE_API_KEY")?;

    let env = parse_environment(&or_default("WELP_ENV", "development"))?;
    let log_level = or_default("WELP_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("WELP_DATA_DIR", "./.welp"));

    let directory_base_url = or_default("WELP_DIRECTORY_BASE_URL", DEFAULT_DIRECTORY_BASE_URL);
    let geocode_base_url = or_default("WELP_GEOCODE_BASE_URL", DEFAULT_GEOCODE_BASE_URL);

    let device_position = match lookup("WELP_DEVICE_POSITION") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            Coordinate::from_str(&raw).map_err(|reason| invalid("WELP_DEVICE_POSITION", reason))?,
        ),
        _ => None,
    };

    let request_timeout_secs = parse_u64("WELP_REQUEST_TIMEOUT_SECS", "30")?;
    let geolocation_timeout_ms = parse_u64("WELP_GEOLOCATION_TIMEOUT_MS", "5000")?;
    let geocode_timeout_ms = parse_u64("WELP_GEOCODE_TIMEOUT_MS", "5000")?;
    let directory_max_retries = parse_u32("WELP_DIRECTORY_MAX_RETRIES", "2")?;
    let directory_backoff_base_ms = parse_u64("WELP_DIRECTORY_BACKOFF_BASE_MS", "500")?;
    let directory_backoff_cap_ms = parse_u64("WELP_DIRECTORY_BACKOFF_CAP_MS", "10000")?;

    let min_budget = match lookup("WELP_MIN_BUDGET") {
        Ok(raw) => {
            let value =
                Decimal::from_str(raw.trim()).map_err(|e| invalid("WELP_MIN_BUDGET", e.to_string()))?;
            if value <= Decimal::ZERO {
                return Err(invalid("WELP_MIN_BUDGET", "must be positive".to_string()));
            }
            value
        }
        Err(_) => DEFAULT_MIN_BUDGET,
    };

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        directory_api_key,
        directory_base_url,
        geocode_api_key,
        geocode_base_url,
        device_position,
        request_timeout_secs,
        geolocation_timeout_ms,
        geocode_timeout_ms,
        directory_max_retries,
        directory_backoff_base_ms,
        directory_backoff_cap_ms,
        min_budget,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "WELP_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
