use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// Every variable has a default; the only hard failures are unparseable values.
/// Both geocoder credentials are optional: a missing primary credential simply
/// means the secondary provider is first in line, and a deployment with neither
/// credential serves national-only results.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("HAVEN_ENV", "development"));
    let bind_addr = parse_addr("HAVEN_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("HAVEN_LOG_LEVEL", "info");
    let directory_path = PathBuf::from(or_default(
        "HAVEN_DIRECTORY_PATH",
        "./config/resources.yaml",
    ));

    let mapbox_access_token = lookup("MAPBOX_ACCESS_TOKEN").ok();
    let geocodio_api_key = lookup("GEOCODIO_API_KEY").ok();

    let geocode_timeout_secs = parse_u64("HAVEN_GEOCODE_TIMEOUT_SECS", "4")?;
    let geocode_retry_backoff_ms = parse_u64("HAVEN_GEOCODE_RETRY_BACKOFF_MS", "500")?;
    let rate_limit_max_requests = parse_u32("HAVEN_RATE_LIMIT_MAX_REQUESTS", "30")?;
    let rate_limit_window_secs = parse_u64("HAVEN_RATE_LIMIT_WINDOW_SECS", "60")?;
    let cache_ttl_secs = parse_u64("HAVEN_CACHE_TTL_SECS", "3600")?;
    let degraded_cache_ttl_secs = parse_u64("HAVEN_DEGRADED_CACHE_TTL_SECS", "300")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        directory_path,
        mapbox_access_token,
        geocodio_api_key,
        geocode_timeout_secs,
        geocode_retry_backoff_ms,
        rate_limit_max_requests,
        rate_limit_window_secs,
        cache_ttl_secs,
        degraded_cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
