use std::num::NonZeroU32;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_nonzero_u32 = |var: &str, default: &str| -> Result<NonZeroU32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<NonZeroU32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let backend_url = require("LOOLOCATOR_BACKEND_URL")?;
    if backend_url.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOOLOCATOR_BACKEND_URL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let env = parse_environment(&or_default("LOOLOCATOR_ENV", "development"))?;
    let log_level = or_default("LOOLOCATOR_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("LOOLOCATOR_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LOOLOCATOR_USER_AGENT", "loolocator/0.1 (washroom-finder)");
    let result_limit = parse_nonzero_u32("LOOLOCATOR_RESULT_LIMIT", "20")?;
    let location_timeout_secs = parse_u64("LOOLOCATOR_LOCATION_TIMEOUT_SECS", "10")?;
    let location_max_age_secs = parse_u64("LOOLOCATOR_LOCATION_MAX_AGE_SECS", "300")?;

    Ok(AppConfig {
        env,
        log_level,
        backend_url,
        request_timeout_secs,
        user_agent,
        result_limit,
        location_timeout_secs,
        location_max_age_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognised values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOOLOCATOR_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
