use crate::app_config::{AppConfig, Environment};
use crate::search::Coordinates;
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
/// Decoupled from the process environment so tests can drive it from a
/// `HashMap` without `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let parse_coordinate = |var: &str| -> Result<Option<f64>, ConfigError> {
        lookup(var)
            .ok()
            .map(|raw| raw.parse::<f64>().map_err(|e| invalid(var, e.to_string())))
            .transpose()
    };

    let env = parse_environment(&or_default("METRIKS_ENV", "development"))?;
    let log_level = or_default("METRIKS_LOG_LEVEL", "info");

    let catalog_base_url = require("METRIKS_CATALOG_BASE_URL")?;
    let catalog_category = or_default("METRIKS_CATALOG_CATEGORY", "pharma");
    if catalog_category.trim().is_empty() || catalog_category.contains('/') {
        return Err(invalid(
            "METRIKS_CATALOG_CATEGORY",
            "must be a single non-empty path segment".to_string(),
        ));
    }

    let page_size = parse_u32("METRIKS_PAGE_SIZE", "20")?;
    if page_size == 0 {
        return Err(invalid("METRIKS_PAGE_SIZE", "must be at least 1".to_string()));
    }

    let request_timeout_secs = parse_u64("METRIKS_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("METRIKS_USER_AGENT", "metriks/0.1 (catalog-search)");
    let retailers_path = PathBuf::from(or_default(
        "METRIKS_RETAILERS_PATH",
        "./config/retailers.yaml",
    ));
    let allow_partial = parse_bool("METRIKS_ALLOW_PARTIAL", "false")?;

    let home_location = match (
        parse_coordinate("METRIKS_LATITUDE")?,
        parse_coordinate("METRIKS_LONGITUDE")?,
    ) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon).ok_or_else(|| {
            invalid(
                "METRIKS_LATITUDE",
                format!("({lat}, {lon}) is not a valid coordinate pair"),
            )
        })?),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::MissingEnvVar("METRIKS_LONGITUDE".to_string()))
        }
        (None, Some(_)) => {
            return Err(ConfigError::MissingEnvVar("METRIKS_LATITUDE".to_string()))
        }
    };

    Ok(AppConfig {
        env,
        log_level,
        catalog_base_url,
        catalog_category,
        page_size,
        request_timeout_secs,
        user_agent,
        retailers_path,
        allow_partial,
        home_location,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "METRIKS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
