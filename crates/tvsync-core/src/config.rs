use crate::app_config::{AppConfig, Credentials, DEFAULT_BASE_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds a value that cannot be parsed.
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
/// Returns `ConfigError` if a variable holds a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are deliberately optional here: an unconfigured key or secret
/// surfaces later as a per-call credential failure, not as a startup error.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let credentials = Credentials::new(
        or_default("TILESVIEW_APP_KEY", ""),
        or_default("TILESVIEW_APP_SECRET", ""),
    );

    let base_url = or_default("TILESVIEW_BASE_URL", DEFAULT_BASE_URL);
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "TILESVIEW_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{base_url}'"),
        });
    }

    let request_timeout_secs = parse_u64("TILESVIEW_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TILESVIEW_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    let debug = parse_bool("TILESVIEW_DEBUG", &or_default("TILESVIEW_DEBUG", "false"))?;
    let log_level = or_default("TILESVIEW_LOG_LEVEL", "info");
    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.is_empty());
    let db_max_connections = parse_u32("TILESVIEW_DB_MAX_CONNECTIONS", "5")?;
    let db_acquire_timeout_secs = parse_u64("TILESVIEW_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let catalog_path = PathBuf::from(or_default(
        "TILESVIEW_CATALOG_PATH",
        "./config/catalog.yaml",
    ));

    Ok(AppConfig {
        credentials,
        base_url,
        request_timeout_secs,
        debug,
        log_level,
        database_url,
        db_max_connections,
        db_acquire_timeout_secs,
        catalog_path,
    })
}

/// Parse a boolean flag leniently (`1/true/yes/on`, `0/false/no/off`, empty).
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
