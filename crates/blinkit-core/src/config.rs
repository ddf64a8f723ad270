use std::path::PathBuf;

use crate::app_config::{AppConfig, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
/// Every variable is optional; unset variables take the defaults the scraper
/// has always run with.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
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
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested against a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let base_url = or_default("BLINKIT_BASE_URL", "https://blinkit.com")
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BLINKIT_BASE_URL".to_string(),
            reason: format!("\"{base_url}\" must start with http:// or https://"),
        });
    }

    let categories_path = PathBuf::from(or_default(
        "BLINKIT_CATEGORIES_PATH",
        "blinkit_categories.csv",
    ));
    let locations_path = PathBuf::from(or_default(
        "BLINKIT_LOCATIONS_PATH",
        "blinkit_locations.csv",
    ));
    let output_dir = PathBuf::from(or_default("BLINKIT_OUTPUT_DIR", "output"));
    let log_level = or_default("BLINKIT_LOG_LEVEL", "info");
    let user_agent = or_default("BLINKIT_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = match lookup("BLINKIT_REQUEST_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::InvalidEnvVar {
                var: "BLINKIT_REQUEST_TIMEOUT_SECS".to_string(),
                reason: e.to_string(),
            }
        })?),
        _ => None,
    };

    let inter_request_delay_ms = parse_u64("BLINKIT_INTER_REQUEST_DELAY_MS", "2000")?;
    let warmup_delay_ms = parse_u64("BLINKIT_WARMUP_DELAY_MS", "5000")?;

    Ok(AppConfig {
        base_url,
        categories_path,
        locations_path,
        output_dir,
        log_level,
        user_agent,
        request_timeout_secs,
        inter_request_delay_ms,
        warmup_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
