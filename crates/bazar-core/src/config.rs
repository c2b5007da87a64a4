use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
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

    let env = parse_environment(&or_default("BAZAR_ENV", "development"))?;

    let api_base = or_default("BAZAR_API_BASE", "http://localhost:3000");
    if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BAZAR_API_BASE".to_string(),
            reason: format!("\"{api_base}\" must start with http:// or https://"),
        });
    }
    let api_base = api_base.trim_end_matches('/').to_string();

    let log_level = or_default("BAZAR_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("BAZAR_DATA_DIR", "./.bazar"));
    let request_timeout_secs = parse_u64("BAZAR_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("BAZAR_USER_AGENT", "bazar/0.1 (storefront-client)");

    let whatsapp_phone = or_default("BAZAR_WHATSAPP_PHONE", "593987039983");
    if !whatsapp_phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BAZAR_WHATSAPP_PHONE".to_string(),
            reason: "must contain at least one digit".to_string(),
        });
    }

    let low_stock_threshold = parse_u32("BAZAR_LOW_STOCK_THRESHOLD", "5")?;

    let catalogue_fetch_limit = parse_u32("BAZAR_CATALOGUE_FETCH_LIMIT", "500")?;
    if catalogue_fetch_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BAZAR_CATALOGUE_FETCH_LIMIT".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let api_token = lookup("BAZAR_API_TOKEN").ok().filter(|t| !t.is_empty());

    Ok(AppConfig {
        env,
        api_base,
        log_level,
        data_dir,
        request_timeout_secs,
        user_agent,
        whatsapp_phone,
        low_stock_threshold,
        catalogue_fetch_limit,
        api_token,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BAZAR_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
