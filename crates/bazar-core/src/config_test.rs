use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "BAZAR_ENV"));
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base, "http://localhost:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir.to_string_lossy(), "./.bazar");
    assert_eq!(cfg.request_timeout_secs, 60);
    assert_eq!(cfg.whatsapp_phone, "593987039983");
    assert_eq!(cfg.low_stock_threshold, 5);
    assert_eq!(cfg.catalogue_fetch_limit, 500);
    assert!(cfg.api_token.is_none());
}

#[test]
fn build_app_config_strips_trailing_slash_from_api_base() {
    let mut map = HashMap::new();
    map.insert("BAZAR_API_BASE", "https://api.example.com/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base, "https://api.example.com");
}

#[test]
fn build_app_config_rejects_api_base_without_scheme() {
    let mut map = HashMap::new();
    map.insert("BAZAR_API_BASE", "api.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAZAR_API_BASE"),
        "expected InvalidEnvVar(BAZAR_API_BASE), got: {result:?}"
    );
}

#[test]
fn build_app_config_request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("BAZAR_REQUEST_TIMEOUT_SECS", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 15);
}

#[test]
fn build_app_config_request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("BAZAR_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAZAR_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BAZAR_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_low_stock_threshold_override() {
    let mut map = HashMap::new();
    map.insert("BAZAR_LOW_STOCK_THRESHOLD", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.low_stock_threshold, 2);
}

#[test]
fn build_app_config_rejects_zero_fetch_limit() {
    let mut map = HashMap::new();
    map.insert("BAZAR_CATALOGUE_FETCH_LIMIT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAZAR_CATALOGUE_FETCH_LIMIT"),
        "expected InvalidEnvVar(BAZAR_CATALOGUE_FETCH_LIMIT), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_phone_without_digits() {
    let mut map = HashMap::new();
    map.insert("BAZAR_WHATSAPP_PHONE", "call-me");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BAZAR_WHATSAPP_PHONE"),
        "expected InvalidEnvVar(BAZAR_WHATSAPP_PHONE), got: {result:?}"
    );
}

#[test]
fn build_app_config_ignores_empty_api_token() {
    let mut map = HashMap::new();
    map.insert("BAZAR_API_TOKEN", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_token.is_none());
}

#[test]
fn debug_output_redacts_api_token() {
    let mut map = HashMap::new();
    map.insert("BAZAR_API_TOKEN", "secret-token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("[redacted]"));
}
