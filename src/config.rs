use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

pub const DEFAULT_SEARCH_API_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3_500;
pub const DEFAULT_PROBE_CONCURRENCY: usize = 30;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        search_api_key: get_env_opt("SEARCH_API_KEY"),
        search_engine_id: get_env_opt("SEARCH_ENGINE_ID"),
        search_api_url: get_env_or_default("SEARCH_API_URL", DEFAULT_SEARCH_API_URL),
        probe_timeout_ms: get_env_parsed("PROBE_TIMEOUT_MS", DEFAULT_PROBE_TIMEOUT_MS),
        probe_concurrency: get_env_parsed("PROBE_CONCURRENCY", DEFAULT_PROBE_CONCURRENCY),
        extra_denylist: get_env_opt("EMBED_DENYLIST")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default(),
        mongo_uri: get_env_opt("MONGO_URI"),
        mongo_db_name: get_env_or_default("MONGO_DB_NAME", "framesearch"),
        bind_addr: get_env_or_default("BIND_ADDR", "0.0.0.0:3000"),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub search_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub search_api_url: String,
    pub probe_timeout_ms: u64,
    pub probe_concurrency: usize,
    pub extra_denylist: Vec<String>,
    /// Tracking is disabled when unset.
    pub mongo_uri: Option<String>,
    pub mongo_db_name: String,
    pub bind_addr: String,
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("invalid value {raw:?} for {key}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Splits a comma-separated list, dropping blanks and lowercasing entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[test]
fn test_parse_list() {
    assert_eq!(
        parse_list(" Example.com, ,foo.org,"),
        vec!["example.com".to_string(), "foo.org".to_string()]
    );
    assert!(parse_list("").is_empty());
}
