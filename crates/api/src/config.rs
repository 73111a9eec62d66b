use std::env;
use std::str::FromStr;
use std::time::Duration;

use prayaas_agents::DEFAULT_MAX_TURNS;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub api_key: String,
    pub session_ttl: Duration,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
    pub max_session_turns: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or unparsable values fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str, default| parse_or(lookup(key), default);

        Self {
            bind: lookup("PRAYAAS_BIND")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            api_key: lookup("PRAYAAS_API_KEY").unwrap_or_else(|| "dev-prayaas-key".to_string()),
            session_ttl: Duration::from_secs(parsed("PRAYAAS_SESSION_TTL_SECONDS", 60 * 60 * 24)),
            rate_limit_window: Duration::from_secs(parsed(
                "PRAYAAS_RATE_LIMIT_WINDOW_SECONDS",
                60,
            )),
            rate_limit_max: parse_or(lookup("PRAYAAS_RATE_LIMIT_MAX"), 80),
            max_session_turns: parse_or(lookup("PRAYAAS_MAX_SESSION_TURNS"), DEFAULT_MAX_TURNS),
            allowed_origins: lookup("PRAYAAS_ALLOWED_ORIGINS")
                .map(|value| {
                    value
                        .split(',')
                        .map(|origin| origin.trim().trim_end_matches('/').to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_else(|| {
                    DEFAULT_ALLOWED_ORIGINS
                        .iter()
                        .map(|origin| origin.to_string())
                        .collect()
                }),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}
