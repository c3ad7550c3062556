//! Runtime configuration read from the environment (and an optional `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_LOG_FILE, DEFAULT_POLL_INTERVAL};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub poll_interval: Duration,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `load` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("COURIER_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        reqwest::Url::parse(&api_base_url)
            .with_context(|| format!("COURIER_API_BASE_URL is not a valid URL: {}", api_base_url))?;

        let api_key = lookup("COURIER_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let poll_interval = match lookup("COURIER_POLL_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("COURIER_POLL_INTERVAL_SECS must be a number, got {:?}", raw))?;
                if secs == 0 {
                    bail!("COURIER_POLL_INTERVAL_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_POLL_INTERVAL,
        };

        let log_file = lookup("COURIER_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(AppConfig {
            api_base_url,
            api_key,
            poll_interval,
            log_file,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.log_file, PathBuf::from("courier-dash.log"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("COURIER_API_BASE_URL", "http://localhost:3000/api"),
            ("COURIER_API_KEY", " secret "),
            ("COURIER_POLL_INTERVAL_SECS", "3"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[("COURIER_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("COURIER_POLL_INTERVAL_SECS", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("COURIER_POLL_INTERVAL_SECS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("COURIER_API_BASE_URL", "not a url")])).is_err());
    }
}
