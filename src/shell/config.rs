// Process configuration.
//
// Variables
// - BIND_ADDR: listen address, default 0.0.0.0:8080.
// - FRESHNESS_WINDOW_MS: cache freshness window, default five minutes.
// - CACHE_FILE: persist the cache mirror to this JSON file. Unset keeps it in memory.
// - WORKBOOK_SEED_FILE: JSON document of sheets loaded into the in-memory workbook at startup.
//
// Rules
// - Unset or blank variables take their default. Set but unparsable values are an error.

use crate::modules::registry::cache::refresh::DEFAULT_FRESHNESS_WINDOW_MS;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub freshness_window_ms: i64,
    pub cache_file: Option<PathBuf>,
    pub workbook_seed_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr: SocketAddr = parse_or(
            "BIND_ADDR",
            var("BIND_ADDR"),
            DEFAULT_BIND_ADDR.parse().ok(),
        )?;
        let freshness_window_ms = parse_or(
            "FRESHNESS_WINDOW_MS",
            var("FRESHNESS_WINDOW_MS"),
            Some(DEFAULT_FRESHNESS_WINDOW_MS),
        )?;
        if freshness_window_ms < 0 {
            return Err(ConfigError::Invalid {
                name: "FRESHNESS_WINDOW_MS",
                value: freshness_window_ms.to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            freshness_window_ms,
            cache_file: var("CACHE_FILE").map(PathBuf::from),
            workbook_seed_file: var("WORKBOOK_SEED_FILE").map(PathBuf::from),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: Option<T>,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => default.ok_or(ConfigError::Invalid {
            name,
            value: String::new(),
        }),
    }
}
