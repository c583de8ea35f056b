use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::models::asset::{AssetCatalog, CatalogKind};

pub const DEFAULT_OPTIMIZER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

/// Runtime settings of the selector
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub optimizer_url: Url,
    pub optimizer_timeout: Option<Duration>,
    pub catalog: CatalogKind,
    pub min_selection: usize,
    pub bind_addr: SocketAddr,
    pub session_ttl_minutes: i64,
}

impl SelectorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source. Unset or blank values take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let optimizer_url = get("OPTIMIZER_URL").unwrap_or_else(|| DEFAULT_OPTIMIZER_URL.to_string());
        let optimizer_url =
            Url::parse(optimizer_url.trim()).map_err(|e| invalid("OPTIMIZER_URL", e.to_string()))?;
        if !matches!(optimizer_url.scheme(), "http" | "https") {
            return Err(invalid("OPTIMIZER_URL", "scheme must be http or https"));
        }

        let optimizer_timeout = match get("OPTIMIZER_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid("OPTIMIZER_TIMEOUT_SECS", format!("`{}` is not a number", raw)))?;
                if secs == 0 {
                    return Err(invalid("OPTIMIZER_TIMEOUT_SECS", "must be greater than zero"));
                }
                Some(Duration::from_secs(secs))
            }
        };

        let catalog = match get("ASSET_CATALOG") {
            None => CatalogKind::Crypto,
            Some(raw) => CatalogKind::parse(&raw)
                .ok_or_else(|| invalid("ASSET_CATALOG", format!("`{}` is not crypto or extended", raw)))?,
        };

        let min_selection = match get("MIN_SELECTION") {
            None => catalog.default_min_selection(),
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid("MIN_SELECTION", format!("`{}` is not a number", raw)))?,
        };
        let catalog_size = AssetCatalog::for_kind(catalog).len();
        if min_selection == 0 || min_selection > catalog_size {
            return Err(invalid(
                "MIN_SELECTION",
                format!("must be between 1 and {}", catalog_size),
            ));
        }

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| invalid("BIND_ADDR", e.to_string()))?;

        let session_ttl_minutes = match get("SESSION_TTL_MINUTES") {
            None => DEFAULT_SESSION_TTL_MINUTES,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(v) if v > 0 => v,
                _ => return Err(invalid("SESSION_TTL_MINUTES", "must be a positive number")),
            },
        };

        Ok(Self {
            optimizer_url,
            optimizer_timeout,
            catalog,
            min_selection,
            bind_addr,
            session_ttl_minutes,
        })
    }
}
