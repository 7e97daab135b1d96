use std::net::SocketAddr;
use std::path::PathBuf;

pub use vecstat_core::ENV_CATALOG;
use vecstat_core::{FetchConfig, DEFAULT_CATALOG_PATH};

use crate::error::ServerError;

pub const ENV_BIND: &str = "VECSTAT_BIND";
pub const ENV_PUBLIC_DIR: &str = "VECSTAT_PUBLIC_DIR";

pub const DEFAULT_BIND: &str = "127.0.0.1:8888";

/// Server settings read from `VECSTAT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub catalog_path: PathBuf,
    /// Directory of front-end assets served for unmatched paths.
    pub public_dir: Option<PathBuf>,
    pub fetch: FetchConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let bind_raw = value(ENV_BIND).unwrap_or_else(|| String::from(DEFAULT_BIND));
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ServerError::InvalidConfig {
                key: ENV_BIND,
                value: bind_raw.clone(),
            })?;

        Ok(Self {
            bind,
            catalog_path: value(ENV_CATALOG)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            public_dir: value(ENV_PUBLIC_DIR).map(PathBuf::from),
            fetch: FetchConfig::from_lookup(&lookup),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let config = ServerConfig::from_lookup(|_| None).expect("defaults are valid");
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().expect("addr"));
        assert_eq!(config.catalog_path, PathBuf::from("data.json"));
        assert!(config.public_dir.is_none());
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            ENV_BIND => Some(String::from("0.0.0.0:9000")),
            ENV_CATALOG => Some(String::from("/srv/catalog.json")),
            ENV_PUBLIC_DIR => Some(String::from("dist")),
            "VECSTAT_TIMEOUT_MS" => Some(String::from("2000")),
            _ => None,
        })
        .expect("valid config");
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.catalog_path, PathBuf::from("/srv/catalog.json"));
        assert_eq!(config.public_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.fetch.timeout_ms, 2000);
    }

    #[test]
    fn rejects_bad_bind_address() {
        let err = ServerConfig::from_lookup(|key| {
            (key == ENV_BIND).then(|| String::from("localhost"))
        })
        .expect_err("must fail");
        assert!(matches!(err, ServerError::InvalidConfig { key: ENV_BIND, .. }));
    }
}
