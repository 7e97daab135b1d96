//! Runtime configuration for the vector fetcher.
//!
//! Values come from `VECSTAT_*` environment variables; binaries layer their
//! command-line flags on top.

/// WDS batch endpoint returning the latest N periods for a list of vectors.
pub const WDS_VECTORS_ENDPOINT: &str =
    "https://www150.statcan.gc.ca/t1/wds/rest/getDataFromVectorsAndLatestNPeriods";

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_UPSTREAM_URL: &str = "VECSTAT_UPSTREAM_URL";
pub const ENV_TIMEOUT_MS: &str = "VECSTAT_TIMEOUT_MS";
/// Catalog file location, read by the binaries rather than [`FetchConfig`].
pub const ENV_CATALOG: &str = "VECSTAT_CATALOG";

/// Upstream endpoint and transport budget for one adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from(WDS_VECTORS_ENDPOINT),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FetchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Blank or
    /// unparseable values keep the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let endpoint = lookup(ENV_UPSTREAM_URL)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.endpoint);
        let timeout_ms = lookup(ENV_TIMEOUT_MS)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.timeout_ms);

        Self {
            endpoint,
            timeout_ms,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
