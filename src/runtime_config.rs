// =============================================================================
// Runtime Configuration — dashboard server settings
// =============================================================================
//
// Every tunable lives here: bind address, dashboard defaults, cache horizons
// and the upstream data endpoint. All fields carry `#[serde(default)]` so a
// partial (or empty) JSON file still loads. A handful of environment
// variables override the file after loading.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Config file read at startup unless `DASHBOARD_CONFIG` points elsewhere.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_symbol() -> String {
    "MSFT".to_string()
}

fn default_lookback_days() -> i64 {
    365
}

fn default_history_ttl_secs() -> u64 {
    3_600
}

fn default_company_ttl_secs() -> u64 {
    86_400
}

fn default_cache_purge_interval_secs() -> u64 {
    600
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_raw_rows() -> usize {
    5
}

fn default_volume_average_window() -> usize {
    20
}

// =============================================================================
// DashboardConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    // --- Server --------------------------------------------------------------

    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Dashboard defaults --------------------------------------------------

    /// Symbol shown when the request does not name one.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    /// Default range is `[today - default_lookback_days, today]`.
    #[serde(default = "default_lookback_days")]
    pub default_lookback_days: i64,

    /// Rows of the augmented series returned for the raw-data table.
    #[serde(default = "default_raw_rows")]
    pub raw_rows: usize,

    /// Trailing window for the average-volume metric.
    #[serde(default = "default_volume_average_window")]
    pub volume_average_window: usize,

    // --- Caching -------------------------------------------------------------

    /// Time-to-live of cached price history.
    #[serde(default = "default_history_ttl_secs")]
    pub history_ttl_secs: u64,

    /// Time-to-live of cached company metadata.
    #[serde(default = "default_company_ttl_secs")]
    pub company_ttl_secs: u64,

    /// How often expired cache entries are dropped.
    #[serde(default = "default_cache_purge_interval_secs")]
    pub cache_purge_interval_secs: u64,

    // --- Upstream ------------------------------------------------------------

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            default_symbol: default_symbol(),
            default_lookback_days: default_lookback_days(),
            raw_rows: default_raw_rows(),
            volume_average_window: default_volume_average_window(),
            history_ttl_secs: default_history_ttl_secs(),
            company_ttl_secs: default_company_ttl_secs(),
            cache_purge_interval_secs: default_cache_purge_interval_secs(),
            yahoo_base_url: default_yahoo_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dashboard config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            default_symbol = %config.default_symbol,
            "dashboard config loaded"
        );

        Ok(config)
    }

    /// Apply `DASHBOARD_BIND_ADDR` / `DASHBOARD_DEFAULT_SYMBOL` overrides
    /// through `lookup` (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("DASHBOARD_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(sym) = lookup("DASHBOARD_DEFAULT_SYMBOL").filter(|s| !s.trim().is_empty()) {
            self.default_symbol = sym.trim().to_uppercase();
        }
    }

    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }

    pub fn company_ttl(&self) -> Duration {
        Duration::from_secs(self.company_ttl_secs)
    }

    /// Never zero, so it can drive `tokio::time::interval`.
    pub fn cache_purge_interval(&self) -> Duration {
        Duration::from_secs(self.cache_purge_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.default_symbol, "MSFT");
        assert_eq!(cfg.default_lookback_days, 365);
        assert_eq!(cfg.history_ttl(), Duration::from_secs(3_600));
        assert_eq!(cfg.company_ttl(), Duration::from_secs(86_400));
        assert_eq!(cfg.raw_rows, 5);
        assert_eq!(cfg.volume_average_window, 20);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "default_symbol": "TSLA", "history_ttl_secs": 60 }"#;
        let cfg: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.default_symbol, "TSLA");
        assert_eq!(cfg.history_ttl_secs, 60);
        assert_eq!(cfg.company_ttl_secs, 86_400);
        assert_eq!(cfg.yahoo_base_url, "https://query1.finance.yahoo.com");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let err = DashboardConfig::load("/nonexistent/dashboard_config.json").unwrap_err();
        assert!(err.to_string().contains("failed to read dashboard config"));
    }

    #[test]
    fn env_overrides_apply_when_set() {
        let mut cfg = DashboardConfig::default();
        cfg.apply_overrides(|key| match key {
            "DASHBOARD_BIND_ADDR" => Some("127.0.0.1:8080".to_string()),
            "DASHBOARD_DEFAULT_SYMBOL" => Some(" googl ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.default_symbol, "GOOGL");

        let mut untouched = DashboardConfig::default();
        untouched.apply_overrides(|_| Some("   ".to_string()));
        assert_eq!(untouched, DashboardConfig::default());
    }

    #[test]
    fn purge_interval_is_never_zero() {
        let cfg = DashboardConfig {
            cache_purge_interval_secs: 0,
            ..DashboardConfig::default()
        };
        assert_eq!(cfg.cache_purge_interval(), Duration::from_secs(1));
    }
}
