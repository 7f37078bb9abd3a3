//! Run settings loaded from `config.json`
//!
//! Keys follow the generic names (`identity`, `collection_id`, ...) but the
//! Steam-flavoured names of older config files (`steam_id`, `app_id`,
//! `context_id`, `sleep_interval`) are accepted as aliases.

use crate::error::{Result, ValueError};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Value shipped in the example config; a run with it would query a bogus profile
pub const PLACEHOLDER_IDENTITY: &str = "YOUR_STEAM_ID_64";

pub const DEFAULT_COMMUNITY_URL: &str = "https://steamcommunity.com";

/// Flat settings object consumed by a run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(alias = "steam_id", default, deserialize_with = "id_string")]
    pub identity: String,
    #[serde(
        alias = "app_id",
        default = "default_collection_id",
        deserialize_with = "id_string"
    )]
    pub collection_id: String,
    #[serde(
        alias = "context_id",
        default = "default_subcollection_id",
        deserialize_with = "id_string"
    )]
    pub subcollection_id: String,
    #[serde(default = "default_currency", deserialize_with = "id_string")]
    pub currency: String,
    #[serde(alias = "sleep_interval", default = "default_pacing_interval")]
    pub pacing_interval_seconds: f64,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_price_cache_file")]
    pub price_cache_file: PathBuf,
    #[serde(default = "default_db_path")]
    pub database: PathBuf,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_community_url")]
    pub community_url: String,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

fn default_collection_id() -> String {
    "730".to_string()
}

fn default_subcollection_id() -> String {
    "2".to_string()
}

fn default_currency() -> String {
    "1".to_string()
}

fn default_pacing_interval() -> f64 {
    3.0
}

fn default_log_file() -> PathBuf {
    PathBuf::from("inventory_value.log")
}

fn default_price_cache_file() -> PathBuf {
    PathBuf::from("price_cache.json")
}

/// Returns the default database path: ~/.local/share/inventory_value/values.db
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inventory_value")
        .join("values.db")
}

fn default_language() -> String {
    "english".to_string()
}

fn default_community_url() -> String {
    DEFAULT_COMMUNITY_URL.to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

/// Ids show up both as JSON numbers and as strings
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s.trim().to_string(),
    })
}

impl Config {
    /// Read and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValueError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
            .map_err(|e| ValueError::Config(format!("{} ({})", e, path.display())))
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| ValueError::Config(format!("invalid settings: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.identity.is_empty() {
            return Err(ValueError::Config("identity is not set".to_string()));
        }
        if self.identity == PLACEHOLDER_IDENTITY {
            return Err(ValueError::Config(format!(
                "identity is still the placeholder {}, please configure your Steam ID",
                PLACEHOLDER_IDENTITY
            )));
        }
        if Duration::try_from_secs_f64(self.pacing_interval_seconds).is_err() {
            return Err(ValueError::Config(format!(
                "pacing_interval_seconds must be a non-negative number of seconds, got {}",
                self.pacing_interval_seconds
            )));
        }
        Ok(())
    }

    /// Maximum age of a cached price
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Sleep schedule for this run
    pub fn pacing(&self) -> Pacing {
        Pacing {
            inter_item: Duration::try_from_secs_f64(self.pacing_interval_seconds)
                .unwrap_or_else(|_| Pacing::default().inter_item),
            ..Pacing::default()
        }
    }
}

/// Sleeps that keep the run under the upstream per-identity rate limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Between two successful inventory pages
    pub inter_page: Duration,
    /// Between two price lookups
    pub inter_item: Duration,
    /// After a 429 before asking again
    pub rate_limit_backoff: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            inter_page: Duration::from_secs(2),
            inter_item: Duration::from_secs(3),
            rate_limit_backoff: Duration::from_secs(60),
        }
    }
}

impl Pacing {
    /// No sleeping at all
    pub fn none() -> Self {
        Self {
            inter_page: Duration::ZERO,
            inter_item: Duration::ZERO,
            rate_limit_backoff: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_json(r#"{"identity": "76561198000000000"}"#).unwrap();

        assert_eq!(config.identity, "76561198000000000");
        assert_eq!(config.collection_id, "730");
        assert_eq!(config.subcollection_id, "2");
        assert_eq!(config.currency, "1");
        assert_eq!(config.pacing_interval_seconds, 3.0);
        assert_eq!(config.price_cache_file, PathBuf::from("price_cache.json"));
        assert_eq!(config.log_file, PathBuf::from("inventory_value.log"));
        assert_eq!(config.language, "english");
        assert_eq!(config.community_url, DEFAULT_COMMUNITY_URL);
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn steam_style_keys_are_accepted() {
        let config = Config::from_json(
            r#"{
                "steam_id": "76561198000000001",
                "app_id": 440,
                "context_id": "2",
                "currency": 3,
                "sleep_interval": 5,
                "log_file": "tracker.log",
                "price_cache_file": "cache/prices.json"
            }"#,
        )
        .unwrap();

        assert_eq!(config.identity, "76561198000000001");
        assert_eq!(config.collection_id, "440");
        assert_eq!(config.subcollection_id, "2");
        assert_eq!(config.currency, "3");
        assert_eq!(config.pacing().inter_item, Duration::from_secs(5));
        assert_eq!(config.log_file, PathBuf::from("tracker.log"));
        assert_eq!(config.price_cache_file, PathBuf::from("cache/prices.json"));
    }

    #[test]
    fn placeholder_identity_is_rejected() {
        let err = Config::from_json(r#"{"steam_id": "YOUR_STEAM_ID_64"}"#).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn missing_identity_is_rejected() {
        let err = Config::from_json(r#"{"app_id": 730}"#).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn negative_pacing_is_rejected() {
        let result =
            Config::from_json(r#"{"identity": "76561198000000000", "sleep_interval": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unrepresentable_pacing_is_rejected() {
        for interval in ["1e30", "1e400"] {
            let json = format!(
                r#"{{"identity": "76561198000000000", "sleep_interval": {}}}"#,
                interval
            );
            let err = Config::from_json(&json).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        }
    }

    #[test]
    fn fractional_pacing_is_kept() {
        let config =
            Config::from_json(r#"{"identity": "76561198000000000", "sleep_interval": 0.5}"#)
                .unwrap();
        assert_eq!(config.pacing().inter_item, Duration::from_millis(500));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = Config::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"identity": "76561198000000002", "currency": "3"}}"#).unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.identity, "76561198000000002");
        assert_eq!(config.currency, "3");
    }

    #[test]
    fn default_pacing_matches_upstream_limits() {
        let pacing = Pacing::default();
        assert_eq!(pacing.inter_page, Duration::from_secs(2));
        assert_eq!(pacing.inter_item, Duration::from_secs(3));
        assert_eq!(pacing.rate_limit_backoff, Duration::from_secs(60));
    }
}
