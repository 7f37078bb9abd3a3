//! Persistent time-limited cache for market prices
//!
//! Prices are stored in a flat JSON file keyed by market hash name. The file
//! layout (`price`, `timestamp`, `currency`, `appid`) matches the caches
//! written by earlier tooling, so an existing file keeps working.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default maximum age of a cached price
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// One cached price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub price: f64,
    /// Unix seconds at which the price was captured
    #[serde(rename = "timestamp")]
    pub captured_at: f64,
    pub currency: String,
    /// App id of the marketplace partition the price belongs to
    #[serde(rename = "appid")]
    pub market_scope: String,
}

impl CacheEntry {
    /// Entry captured right now
    pub fn now(price: f64, currency: &str, market_scope: &str) -> Self {
        Self {
            price,
            captured_at: now_secs(),
            currency: currency.to_string(),
            market_scope: market_scope.to_string(),
        }
    }
}

/// Current time as fractional unix seconds
pub fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Whether an entry is younger than `ttl` at `now` (unix seconds).
///
/// Non-finite timestamps never count as valid.
pub fn is_valid(entry: &CacheEntry, ttl: Duration, now: f64) -> bool {
    entry.captured_at.is_finite() && now - entry.captured_at < ttl.as_secs_f64()
}

/// Market name → price cache backed by a JSON file
#[derive(Debug)]
pub struct PriceCache {
    path: PathBuf,
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl PriceCache {
    /// Empty cache that will be saved to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
            entries: HashMap::new(),
        }
    }

    /// Load cache from disk, or start empty if the file is missing or unreadable.
    ///
    /// Entries that do not decode are dropped one by one; the rest of the
    /// file is kept.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut cache = Self::empty(path);
        if !cache.path.exists() {
            log::info!(
                "No price cache at {}, starting empty",
                cache.path.display()
            );
            return cache;
        }

        let raw: HashMap<String, serde_json::Value> = match std::fs::read_to_string(&cache.path)
        {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!(
                        "Could not parse price cache {}, starting fresh: {}",
                        cache.path.display(),
                        e
                    );
                    return cache;
                }
            },
            Err(e) => {
                log::warn!(
                    "Could not read price cache {}, starting fresh: {}",
                    cache.path.display(),
                    e
                );
                return cache;
            }
        };

        for (name, value) in raw {
            match serde_json::from_value::<CacheEntry>(value) {
                Ok(entry) => {
                    cache.entries.insert(name, entry);
                }
                Err(e) => log::warn!("Dropping malformed cache entry for {}: {}", name, e),
            }
        }

        log::info!(
            "Loaded price cache with {} entries from {}",
            cache.entries.len(),
            cache.path.display()
        );
        cache
    }

    /// Replace the maximum entry age
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save cache to disk.
    ///
    /// Writes a sibling temp file and renames it over the cache, so an
    /// interrupted save leaves the previous file in place.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string(&self.entries)?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;

        log::debug!(
            "Saved price cache with {} entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Cached price for `name` if it belongs to the same app and currency and
    /// is still within the TTL at `now`
    pub fn lookup(&self, name: &str, market_scope: &str, currency: &str, now: f64) -> Option<f64> {
        self.entries
            .get(name)
            .filter(|entry| entry.market_scope == market_scope && entry.currency == currency)
            .filter(|entry| is_valid(entry, self.ttl, now))
            .filter(|entry| entry.price.is_finite())
            .map(|entry| entry.price)
    }

    pub fn get(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: &str, entry: CacheEntry) {
        self.entries.insert(name.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn entry(price: f64, captured_at: f64) -> CacheEntry {
        CacheEntry {
            price,
            captured_at,
            currency: "1".to_string(),
            market_scope: "730".to_string(),
        }
    }

    #[test]
    fn validity_is_a_function_of_age() {
        let now = 10_000.0;
        assert!(is_valid(&entry(1.0, now - 10.0), DEFAULT_TTL, now));
        assert!(is_valid(&entry(1.0, now - 3599.0), DEFAULT_TTL, now));
        assert!(!is_valid(&entry(1.0, now - 3600.0), DEFAULT_TTL, now));
        assert!(!is_valid(&entry(1.0, now - 7200.0), DEFAULT_TTL, now));
    }

    #[test]
    fn non_finite_timestamps_are_invalid() {
        assert!(!is_valid(&entry(1.0, f64::NAN), DEFAULT_TTL, 100.0));
        assert!(!is_valid(&entry(1.0, f64::INFINITY), DEFAULT_TTL, 100.0));
    }

    #[test]
    fn missing_file_gives_empty_cache() {
        let dir = TempDir::new().unwrap();
        let cache = PriceCache::load(dir.path().join("price_cache.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_file_gives_empty_cache() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{ not valid json").unwrap();

        let cache = PriceCache::load(tmp.path());
        assert!(cache.is_empty());
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{
                "Good Item": {{"price": 1.5, "timestamp": 1700000000.0, "currency": "1", "appid": "730"}},
                "Bad Timestamp": {{"price": 2.0, "timestamp": "yesterday", "currency": "1", "appid": "730"}},
                "No Price": {{"timestamp": 1700000000.0, "currency": "1", "appid": "730"}}
            }}"#
        )
        .unwrap();

        let cache = PriceCache::load(tmp.path());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("Good Item").unwrap().price, 1.5);
        assert!(cache.get("Bad Timestamp").is_none());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("price_cache.json");

        let mut cache = PriceCache::empty(&path);
        cache.insert("Operation Breakout Weapon Case", entry(0.42, 1_700_000_000.0));
        cache.save().unwrap();

        let reloaded = PriceCache::load(&path);
        assert_eq!(
            reloaded.get("Operation Breakout Weapon Case"),
            Some(&entry(0.42, 1_700_000_000.0))
        );
        assert!(!dir.path().join("nested").join("price_cache.json.tmp").exists());
    }

    #[test]
    fn saved_file_uses_legacy_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("price_cache.json");

        let mut cache = PriceCache::empty(&path);
        cache.insert("Sticker | Crown (Foil)", entry(310.0, 1_700_000_000.0));
        cache.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        let stored = &json["Sticker | Crown (Foil)"];
        assert_eq!(stored["price"], 310.0);
        assert_eq!(stored["timestamp"], 1_700_000_000.0);
        assert_eq!(stored["currency"], "1");
        assert_eq!(stored["appid"], "730");
    }

    #[test]
    fn lookup_requires_matching_scope_and_currency() {
        let now = now_secs();
        let mut cache = PriceCache::empty("unused.json");
        cache.insert("Item", entry(2.5, now - 5.0));

        assert_eq!(cache.lookup("Item", "730", "1", now), Some(2.5));
        assert_eq!(cache.lookup("Item", "730", "3", now), None);
        assert_eq!(cache.lookup("Item", "440", "1", now), None);
        assert_eq!(cache.lookup("Other", "730", "1", now), None);
    }

    #[test]
    fn lookup_ignores_stale_entries() {
        let now = now_secs();
        let mut cache = PriceCache::empty("unused.json").with_ttl(Duration::from_secs(60));
        cache.insert("Fresh", entry(1.0, now - 30.0));
        cache.insert("Stale", entry(1.0, now - 90.0));

        assert_eq!(cache.lookup("Fresh", "730", "1", now), Some(1.0));
        assert_eq!(cache.lookup("Stale", "730", "1", now), None);
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let cache = PriceCache::empty(blocker.join("price_cache.json"));
        let err = cache.save().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::CacheIo);
    }
}
