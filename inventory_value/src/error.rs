//! Error types for inventory_value

use market_common::MarketError;
use std::fmt;

/// Recovery categories for everything that can go wrong during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing/placeholder identity or unreadable settings; fatal before any request
    Configuration,
    /// Non-200 statuses, transport failures and bad payloads on price lookups
    TransientNetwork,
    /// 429 Too Many Requests
    RateLimited,
    /// Inventory paging failed; the run produces no total
    InventoryFetch,
    /// Price cache could not be read or written
    CacheIo,
    /// The value history could not record the total
    Sink,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::TransientNetwork => "transient network",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::InventoryFetch => "inventory fetch",
            ErrorKind::CacheIo => "cache I/O",
            ErrorKind::Sink => "value sink",
        };
        f.write_str(name)
    }
}

/// Unified error type for inventory_value operations
#[derive(Debug)]
pub enum ValueError {
    /// Settings file missing, unparsable or still carrying placeholders
    Config(String),
    /// Inventory could not be fetched completely
    Inventory(MarketError),
    /// File I/O error (price cache)
    Io(std::io::Error),
    /// Failed to serialize or parse the price cache
    CacheFormat(serde_json::Error),
    /// Database operation failed
    Database(rusqlite::Error),
    /// No value history is available to record into
    SinkUnavailable(String),
}

impl ValueError {
    /// Recovery category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValueError::Config(_) => ErrorKind::Configuration,
            ValueError::Inventory(_) => ErrorKind::InventoryFetch,
            ValueError::Io(_) | ValueError::CacheFormat(_) => ErrorKind::CacheIo,
            ValueError::Database(_) | ValueError::SinkUnavailable(_) => ErrorKind::Sink,
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ValueError::Inventory(e) => write!(f, "Inventory fetch failed: {}", e),
            ValueError::Io(e) => write!(f, "I/O error: {}", e),
            ValueError::CacheFormat(e) => write!(f, "Cache format error: {}", e),
            ValueError::Database(e) => write!(f, "Database error: {}", e),
            ValueError::SinkUnavailable(reason) => {
                write!(f, "Value history unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for ValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValueError::Inventory(e) => Some(e),
            ValueError::Io(e) => Some(e),
            ValueError::CacheFormat(e) => Some(e),
            ValueError::Database(e) => Some(e),
            ValueError::Config(_) | ValueError::SinkUnavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for ValueError {
    fn from(err: std::io::Error) -> Self {
        ValueError::Io(err)
    }
}

impl From<serde_json::Error> for ValueError {
    fn from(err: serde_json::Error) -> Self {
        ValueError::CacheFormat(err)
    }
}

impl From<rusqlite::Error> for ValueError {
    fn from(err: rusqlite::Error) -> Self {
        ValueError::Database(err)
    }
}

/// Result alias for inventory_value operations
pub type Result<T> = std::result::Result<T, ValueError>;
