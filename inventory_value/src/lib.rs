//! Inventory Value - Steam inventory valuation
//!
//! Fetches a Steam inventory page by page, prices every marketable item on the
//! Community Market (with a one-hour file cache and polite pacing) and records
//! the running total in a SQLite value history.

pub mod aggregate;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod price_cache;
pub mod run;
pub mod steam;

pub use aggregate::{count_priceable, price_items, ItemCounts, ItemPrice, PricingSummary};
pub use config::{Config, Pacing};
pub use database::{ValueHistory, ValueSink};
pub use error::{ErrorKind, Result, ValueError};
pub use price_cache::{CacheEntry, PriceCache};
pub use run::{execute, RunReport};
pub use steam::{PriceOutcome, SteamClient};
