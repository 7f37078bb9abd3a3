//! Shared types for Steam Community marketplace operations.
//!
//! Wire formats for the inventory and price overview endpoints, the
//! locale-agnostic price string parser and the error type used by the clients.

pub mod error;
pub mod price;
pub mod steam;

pub use error::{MarketError, MarketResult};
pub use price::{parse_price, PriceParseError};
pub use steam::{Asset, Description, InventoryPage, InventoryResponse, PriceOverview};
