//! Steam Community client: inventory paging and market price lookups

mod client;
mod inventory;
mod price;

pub use client::SteamClient;
pub use inventory::{Inventory, InventoryRequest, MAX_PAGE_SIZE};
pub use price::{PriceFailure, PriceOutcome, PriceQuery};

#[cfg(test)]
#[path = "steam_tests.rs"]
mod tests;
