//! Steam Community inventory and price overview payloads

use crate::error::{MarketError, MarketResult};
use serde::{Deserialize, Deserializer, Serialize};

/// One owned item instance from the inventory endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub assetid: String,
    pub classid: String,
    #[serde(default = "default_instance_id")]
    pub instanceid: String,
    #[serde(default = "default_amount")]
    pub amount: String,
}

/// Shared metadata for every asset of one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub classid: String,
    #[serde(default = "default_instance_id")]
    pub instanceid: String,
    #[serde(default)]
    pub market_hash_name: String,
    #[serde(default, deserialize_with = "flag")]
    pub marketable: bool,
}

impl Description {
    /// Marketable and carrying a name the price endpoint can look up
    pub fn is_priceable(&self) -> bool {
        self.marketable && !self.market_hash_name.is_empty()
    }
}

fn default_instance_id() -> String {
    "0".to_string()
}

fn default_amount() -> String {
    "1".to_string()
}

/// Raw response of `GET /inventory/<owner>/<app>/<context>`
///
/// Empty inventories come back without `assets`/`descriptions` at all, so
/// every collection defaults to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryResponse {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default, deserialize_with = "flag")]
    pub more_items: bool,
    #[serde(default)]
    pub last_assetid: Option<String>,
    #[serde(default)]
    pub total_inventory_count: Option<u64>,
}

impl InventoryResponse {
    /// Validate the payload and turn it into a page.
    ///
    /// A payload that claims more items without a cursor cannot be continued
    /// and is rejected rather than re-requesting the first page forever.
    pub fn into_page(self) -> MarketResult<InventoryPage> {
        if !self.success {
            return Err(MarketError::Unsuccessful(
                "inventory endpoint reported failure".to_string(),
            ));
        }
        if self.more_items && self.last_assetid.as_deref().unwrap_or("").is_empty() {
            return Err(MarketError::Unsuccessful(
                "inventory page reports more items but carries no cursor".to_string(),
            ));
        }
        if let Some(total) = self.total_inventory_count {
            log::debug!(
                "Inventory page: {} assets, {} descriptions (inventory total: {})",
                self.assets.len(),
                self.descriptions.len(),
                total
            );
        }
        Ok(InventoryPage {
            assets: self.assets,
            descriptions: self.descriptions,
            has_more: self.more_items,
            cursor: self.last_assetid,
        })
    }
}

/// One validated page of the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryPage {
    pub assets: Vec<Asset>,
    pub descriptions: Vec<Description>,
    pub has_more: bool,
    pub cursor: Option<String>,
}

impl InventoryPage {
    /// Cursor for the following page; `None` once the inventory is exhausted
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.cursor.as_deref()
        } else {
            None
        }
    }
}

/// Response of `GET /market/priceoverview/`
#[derive(Debug, Clone, Deserialize)]
pub struct PriceOverview {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    #[serde(default)]
    pub lowest_price: Option<String>,
    #[serde(default)]
    pub median_price: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

impl PriceOverview {
    /// Raw price text, preferring the lowest listing over the median sale
    pub fn price_text(&self) -> Option<&str> {
        self.lowest_price
            .as_deref()
            .or(self.median_price.as_deref())
    }
}

/// Steam mixes `1`/`0`, `true`/`false` and `"1"` for boolean fields
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        Some(Flag::Text(s)) => matches!(s.trim(), "1" | "true"),
        None => false,
    })
}
