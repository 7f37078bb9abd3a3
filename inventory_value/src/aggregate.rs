//! Joining inventory assets to descriptions and pricing the result

use crate::config::Pacing;
use crate::error::ErrorKind;
use crate::price_cache::PriceCache;
use crate::steam::{PriceOutcome, PriceQuery, SteamClient};
use market_common::{Asset, Description};
use std::collections::HashMap;
use tokio::time::sleep;

/// Count of owned priceable items per market name, in order of first encounter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCounts {
    order: Vec<String>,
    counts: HashMap<String, u32>,
}

impl ItemCounts {
    fn add(&mut self, market_name: &str) {
        match self.counts.get_mut(market_name) {
            Some(count) => *count += 1,
            None => {
                self.order.push(market_name.to_string());
                self.counts.insert(market_name.to_string(), 1);
            }
        }
    }

    /// Count for one market name, 0 if not owned
    pub fn get(&self, market_name: &str) -> u32 {
        self.counts.get(market_name).copied().unwrap_or(0)
    }

    /// Number of distinct market names
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of counted assets
    pub fn total_items(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.counts[name]))
    }
}

/// Count assets per market name, keeping only those whose description is
/// marketable.
///
/// Descriptions are matched on `classid`; when a class is described twice the
/// later description wins. Assets without a description are skipped.
pub fn count_priceable(assets: &[Asset], descriptions: &[Description]) -> ItemCounts {
    let by_class: HashMap<&str, &Description> = descriptions
        .iter()
        .map(|d| (d.classid.as_str(), d))
        .collect();

    let mut counts = ItemCounts::default();
    let mut skipped = 0usize;
    for asset in assets {
        match by_class.get(asset.classid.as_str()) {
            Some(desc) if desc.is_priceable() => counts.add(&desc.market_hash_name),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {} non-marketable or undescribed assets", skipped);
    }
    counts
}

/// Price of one distinct item in a run
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPrice {
    pub market_name: String,
    pub count: u32,
    pub unit_price: f64,
    pub subtotal: f64,
    /// Set when the price fell back to 0 because of a failure
    pub degraded: Option<ErrorKind>,
}

/// Outcome of pricing a whole inventory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingSummary {
    pub items: Vec<ItemPrice>,
    pub total_value: f64,
}

impl PricingSummary {
    /// Items whose price fell back to 0 because of `kind`
    pub fn degraded(&self, kind: ErrorKind) -> impl Iterator<Item = &ItemPrice> + '_ {
        self.items
            .iter()
            .filter(move |item| item.degraded == Some(kind))
    }
}

/// Price every counted item one after another and sum the total.
///
/// A rate-limited lookup is retried once after `pacing.rate_limit_backoff`;
/// if the retry is rate limited too the item counts as 0 for this run.
/// Lookups are separated by `pacing.inter_item`.
pub async fn price_items(
    client: &SteamClient,
    cache: &mut PriceCache,
    counts: &ItemCounts,
    query: &PriceQuery<'_>,
    pacing: &Pacing,
) -> PricingSummary {
    let mut summary = PricingSummary::default();
    let total_items = counts.len();

    for (index, (name, count)) in counts.iter().enumerate() {
        if index > 0 {
            sleep(pacing.inter_item).await;
        }

        let mut outcome = client.resolve_price(name, query, cache).await;
        if outcome == PriceOutcome::RateLimited {
            log::warn!(
                "Hit rate limit. Sleeping for {} seconds...",
                pacing.rate_limit_backoff.as_secs()
            );
            sleep(pacing.rate_limit_backoff).await;
            outcome = client.resolve_price(name, query, cache).await;
        }

        let (unit_price, degraded) = match outcome {
            PriceOutcome::Priced(price) => (price, None),
            PriceOutcome::RateLimited => {
                log::warn!("Still rate limited, giving up on {} for this run", name);
                (0.0, Some(ErrorKind::RateLimited))
            }
            PriceOutcome::Failed(failure) => (0.0, Some(failure.kind())),
        };

        let subtotal = unit_price * f64::from(count);
        summary.total_value += subtotal;

        log::info!(
            "[{}/{}] {}: {} x {} = {:.2}",
            index + 1,
            total_items,
            name,
            count,
            unit_price,
            subtotal
        );

        summary.items.push(ItemPrice {
            market_name: name.to_string(),
            count,
            unit_price,
            subtotal,
            degraded,
        });
    }

    summary
}
