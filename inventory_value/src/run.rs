//! One full valuation pass: fetch, count, price, record

use crate::aggregate::{count_priceable, price_items, ItemCounts, PricingSummary};
use crate::config::{Config, Pacing};
use crate::database::ValueSink;
use crate::error::{ErrorKind, Result, ValueError};
use crate::price_cache::PriceCache;
use crate::steam::{InventoryRequest, PriceQuery, SteamClient};

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub counts: ItemCounts,
    pub summary: PricingSummary,
    /// Total of the previous recorded run, if any
    pub previous_total: Option<f64>,
    /// Why the total could not be recorded, if it could not
    pub sink_error: Option<ErrorKind>,
}

impl RunReport {
    pub fn total_value(&self) -> f64 {
        self.summary.total_value
    }
}

/// Run one valuation pass.
///
/// Fails only when the inventory cannot be fetched completely; in that case
/// no total is computed and `sink` is never called. Cache and sink problems
/// are logged and reported in the [`RunReport`].
pub async fn execute(
    config: &Config,
    client: &SteamClient,
    pacing: &Pacing,
    sink: &mut dyn ValueSink,
) -> Result<RunReport> {
    let mut cache = PriceCache::load(&config.price_cache_file).with_ttl(config.cache_ttl());

    let request = InventoryRequest {
        owner_id: &config.identity,
        app_id: &config.collection_id,
        context_id: &config.subcollection_id,
        language: &config.language,
    };
    let inventory = client
        .fetch_inventory(&request, pacing)
        .await
        .map_err(ValueError::Inventory)?;

    let counts = count_priceable(&inventory.assets, &inventory.descriptions);
    log::info!(
        "Found {} unique marketable items ({} assets).",
        counts.len(),
        counts.total_items()
    );

    let query = PriceQuery {
        app_id: &config.collection_id,
        currency: &config.currency,
    };
    let summary = price_items(client, &mut cache, &counts, &query, pacing).await;

    if let Err(e) = cache.save() {
        log::error!(
            "Failed to save price cache {}: {}",
            cache.path().display(),
            e
        );
    }

    log::info!("--------------------------------------------------");
    log::info!(
        "Total Inventory Value: {:.2} (Currency ID: {})",
        summary.total_value,
        config.currency
    );

    let previous_total = match sink.latest_total(&config.identity) {
        Ok(previous) => previous,
        Err(e) => {
            log::warn!("Could not read previous total: {}", e);
            None
        }
    };
    if let Some(previous) = previous_total {
        log::info!(
            "Change since last run: {:+.2}",
            summary.total_value - previous
        );
    }

    let sink_error = match sink.append_total(&config.identity, summary.total_value) {
        Ok(()) => None,
        Err(e) => {
            log::error!("Error saving total to value history: {}", e);
            Some(e.kind())
        }
    };

    log::info!("Task Completed.");
    Ok(RunReport {
        counts,
        summary,
        previous_total,
        sink_error,
    })
}
