use super::SteamClient;
use crate::error::ErrorKind;
use crate::price_cache::{now_secs, CacheEntry, PriceCache};
use market_common::{parse_price, MarketError, MarketResult, PriceOverview};
use reqwest::header::REFERER;
use reqwest::StatusCode;

/// App and currency a price is requested for
#[derive(Debug, Clone, Copy)]
pub struct PriceQuery<'a> {
    pub app_id: &'a str,
    pub currency: &'a str,
}

/// Result of one price resolution
#[derive(Debug, Clone, PartialEq)]
pub enum PriceOutcome {
    /// Unit price, from cache or network; `0.0` for unparsable or missing prices
    Priced(f64),
    /// 429 from the price endpoint; backing off is up to the caller
    RateLimited,
    /// Lookup failed in a way that may succeed on a later run; nothing was cached
    Failed(PriceFailure),
}

/// Why a price lookup failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceFailure {
    HttpStatus(u16),
    Unsuccessful,
    Network(String),
    Malformed(String),
}

impl PriceFailure {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::TransientNetwork
    }
}

impl SteamClient {
    /// Resolve the unit price of `market_name`, consulting `cache` first.
    ///
    /// Network results, including the `0.0` used for unparsable or missing
    /// price fields, are written to the cache and the cache is saved right
    /// away. Rate limits and failed requests leave the cache untouched.
    pub async fn resolve_price(
        &self,
        market_name: &str,
        query: &PriceQuery<'_>,
        cache: &mut PriceCache,
    ) -> PriceOutcome {
        if let Some(price) = cache.lookup(market_name, query.app_id, query.currency, now_secs()) {
            log::debug!("Cache hit for {}: {}", market_name, price);
            return PriceOutcome::Priced(price);
        }

        let overview = match self.fetch_price_overview(market_name, query).await {
            Ok(overview) => overview,
            Err(MarketError::RateLimited) => {
                log::warn!("Rate limited on price check for {}", market_name);
                return PriceOutcome::RateLimited;
            }
            Err(MarketError::HttpStatus(status)) => {
                log::warn!(
                    "Failed to get price for {}. Status: {}",
                    market_name,
                    status
                );
                return PriceOutcome::Failed(PriceFailure::HttpStatus(status.as_u16()));
            }
            Err(MarketError::Unsuccessful(_)) => {
                log::warn!("Price endpoint reported failure for {}", market_name);
                return PriceOutcome::Failed(PriceFailure::Unsuccessful);
            }
            Err(MarketError::Parse(e)) => {
                log::error!("Malformed price response for {}: {}", market_name, e);
                return PriceOutcome::Failed(PriceFailure::Malformed(e.to_string()));
            }
            Err(MarketError::Network(e)) => {
                log::error!("Error getting price for {}: {}", market_name, e);
                return PriceOutcome::Failed(PriceFailure::Network(e.to_string()));
            }
        };

        let price = match overview.price_text() {
            Some(raw) => parse_price(raw).unwrap_or_else(|e| {
                log::warn!("{} for {}, pricing at 0", e, market_name);
                0.0
            }),
            None => {
                log::warn!("No price listed for {}, pricing at 0", market_name);
                0.0
            }
        };

        cache.insert(
            market_name,
            CacheEntry::now(price, query.currency, query.app_id),
        );
        if let Err(e) = cache.save() {
            log::error!(
                "Failed to save price cache {}: {}",
                cache.path().display(),
                e
            );
        }

        PriceOutcome::Priced(price)
    }

    async fn fetch_price_overview(
        &self,
        market_name: &str,
        query: &PriceQuery<'_>,
    ) -> MarketResult<PriceOverview> {
        let url = format!("{}/market/priceoverview/", self.base_url);
        log::debug!("Fetching price for {}", market_name);

        let response = self
            .http
            .get(&url)
            .header(REFERER, self.referer.as_str())
            .query(&[
                ("appid", query.app_id),
                ("currency", query.currency),
                ("market_hash_name", market_name),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimited);
        }
        if status != StatusCode::OK {
            return Err(MarketError::HttpStatus(status));
        }

        let body = response.text().await?;
        let overview: PriceOverview = serde_json::from_str(&body)?;
        if !overview.success {
            return Err(MarketError::Unsuccessful(format!(
                "price overview for {}",
                market_name
            )));
        }
        Ok(overview)
    }
}
