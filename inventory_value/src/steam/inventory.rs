use super::SteamClient;
use crate::config::Pacing;
use market_common::{Asset, Description, InventoryPage, InventoryResponse, MarketError, MarketResult};
use reqwest::header::REFERER;
use reqwest::StatusCode;
use tokio::time::sleep;

/// Largest page the inventory endpoint serves reliably; 5000 regularly yields 400s
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Which inventory to fetch
#[derive(Debug, Clone, Copy)]
pub struct InventoryRequest<'a> {
    pub owner_id: &'a str,
    pub app_id: &'a str,
    pub context_id: &'a str,
    pub language: &'a str,
}

/// All pages of an inventory, concatenated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub assets: Vec<Asset>,
    pub descriptions: Vec<Description>,
}

impl Inventory {
    fn extend(&mut self, page: InventoryPage) {
        self.assets.extend(page.assets);
        self.descriptions.extend(page.descriptions);
    }
}

impl SteamClient {
    /// Fetch the complete inventory, following cursors until the last page.
    ///
    /// A 429 sleeps `pacing.rate_limit_backoff` and asks for the same page
    /// again, without limit. Every other failure aborts the whole fetch; a
    /// partial inventory is never returned.
    pub async fn fetch_inventory(
        &self,
        request: &InventoryRequest<'_>,
        pacing: &Pacing,
    ) -> MarketResult<Inventory> {
        let url = format!(
            "{}/inventory/{}/{}/{}",
            self.base_url,
            urlencoding::encode(request.owner_id),
            urlencoding::encode(request.app_id),
            urlencoding::encode(request.context_id)
        );

        log::info!(
            "Fetching inventory for {} (App: {}, Context: {})...",
            request.owner_id,
            request.app_id,
            request.context_id
        );

        let mut inventory = Inventory::default();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = match self.fetch_inventory_page(&url, request, cursor.as_deref()).await {
                Ok(page) => page,
                Err(MarketError::RateLimited) => {
                    log::error!(
                        "Rate limited fetching inventory. Waiting {}s...",
                        pacing.rate_limit_backoff.as_secs()
                    );
                    sleep(pacing.rate_limit_backoff).await;
                    continue;
                }
                Err(e) => {
                    log::error!("Failed to fetch inventory page {}: {}", pages + 1, e);
                    return Err(e);
                }
            };

            pages += 1;
            let next = page.next_cursor().map(str::to_string);
            inventory.extend(page);

            match next {
                Some(next) => {
                    cursor = Some(next);
                    sleep(pacing.inter_page).await;
                }
                None => break,
            }
        }

        log::info!(
            "Fetched inventory: {} assets, {} descriptions in {} page(s)",
            inventory.assets.len(),
            inventory.descriptions.len(),
            pages
        );
        Ok(inventory)
    }

    async fn fetch_inventory_page(
        &self,
        url: &str,
        request: &InventoryRequest<'_>,
        cursor: Option<&str>,
    ) -> MarketResult<InventoryPage> {
        log::info!("Requesting page... (start_assetid={:?})", cursor);

        let page_size = MAX_PAGE_SIZE.to_string();
        let mut query: Vec<(&str, &str)> =
            vec![("l", request.language), ("count", page_size.as_str())];
        if let Some(cursor) = cursor {
            query.push(("start_assetid", cursor));
        }

        let response = self
            .http
            .get(url)
            .header(REFERER, self.referer.as_str())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!(
                "Failed to fetch inventory. Status: {}. Response: {}",
                status,
                body
            );
            return Err(MarketError::HttpStatus(status));
        }

        let body = response.text().await?;
        let parsed: InventoryResponse = serde_json::from_str(&body)?;
        parsed.into_page()
    }
}
