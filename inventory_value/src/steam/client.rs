use crate::config::DEFAULT_COMMUNITY_URL;
use market_common::MarketResult;

/// The community site answers bare clients with 400s, so requests look like a browser
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client for one identity's inventory and the public market
#[derive(Debug, Clone)]
pub struct SteamClient {
    pub(super) http: reqwest::Client,
    pub(super) base_url: String,
    pub(super) referer: String,
}

impl SteamClient {
    /// Client for the live Steam Community site
    pub fn new(identity: &str) -> MarketResult<Self> {
        Self::with_base_url(DEFAULT_COMMUNITY_URL, identity)
    }

    /// Client against another base URL (for testing with mock servers)
    pub fn with_base_url(base_url: &str, identity: &str) -> MarketResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let referer = format!(
            "{}/profiles/{}/inventory",
            base_url,
            urlencoding::encode(identity)
        );

        Ok(Self {
            http,
            base_url,
            referer,
        })
    }
}
