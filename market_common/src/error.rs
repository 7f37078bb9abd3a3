//! Error types for marketplace requests

use thiserror::Error;

/// Errors raised while talking to the marketplace endpoints
#[derive(Debug, Error)]
pub enum MarketError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code other than 429
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Upstream answered 429 Too Many Requests
    #[error("Rate limited (429 Too Many Requests)")]
    RateLimited,
    /// Payload decoded but the endpoint reported failure or is unusable
    #[error("Upstream reported failure: {0}")]
    Unsuccessful(String),
}

/// Result alias for marketplace operations
pub type MarketResult<T> = Result<T, MarketError>;
