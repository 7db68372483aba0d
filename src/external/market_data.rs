use async_trait::async_trait;
use thiserror::Error;

use crate::models::StockInfo;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Source of stock quotes and recent price history.
///
/// Implementations swallow their own failures: anything that prevents a
/// lookup surfaces as `None`.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Option<StockInfo>;
}
