use futures::future::join_all;
use tracing::info;

use crate::external::market_data::MarketDataProvider;
use crate::models::StockInfo;

/// Popular tickers shown on the dashboard
pub const TRENDING_TICKERS: [&str; 4] = ["NVDA", "TSLA", "AAPL", "MSFT"];

/// Look up every trending ticker concurrently, keeping the order and
/// dropping the ones the provider can't resolve
pub async fn get_trending_stocks(provider: &dyn MarketDataProvider) -> Vec<StockInfo> {
    let lookups = TRENDING_TICKERS.iter().map(|ticker| provider.lookup(ticker));
    let stocks: Vec<StockInfo> = join_all(lookups).await.into_iter().flatten().collect();

    info!("Resolved {}/{} trending stocks", stocks.len(), TRENDING_TICKERS.len());
    stocks
}
