use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::external::market_data::{MarketDataError, MarketDataProvider};
use crate::models::{HistoryPoint, StockInfo};

#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub base_url: String,
}

impl MarketDataConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
        }
    }
}

pub struct YahooFinanceProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new(config: MarketDataConfig) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("Mozilla/5.0 (compatible; sentimarket/0.1)")
            .build()
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MarketDataError::Parse(format!("invalid base URL: {}", e)))?;

        Ok(Self { base_url, client })
    }

    async fn fetch_chart(&self, ticker: &str) -> Result<YahooChartResponse, MarketDataError> {
        let url = endpoint_url(&self.base_url, &["v8", "finance", "chart"], ticker)?;

        let resp = self
            .client
            .get(url)
            .query(&[("range", "1mo"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }

        // Unknown tickers come back as 404 with a chart.error body, so parse
        // regardless of status.
        resp.json::<YahooChartResponse>()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, MarketDataError> {
        let url = endpoint_url(&self.base_url, &["v10", "finance", "quoteSummary"], ticker)?;

        let resp = self
            .client
            .get(url)
            .query(&[("modules", "price,summaryDetail")])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body = resp
            .json::<QuoteSummaryResponse>()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        let result = body
            .quote_summary
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| MarketDataError::BadResponse("missing quoteSummary result".into()))?;

        Ok(Fundamentals {
            market_cap: result.price.and_then(|p| p.market_cap).and_then(|v| v.raw),
            pe_ratio: result.summary_detail.and_then(|s| s.trailing_pe).and_then(|v| v.raw),
        })
    }
}

/// Append `path` and the ticker to the base URL as encoded path segments, so
/// characters like `/` or `?` in a ticker stay inside its segment
fn endpoint_url(base: &Url, path: &[&str], ticker: &str) -> Result<Url, MarketDataError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| MarketDataError::Parse(format!("base URL {} cannot take a path", base)))?
        .pop_if_empty()
        .extend(path)
        .push(ticker);
    Ok(url)
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    symbol: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetailModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Default)]
struct Fundamentals {
    market_cap: Option<f64>,
    pe_ratio: Option<f64>,
}

/// Build a `StockInfo` from a chart response; `Ok(None)` for unknown tickers
fn stock_info_from_chart(
    ticker: &str,
    body: YahooChartResponse,
) -> Result<Option<StockInfo>, MarketDataError> {
    if let Some(err) = body.chart.error {
        if !err.is_null() {
            info!("Yahoo reported no data for {}: {}", ticker, err);
            return Ok(None);
        }
    }

    let Some(result) = body.chart.result.and_then(|mut r| r.pop()) else {
        return Ok(None);
    };

    let closes = result
        .indicators
        .quote
        .first()
        .map(|q| q.close.as_slice())
        .unwrap_or_default();

    let mut history = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        // skip missing closes
        let Some(price) = closes.get(i).copied().flatten() else { continue };

        let dt = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| MarketDataError::Parse(format!("bad timestamp {}", ts)))?;

        history.push(HistoryPoint {
            date: dt.date_naive(),
            price,
        });
    }
    history.sort_by_key(|p| p.date);

    let symbol = result
        .meta
        .symbol
        .unwrap_or_else(|| ticker.to_string())
        .to_uppercase();
    let name = result
        .meta
        .long_name
        .or(result.meta.short_name)
        .unwrap_or_else(|| ticker.to_string());
    let current_price = result
        .meta
        .regular_market_price
        .or_else(|| history.last().map(|p| p.price));

    Ok(Some(StockInfo {
        symbol,
        name,
        current_price,
        market_cap: None,
        pe_ratio: None,
        history,
    }))
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn lookup(&self, symbol: &str) -> Option<StockInfo> {
        let ticker = symbol.trim();
        if ticker.is_empty() {
            return None;
        }

        let chart = match self.fetch_chart(ticker).await {
            Ok(chart) => chart,
            Err(e) => {
                warn!("Failed to fetch chart for {}: {}", ticker, e);
                return None;
            }
        };

        let mut stock = match stock_info_from_chart(ticker, chart) {
            Ok(Some(stock)) => stock,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read chart for {}: {}", ticker, e);
                return None;
            }
        };

        match self.fetch_fundamentals(ticker).await {
            Ok(f) => {
                stock.market_cap = f.market_cap;
                stock.pe_ratio = f.pe_ratio;
            }
            Err(e) => warn!("Fundamentals unavailable for {}: {}", ticker, e),
        }

        info!(
            "Fetched {} ({}) with {} history points",
            stock.symbol,
            stock.name,
            stock.history.len()
        );
        Some(stock)
    }
}
