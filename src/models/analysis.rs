use serde::{Deserialize, Serialize};

use crate::models::{AggregateResult, NewsItem, StockInfo};

/// Response of `GET /api/analyze/:ticker`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ticker: String,
    pub stock: StockInfo,
    pub news: Vec<NewsItem>,
    pub sentiment: AggregateResult,
}
