use std::sync::Arc;
use tracing::info;

use crate::errors::AppError;
use crate::external::market_data::MarketDataProvider;
use crate::external::news_provider::NewsProvider;
use crate::models::AnalysisResult;
use crate::services::aggregation_service::AggregationEngine;

/// News items pulled per analysis
pub const ANALYSIS_NEWS_LIMIT: usize = 5;

/// Runs stock lookup, news fetch and sentiment aggregation in sequence
pub struct AnalysisOrchestrator {
    market_data: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    engine: Arc<AggregationEngine>,
    news_limit: usize,
}

impl AnalysisOrchestrator {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        engine: Arc<AggregationEngine>,
    ) -> Self {
        Self {
            market_data,
            news,
            engine,
            news_limit: ANALYSIS_NEWS_LIMIT,
        }
    }

    pub async fn analyze(&self, ticker: &str) -> Result<AnalysisResult, AppError> {
        // 1. Stock data; nothing else runs for an unknown ticker
        let stock = self
            .market_data
            .lookup(ticker)
            .await
            .ok_or(AppError::NotFound)?;

        // 2. Recent news keyed on the company name
        let news = self.news.search(Some(&stock.name), self.news_limit).await;
        info!("Analyzing {} news items for {} ({})", news.len(), ticker, stock.name);

        // 3. Sentiment
        let sentiment = self.engine.aggregate(&news).await;

        Ok(AnalysisResult {
            ticker: ticker.to_string(),
            stock,
            news,
            sentiment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewsItem, ScoringText, SentimentClass, SentimentLabel, StockInfo};
    use crate::services::sentiment_service::testing::{CountingLoader, ScriptedRuntime};
    use crate::services::sentiment_service::{SentimentScorer, DEFAULT_MAX_CHARS};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct FakeMarket;

    #[async_trait]
    impl MarketDataProvider for FakeMarket {
        async fn lookup(&self, symbol: &str) -> Option<StockInfo> {
            (symbol == "NVDA").then(|| StockInfo {
                symbol: "NVDA".to_string(),
                name: "NVIDIA Corporation".to_string(),
                current_price: Some(120.0),
                market_cap: Some(3.0e12),
                pe_ratio: Some(55.0),
                history: Vec::new(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNews {
        calls: Mutex<Vec<(Option<String>, usize)>>,
    }

    #[async_trait]
    impl NewsProvider for RecordingNews {
        async fn search(&self, keywords: Option<&str>, limit: usize) -> Vec<NewsItem> {
            self.calls
                .lock()
                .unwrap()
                .push((keywords.map(str::to_string), limit));
            ["NVIDIA surges", "NVIDIA expands"]
                .iter()
                .map(|title| NewsItem {
                    title: title.to_string(),
                    description: String::new(),
                    source: "Wire".to_string(),
                    url: "https://example.com".to_string(),
                    image: None,
                    published_at: Utc::now(),
                })
                .collect()
        }
    }

    fn orchestrator(news: Arc<RecordingNews>) -> AnalysisOrchestrator {
        let runtime = ScriptedRuntime::default()
            .with("NVIDIA surges", SentimentClass::Positive, 0.9)
            .with("NVIDIA expands", SentimentClass::Positive, 0.7);
        let scorer = SentimentScorer::new(Arc::new(CountingLoader::new(runtime)), DEFAULT_MAX_CHARS);
        let engine = AggregationEngine::new(Arc::new(scorer), ScoringText::Title);
        AnalysisOrchestrator::new(Arc::new(FakeMarket), news, Arc::new(engine))
    }

    #[tokio::test]
    async fn test_analyze_assembles_result() {
        let news = Arc::new(RecordingNews::default());
        let result = orchestrator(news.clone()).analyze("NVDA").await.unwrap();

        assert_eq!(result.ticker, "NVDA");
        assert_eq!(result.stock.name, "NVIDIA Corporation");
        assert_eq!(result.news.len(), 2);
        assert!((result.sentiment.score - 0.8).abs() < 1e-9);
        assert_eq!(result.sentiment.label, SentimentLabel::Bullish);

        let calls = news.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(Some("NVIDIA Corporation".to_string()), ANALYSIS_NEWS_LIMIT)]);
    }

    #[tokio::test]
    async fn test_unknown_ticker_short_circuits() {
        let news = Arc::new(RecordingNews::default());
        let result = orchestrator(news.clone()).analyze("ZZZZ").await;

        assert!(matches!(result, Err(AppError::NotFound)));
        assert!(news.calls.lock().unwrap().is_empty());
    }
}
