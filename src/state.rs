use std::sync::Arc;

use crate::external::market_data::MarketDataProvider;
use crate::external::news_provider::NewsProvider;
use crate::external::sentiment_model::SentimentModelLoader;
use crate::services::aggregation_service::AggregationEngine;
use crate::services::analysis_service::AnalysisOrchestrator;
use crate::services::sentiment_service::{SentimentConfig, SentimentScorer};

#[derive(Clone)]
pub struct AppState {
    pub market_data: Arc<dyn MarketDataProvider>,
    pub news_provider: Arc<dyn NewsProvider>,
    pub scorer: Arc<SentimentScorer>,
    pub aggregation: Arc<AggregationEngine>,
    pub analysis: Arc<AnalysisOrchestrator>,
}

impl AppState {
    /// Wire the services around the given collaborators. The sentiment model
    /// is not loaded here; the first request that needs it triggers the load.
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        news_provider: Arc<dyn NewsProvider>,
        loader: Arc<dyn SentimentModelLoader>,
        config: &SentimentConfig,
    ) -> Self {
        let scorer = Arc::new(SentimentScorer::new(loader, config.max_chars));
        let aggregation = Arc::new(AggregationEngine::new(scorer.clone(), config.scoring_text));
        let analysis = Arc::new(AnalysisOrchestrator::new(
            market_data.clone(),
            news_provider.clone(),
            aggregation.clone(),
        ));

        Self {
            market_data,
            news_provider,
            scorer,
            aggregation,
            analysis,
        }
    }
}
