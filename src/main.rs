use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use sentimarket_backend::app;
use sentimarket_backend::external::huggingface::HuggingFaceLoader;
use sentimarket_backend::external::mediastack::{MediaStackProvider, NewsConfig};
use sentimarket_backend::external::yahoo::{MarketDataConfig, YahooFinanceProvider};
use sentimarket_backend::logging::{init_logging, LoggingConfig};
use sentimarket_backend::services::sentiment_service::SentimentConfig;
use sentimarket_backend::state::AppState;

#[derive(Debug, Clone)]
struct ServerConfig {
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env()?)?;

    let server = ServerConfig::from_env();
    let sentiment_config = SentimentConfig::from_env();

    let market_data = YahooFinanceProvider::new(MarketDataConfig::from_env())
        .context("Failed to create Yahoo Finance provider")?;
    let news = MediaStackProvider::new(NewsConfig::from_env());
    let loader = HuggingFaceLoader::new(
        sentiment_config.model_url.clone(),
        sentiment_config.api_token.clone(),
    );

    tracing::info!(
        "Scoring {:?} of each news item, first {} chars",
        sentiment_config.scoring_text,
        sentiment_config.max_chars
    );

    let state = AppState::new(
        Arc::new(market_data),
        Arc::new(news),
        Arc::new(loader),
        &sentiment_config,
    );
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("SentiMarket backend running at http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
