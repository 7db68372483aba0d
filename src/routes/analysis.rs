use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::AnalysisResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:ticker", get(analyze_ticker))
}

/// GET /api/analyze/:ticker
///
/// Stock snapshot, its five most recent news items and their aggregated
/// sentiment. 404 when the ticker can't be resolved.
async fn analyze_ticker(
    Path(ticker): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AnalysisResult>, AppError> {
    info!("GET /api/analyze/{} - Running analysis", ticker);

    let result = state.analysis.analyze(&ticker).await?;

    info!(
        "Analysis for {}: {} ({:.3}) over {} items",
        ticker, result.sentiment.label, result.sentiment.score, result.sentiment.sample_count
    );
    Ok(Json(result))
}
