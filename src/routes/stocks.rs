use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::StockInfo;
use crate::services::stock_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stock/:ticker", get(get_stock))
        .route("/trending", get(get_trending))
}

/// GET /api/stock/:ticker
async fn get_stock(
    Path(ticker): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StockInfo>, AppError> {
    info!("GET /api/stock/{} - Fetching stock data", ticker);

    state
        .market_data
        .lookup(&ticker)
        .await
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// GET /api/trending
async fn get_trending(State(state): State<AppState>) -> Json<Vec<StockInfo>> {
    info!("GET /api/trending - Fetching trending stocks");
    Json(stock_service::get_trending_stocks(state.market_data.as_ref()).await)
}
