use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{NewsItem, NewsQueryParams};
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 100;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_news))
}

/// GET /api/news
///
/// Query parameters:
/// - `limit`: number of items, 1-100 (default: 5)
/// - `keywords`: optional keyword filter
async fn get_news(
    Query(params): Query<NewsQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsItem>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    info!(
        "GET /api/news - Fetching news (limit={}, keywords={:?})",
        limit, params.keywords
    );

    let items = state
        .news_provider
        .search(params.keywords.as_deref(), limit)
        .await;
    Ok(Json(items))
}
