use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::models::{AverageScoresRequest, ScoreTextRequest, SentimentScores};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(score_text))
        .route("/aggregate", post(average_scores))
}

/// POST /api/sentiment
///
/// Per-class probabilities for one text. All zeros means no signal.
async fn score_text(
    State(state): State<AppState>,
    Json(request): Json<ScoreTextRequest>,
) -> Json<SentimentScores> {
    info!("POST /api/sentiment - Scoring {} chars", request.text.chars().count());
    Json(state.scorer.score(&request.text).await)
}

/// POST /api/sentiment/aggregate
///
/// Average probabilities across news items, `null` when nothing scored.
async fn average_scores(
    State(state): State<AppState>,
    Json(request): Json<AverageScoresRequest>,
) -> Json<Option<SentimentScores>> {
    info!("POST /api/sentiment/aggregate - Averaging {} items", request.items.len());
    Json(state.aggregation.average_scores(&request.items).await)
}
