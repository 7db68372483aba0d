use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{analysis, health, news, sentiment, stocks};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(health::health))
        .nest("/health", health::router())
        .nest("/api/analyze", analysis::router())
        .nest("/api/news", news::router())
        .nest("/api/sentiment", sentiment::router())
        .nest("/api", stocks::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
