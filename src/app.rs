use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{catalog, health, portfolio, selector};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(selector::router())
        .nest("/health", health::router())
        .nest("/api/catalog", catalog::router())
        .nest("/api/portfolio", portfolio::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
