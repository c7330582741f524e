use axum::{Router, routing::post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::pipeline::SearchPipeline;
use crate::tracking::EventSink;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SearchPipeline>,
    pub events: Arc<dyn EventSink>,
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", post(handlers::search_handler))
        .route("/api/track", post(handlers::track_handler))
        .with_state(state)
        .layer(cors)
}
