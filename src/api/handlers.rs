use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::data_models::SearchQuery;
use crate::error::SearchError;
use crate::tracking::{SearchEvent, SessionEvents, spawn_record};

use super::AppState;
use super::models::{SearchRequest, SearchResponse, TrackRequest};

pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, SearchError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let query = SearchQuery::new(
        request.query.as_deref().unwrap_or_default(),
        request.filter_embeddable,
    )?;

    if let Some(session_id) = request.session_id {
        let events = SessionEvents {
            searches: vec![SearchEvent {
                query: query.text().to_string(),
                filter_embeddable: query.filter_embeddable(),
                timestamp: None,
            }],
            clicks: Vec::new(),
        };
        spawn_record(state.events.clone(), session_id, events);
    }

    let results = state.pipeline.search(&query).await.map_err(|e| {
        tracing::error!("search {:?} failed: {e}", query.text());
        e
    })?;

    Ok(Json(SearchResponse {
        items: results.items,
    }))
}

pub async fn track_handler(
    State(state): State<AppState>,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<StatusCode, SearchError> {
    let Json(request) = payload.map_err(invalid_body)?;
    if request.session_id.trim().is_empty() {
        return Err(SearchError::InvalidInput(
            "sessionId cannot be empty".to_string(),
        ));
    }
    spawn_record(state.events.clone(), request.session_id, request.events);
    Ok(StatusCode::ACCEPTED)
}

fn invalid_body(rejection: JsonRejection) -> SearchError {
    SearchError::InvalidInput(rejection.body_text())
}
