use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures talking to the upstream search provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream quota exhausted or rate limited (status {status})")]
    QuotaExceeded { status: u16, body: String },

    #[error("upstream search credentials are not configured")]
    MissingCredentials,

    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode upstream response: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Fatal errors abort the whole request; everything else only ends paging.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            UpstreamError::QuotaExceeded { .. } | UpstreamError::MissingCredentials
        )
    }
}

/// Errors that cross the pipeline boundary and reach the caller.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("search quota exceeded")]
    QuotaExceeded(#[source] UpstreamError),

    #[error("search is not configured")]
    Configuration(String),

    #[error("internal error")]
    Internal(String),
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> String {
        match self {
            SearchError::InvalidInput(msg) => msg.clone(),
            SearchError::QuotaExceeded(source) => source.to_string(),
            SearchError::Configuration(msg) | SearchError::Internal(msg) => msg.clone(),
        }
    }
}

impl From<UpstreamError> for SearchError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::QuotaExceeded { .. } => SearchError::QuotaExceeded(err),
            UpstreamError::MissingCredentials => SearchError::Configuration(err.to_string()),
            other => SearchError::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}
