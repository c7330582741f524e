use serde::{Deserialize, Serialize};

use crate::data_models::ResultItem;
use crate::tracking::SessionEvents;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filter_embeddable: bool,
    /// When present the search is recorded for this session.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<ResultItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub session_id: String,
    #[serde(flatten)]
    pub events: SessionEvents,
}
