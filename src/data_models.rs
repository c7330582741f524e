use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A validated, request-scoped query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    filter_embeddable: bool,
}

impl SearchQuery {
    pub fn new(text: &str, filter_embeddable: bool) -> Result<SearchQuery, SearchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SearchError::InvalidInput(
                "Query cannot be empty".to_string(),
            ));
        }
        Ok(SearchQuery {
            text: text.to_string(),
            filter_embeddable,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn filter_embeddable(&self) -> bool {
        self.filter_embeddable
    }
}

/// One upstream search result, exactly as the provider returned it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

impl CandidateItem {
    pub fn new(link: impl Into<String>, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        CandidateItem {
            link: link.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

/// Why a probe came out the way it did. Only `Displayable` counts as a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeVerdict {
    Displayable,
    BlockedByHeader,
    HttpError,
    NetworkFailure,
    TimedOut,
}

impl ProbeVerdict {
    pub fn is_displayable(self) -> bool {
        self == ProbeVerdict::Displayable
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub item: CandidateItem,
    pub verdict: ProbeVerdict,
}

impl ProbeOutcome {
    pub fn displayable(&self) -> bool {
        self.verdict.is_displayable()
    }
}

/// A result entry as returned to the caller.
///
/// `displayable` is `Some(true)` for confirmed items, `Some(false)` for items
/// that were probed and rejected and `None` for items that were never probed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    #[serde(flatten)]
    pub item: CandidateItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayable: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn links(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.item.link.as_str()).collect()
    }
}
