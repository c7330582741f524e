use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::data_models::CandidateItem;
use crate::error::UpstreamError;

/// Number of items requested per upstream page.
pub const PAGE_SIZE: u32 = 10;
/// Upstream offsets are 1-based.
pub const FIRST_OFFSET: u32 = 1;

/// One page of upstream results.
#[derive(Debug, Clone, Default)]
pub struct UpstreamPage {
    pub items: Vec<CandidateItem>,
    /// Offset of the next page, `None` when the provider has no more.
    pub next_offset: Option<u32>,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn fetch_page(
        &self,
        query: &str,
        offset: u32,
        page_size: u32,
    ) -> Result<UpstreamPage, UpstreamError>;
}

// =============================================================================
// Custom Search JSON API client
// =============================================================================

#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<CandidateItem>,
    #[serde(default)]
    queries: Option<CustomSearchQueries>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchQueries {
    #[serde(default, rename = "nextPage")]
    next_page: Vec<CustomSearchPageRef>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchPageRef {
    #[serde(rename = "startIndex")]
    start_index: Option<u32>,
}

/// Client for a Custom Search style API keyed by an API key and engine id.
pub struct CustomSearchClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl CustomSearchClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        engine_id: Option<String>,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            engine_id,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        if config.search_api_key.is_none() || config.search_engine_id.is_none() {
            tracing::warn!("SEARCH_API_KEY or SEARCH_ENGINE_ID missing, searches will fail");
        }
        Self::new(
            config.search_api_url.clone(),
            config.search_api_key.clone(),
            config.search_engine_id.clone(),
        )
    }
}

#[async_trait]
impl SearchProvider for CustomSearchClient {
    async fn fetch_page(
        &self,
        query: &str,
        offset: u32,
        page_size: u32,
    ) -> Result<UpstreamPage, UpstreamError> {
        let (Some(key), Some(cx)) = (&self.api_key, &self.engine_id) else {
            return Err(UpstreamError::MissingCredentials);
        };

        let num = page_size.to_string();
        let start = offset.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", key.as_str()),
                ("cx", cx.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("start", start.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                    UpstreamError::QuotaExceeded {
                        status: status.as_u16(),
                        body,
                    }
                }
                _ => UpstreamError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let parsed: CustomSearchResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        let next_offset = parsed
            .queries
            .and_then(|q| q.next_page.into_iter().next())
            .and_then(|p| p.start_index);

        Ok(UpstreamPage {
            items: parsed.items,
            next_offset,
        })
    }
}

// =============================================================================
// Pager
// =============================================================================

/// Sequentially pulls pages from a provider until enough candidates are
/// collected or the provider runs dry.
pub struct UpstreamPager<'a> {
    provider: &'a dyn SearchProvider,
}

impl<'a> UpstreamPager<'a> {
    pub fn new(provider: &'a dyn SearchProvider) -> Self {
        Self { provider }
    }

    /// Only fatal errors (quota, credentials) are returned; any other failure
    /// ends paging and yields what was collected so far.
    pub async fn fetch_candidates(
        &self,
        query: &str,
        target_count: usize,
        max_fetches: usize,
    ) -> Result<Vec<CandidateItem>, UpstreamError> {
        let mut candidates = Vec::new();
        let mut offset = FIRST_OFFSET;
        let mut fetches = 0usize;

        while candidates.len() < target_count && fetches < max_fetches {
            fetches += 1;
            let page = match self.provider.fetch_page(query, offset, PAGE_SIZE).await {
                Ok(page) => page,
                Err(e) if e.is_fatal() => {
                    tracing::error!("upstream fetch aborted at offset {offset}: {e}");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(
                        "upstream fetch failed at offset {offset}, keeping {} candidates: {e}",
                        candidates.len()
                    );
                    break;
                }
            };

            tracing::info!(
                "fetched page {fetches} at offset {offset}: {} items",
                page.items.len()
            );
            if page.items.is_empty() {
                break;
            }
            let received = page.items.len() as u32;
            candidates.extend(page.items);

            match page.next_offset {
                Some(next) if next > offset => offset = next,
                Some(_) => offset += received,
                None => break,
            }
        }

        Ok(candidates)
    }
}
