use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_SECURITY_POLICY, HeaderMap, X_FRAME_OPTIONS};
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::data_models::ProbeVerdict;

/// Some servers reject the default client identifier outright.
pub const PROBE_USER_AGENT: &str = "Mozilla/5.0 (compatible; framesearch-probe/0.1; +embed-check)";

const MAX_REDIRECTS: usize = 10;

/// `frame-ancestors` restricted to exactly `'none'` or `'self'`. Policies may
/// be comma-joined in one header value.
static FRAME_ANCESTORS_BLOCKED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[;,])\s*frame-ancestors\s+'(?:none|self)'\s*(?:[;,]|$)")
        .expect("frame-ancestors pattern is valid")
});

#[async_trait]
pub trait Prober: Send + Sync {
    /// Never fails: every problem is folded into the verdict.
    async fn probe(&self, url: &str) -> ProbeVerdict;
}

/// Header-only reachability check that infers whether a page may be framed.
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl LivenessProbe {
    /// `max_connections` should be at least the scheduler's concurrency cap.
    pub fn new(timeout: Duration, max_connections: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(PROBE_USER_AGENT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .pool_max_idle_per_host(max_connections)
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Prober for LivenessProbe {
    async fn probe(&self, url: &str) -> ProbeVerdict {
        // Dropping the future on timeout cancels the in-flight request.
        let verdict = match tokio::time::timeout(self.timeout, self.client.head(url).send()).await
        {
            Err(_) => ProbeVerdict::TimedOut,
            Ok(Err(e)) if e.is_timeout() => ProbeVerdict::TimedOut,
            Ok(Err(e)) => {
                tracing::debug!("probe network failure for {url}: {e}");
                ProbeVerdict::NetworkFailure
            }
            Ok(Ok(response)) => classify_response(response.status(), response.headers()),
        };
        tracing::debug!("probe {url} -> {verdict:?}");
        verdict
    }
}

/// Header checks run before the status check so a blocking header is always
/// reported as such.
pub fn classify_response(status: StatusCode, headers: &HeaderMap) -> ProbeVerdict {
    if blocks_by_frame_options(headers) || blocks_by_csp(headers) {
        return ProbeVerdict::BlockedByHeader;
    }
    if status.as_u16() >= 400 {
        return ProbeVerdict::HttpError;
    }
    ProbeVerdict::Displayable
}

fn blocks_by_frame_options(headers: &HeaderMap) -> bool {
    headers
        .get_all(X_FRAME_OPTIONS)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|v| v.eq_ignore_ascii_case("deny") || v.eq_ignore_ascii_case("sameorigin"))
}

fn blocks_by_csp(headers: &HeaderMap) -> bool {
    headers
        .get_all(CONTENT_SECURITY_POLICY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| FRAME_ANCESTORS_BLOCKED.is_match(v))
}
